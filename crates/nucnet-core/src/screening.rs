// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Screening
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Coulomb screening helpers.
//!
//! The pair enhancement itself is supplied by the caller; these helpers fold
//! it over a reaction's nuclides and blend the resulting factors into rates.

use crate::network::Network;
use crate::reaction::Reaction;
use nucnet_types::error::{NucnetError, NucnetResult};
use nucnet_types::state::Rates;

fn fold_pairs<'a, I, F>(net: &Network, names: I, pair: &mut F) -> NucnetResult<f64>
where
    I: Iterator<Item = &'a str>,
    F: FnMut(u32, u32, u32, u32) -> f64,
{
    let (mut z1, mut a1) = (0u32, 0u32);
    let mut factor = 1.0;
    for name in names {
        let sp = net
            .species()
            .by_name(name)
            .ok_or_else(|| NucnetError::UnknownSpecies(name.to_string()))?;
        let (z2, a2) = (sp.z(), sp.a());
        if z1 != 0 && a1 != 0 {
            factor *= pair(z1, a1, z2, a2);
        }
        z1 += z2;
        a1 += a2;
    }
    Ok(factor)
}

/// Forward and reverse screening factors of a reaction.
///
/// Each nuclide after the first is screened against the compound of the
/// nuclides before it: `pair(Z_acc, A_acc, Z_k, A_k)`. Neutral accumulated
/// compounds are skipped.
pub fn reaction_screening_factors<F>(
    net: &Network,
    reaction: &Reaction,
    mut pair: F,
) -> NucnetResult<(f64, f64)>
where
    F: FnMut(u32, u32, u32, u32) -> f64,
{
    let forward = fold_pairs(net, reaction.nuclide_reactants(), &mut pair)?;
    let reverse = fold_pairs(net, reaction.nuclide_products(), &mut pair)?;
    Ok((forward, reverse))
}

/// Apply screening factors and the reverse-ratio correction to a rate pair.
///
/// The larger screening factor wins: with `sf >= sr` the forward rate takes
/// `sf` and the reverse `sf * correction`; otherwise the reverse takes `sr`
/// and the forward `sr / correction`.
pub fn blend_screening(
    rates: Rates,
    forward_screen: f64,
    reverse_screen: f64,
    correction: f64,
) -> Rates {
    if forward_screen >= reverse_screen {
        Rates::new(
            rates.forward * forward_screen,
            rates.reverse * forward_screen * correction,
        )
    } else {
        Rates::new(
            rates.forward * reverse_screen / correction,
            rates.reverse * reverse_screen,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::tests::light_network;

    #[test]
    fn test_blend_forward_dominant() {
        let r = blend_screening(Rates::new(2.0, 3.0), 1.5, 1.2, 0.5);
        assert_eq!(r.forward, 3.0);
        assert_eq!(r.reverse, 3.0 * 1.5 * 0.5);
    }

    #[test]
    fn test_blend_reverse_dominant() {
        let r = blend_screening(Rates::new(2.0, 3.0), 1.2, 1.5, 0.5);
        assert_eq!(r.forward, 2.0 * 1.5 / 0.5);
        assert_eq!(r.reverse, 4.5);
    }

    #[test]
    fn test_blend_unit_factors_identity() {
        let r = blend_screening(Rates::new(2.0, 3.0), 1.0, 1.0, 1.0);
        assert_eq!(r, Rates::new(2.0, 3.0));
    }

    #[test]
    fn test_pair_fold_skips_neutral_leading_compound() {
        let net = light_network();
        let mut calls = Vec::new();
        let capture = net.reactions().get("n + h1 -> h2 + gamma").unwrap();
        let (f, r) = reaction_screening_factors(&net, capture, |z1, a1, z2, a2| {
            calls.push((z1, a1, z2, a2));
            2.0
        })
        .unwrap();
        // The neutron leads with Z = 0, and h2 stands alone: no pairs at all.
        assert_eq!((f, r), (1.0, 1.0));
        assert!(calls.is_empty());
    }

    #[test]
    fn test_pair_fold_accumulates_charge_and_mass() {
        let net = light_network();
        let fusion = net.reactions().get("h2 + h2 -> he4 + gamma").unwrap();
        let mut calls = Vec::new();
        let (f, r) = reaction_screening_factors(&net, fusion, |z1, a1, z2, a2| {
            calls.push((z1, a1, z2, a2));
            1.25
        })
        .unwrap();
        assert_eq!(calls, vec![(1, 2, 1, 2)]);
        assert_eq!(f, 1.25);
        assert_eq!(r, 1.0);
    }
}
