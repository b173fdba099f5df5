// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Rate Computation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rate pipeline for a zone at fixed (T9, rho).
//!
//! One pass computes forward rates from the registry and reverse rates by
//! detailed balance, scaled from per-particle to volumetric form. A second
//! pass applies the zone's screening hook when one is bound.

use crate::network::Network;
use crate::screening::blend_screening;
use crate::zone::{network_reaction, Zone, EVOLUTION_NETWORK};
use log::debug;
use nucnet_types::error::{NucnetError, NucnetResult};
use nucnet_types::state::{Rates, ZoneLabel};

/// rho^(n-1) for a side with `n` nuclides.
fn density_factor(rho: f64, nuclides: usize) -> f64 {
    rho.powi(nuclides as i32 - 1)
}

impl Zone {
    /// Compute and cache rates of every evolution-view reaction.
    ///
    /// The evolution view is built from the full network when absent; a
    /// cached one whose network has changed is a [`NucnetError::StaleView`].
    /// The density must be strictly positive. Cached entries of other
    /// reactions are left untouched.
    pub fn compute_rates(&mut self, net: &Network, t9: f64, rho: f64) -> NucnetResult<()> {
        if t9.is_nan() || t9 <= 0.0 {
            return Err(NucnetError::InvalidTemperature(t9));
        }
        if rho.is_nan() || rho <= 0.0 {
            return Err(NucnetError::InvalidDensity(rho));
        }
        self.ensure_evolution_view(net)?;
        let ye = self.z_moment(net, 1)?;

        let Zone {
            views,
            rates,
            rate_function_data,
            screening,
            nse_correction,
            detailed_balance,
            ..
        } = self;
        let view = views
            .get(&ZoneLabel::single(EVOLUTION_NETWORK))
            .ok_or_else(|| NucnetError::StaleView {
                view: EVOLUTION_NETWORK.to_string(),
            })?;

        for (name, _) in view.reactions() {
            let reaction = network_reaction(net, name)?;
            let data = reaction
                .rate_function_key()
                .and_then(|key| rate_function_data.get(key))
                .map(|b| &**b);
            let mut pair = if *detailed_balance {
                net.compute_rates_for_reaction(reaction, t9, rho, data)?
            } else {
                Rates::new(net.reactions().compute_rate(reaction, t9, data)?, 0.0)
            };
            pair.forward *= density_factor(rho, reaction.number_of_nuclide_reactants());
            pair.reverse *= density_factor(rho, reaction.number_of_nuclide_products());
            rates.insert(name.to_string(), pair);
        }

        if let Some(screen) = screening.as_deref() {
            let correction = nse_correction.as_deref();
            for (name, _) in view.reactions() {
                let reaction = network_reaction(net, name)?;
                let (forward_screen, reverse_screen) = screen(net, reaction, t9, rho, ye)?;
                let factor =
                    net.compute_reverse_ratio_correction_factor(reaction, t9, rho, ye, correction)?;
                let cached = rates
                    .get_mut(name)
                    .ok_or_else(|| NucnetError::RatesNotAssigned(name.to_string()))?;
                *cached = blend_screening(*cached, forward_screen, reverse_screen, factor);
            }
        }

        debug!(
            "Computed rates for {} reactions at T9 = {t9}, rho = {rho}, Ye = {ye}{}",
            view.number_of_reactions(),
            if screening.is_some() { " (screened)" } else { "" }
        );
        Ok(())
    }
}
