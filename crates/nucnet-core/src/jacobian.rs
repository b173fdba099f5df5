// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Jacobian and Flow Assembly
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Jacobian matrix and flow vector builders.
//!
//! Both run one pass over the evolution-view reactions using the zone's
//! cached rates, so [`Zone::compute_rates`] must be called first. For a
//! reaction with nuclide reactants R, products P, rates f, r and duplicate
//! factors d_r, d_p:
//!   u = f/d_r · Π_R Y − r/d_p · Π_P Y
//! is removed from each reactant slot and added to each product slot.
//!
//! The assembled matrix is −∂(dY/dt)/∂Y, ready for the caller to add 1/dt
//! on the diagonal for an implicit step.

use crate::network::Network;
use crate::zone::{network_reaction, Zone};
use ndarray::Array1;
use nucnet_math::sparse::{add_to_element, square_triplets, CsMat, TriMat};
use nucnet_types::error::NucnetResult;
use std::collections::BTreeMap;

/// Forward and reverse flows of one reaction at the current composition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReactionFlow {
    pub forward: f64,
    pub reverse: f64,
}

impl ReactionFlow {
    pub fn net(&self) -> f64 {
        self.forward - self.reverse
    }
}

fn abundance_product(y: &Array1<f64>, indices: &[usize]) -> f64 {
    indices.iter().map(|&k| y[k]).product()
}

/// Partial derivatives of one reaction side with respect to its own species.
fn add_side_partials(
    triplets: &mut TriMat<f64>,
    y: &Array1<f64>,
    side: &[usize],
    opposite: &[usize],
    rate: f64,
) -> NucnetResult<()> {
    for (i, &col) in side.iter().enumerate() {
        let value = rate
            * side
                .iter()
                .enumerate()
                .filter(|&(k, _)| k != i)
                .map(|(_, &s)| y[s])
                .product::<f64>();
        for &row in side {
            add_to_element(triplets, row, col, value)?;
        }
        for &row in opposite {
            add_to_element(triplets, row, col, -value)?;
        }
    }
    Ok(())
}

impl Zone {
    /// Negative Jacobian −∂(dY/dt)/∂Y in CSR form, square in the number of
    /// species. Contributions are pushed as triplets and summed on compression.
    pub fn compute_jacobian_matrix(&mut self, net: &Network) -> NucnetResult<CsMat<f64>> {
        self.ensure_evolution_view(net)?;
        let y = self.abundances(net)?;
        let view = self.current_evolution_view()?;

        let mut triplets = square_triplets(net.species().len());
        for (name, vr) in view.reactions() {
            let reaction = network_reaction(net, name)?;
            let rates = self.rates_for_reaction(name)?;
            add_side_partials(
                &mut triplets,
                &y,
                &vr.reactants,
                &vr.products,
                rates.forward / reaction.duplicate_reactant_factor(),
            )?;
            add_side_partials(
                &mut triplets,
                &y,
                &vr.products,
                &vr.reactants,
                rates.reverse / reaction.duplicate_product_factor(),
            )?;
        }
        Ok(triplets.to_csr())
    }

    /// The Jacobian ∂(dY/dt)/∂Y itself.
    pub fn compute_jacobian(&mut self, net: &Network) -> NucnetResult<CsMat<f64>> {
        let mut matrix = self.compute_jacobian_matrix(net)?;
        matrix.map_inplace(|&v| -v);
        Ok(matrix)
    }

    /// Per-reaction forward and reverse flows over the evolution view.
    pub fn compute_reaction_flows(
        &mut self,
        net: &Network,
    ) -> NucnetResult<BTreeMap<String, ReactionFlow>> {
        self.ensure_evolution_view(net)?;
        let y = self.abundances(net)?;
        let view = self.current_evolution_view()?;

        let mut flows = BTreeMap::new();
        for (name, vr) in view.reactions() {
            let reaction = network_reaction(net, name)?;
            let rates = self.rates_for_reaction(name)?;
            flows.insert(
                name.to_string(),
                ReactionFlow {
                    forward: rates.forward / reaction.duplicate_reactant_factor()
                        * abundance_product(&y, &vr.reactants),
                    reverse: rates.reverse / reaction.duplicate_product_factor()
                        * abundance_product(&y, &vr.products),
                },
            );
        }
        Ok(flows)
    }

    /// dY/dt from the cached rates, indexed by species.
    pub fn compute_flow_vector(&mut self, net: &Network) -> NucnetResult<Array1<f64>> {
        let flows = self.compute_reaction_flows(net)?;
        let view = self.current_evolution_view()?;

        let mut dydt = Array1::<f64>::zeros(net.species().len());
        for (name, vr) in view.reactions() {
            let u = flows.get(name).map(ReactionFlow::net).unwrap_or(0.0);
            for &k in &vr.reactants {
                dydt[k] -= u;
            }
            for &k in &vr.products {
                dydt[k] += u;
            }
        }
        Ok(dydt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reaction::{Reaction, ReactionCatalog, RateData};
    use crate::species::{Species, SpeciesCatalog};
    use nucnet_math::sparse::element;
    use nucnet_types::error::NucnetError;
    use nucnet_types::state::{Rates, ZoneLabel};

    /// Two isomers of the same nuclide: A <-> B.
    fn isomer_network() -> Network {
        let mut nuc = SpeciesCatalog::new();
        nuc.add(Species::named("a", 6, 12, 0.0)).unwrap();
        nuc.add(Species::named("b", 6, 12, 1.0)).unwrap();
        let mut reac = ReactionCatalog::new();
        reac.add(
            "a -> b"
                .parse::<Reaction>()
                .unwrap()
                .with_rate(RateData::Single(1.0)),
        );
        Network::new(nuc, reac)
    }

    #[test]
    fn test_two_species_jacobian() {
        let net = isomer_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        zone.update_species_abundance(&net, "a", 0.6).unwrap();
        zone.update_species_abundance(&net, "b", 0.4).unwrap();
        let (f, g) = (3.0, 0.5);
        zone.update_rates_for_reaction(&net, "a -> b", Rates::new(f, g))
            .unwrap();

        let m = zone.compute_jacobian_matrix(&net).unwrap();
        assert_eq!(element(&m, 0, 0), f);
        assert_eq!(element(&m, 1, 0), -f);
        assert_eq!(element(&m, 0, 1), -g);
        assert_eq!(element(&m, 1, 1), g);

        let j = zone.compute_jacobian(&net).unwrap();
        assert_eq!(element(&j, 0, 0), -f);
        assert_eq!(element(&j, 1, 1), -g);

        let dydt = zone.compute_flow_vector(&net).unwrap();
        let u = f * 0.6 - g * 0.4;
        assert_eq!(dydt[0], -u);
        assert_eq!(dydt[1], u);
        assert_eq!(dydt.sum(), 0.0);
    }

    #[test]
    fn test_duplicate_reactants_factor() {
        let mut nuc = SpeciesCatalog::new();
        nuc.add(Species::new(6, 12, 0.0).unwrap()).unwrap();
        nuc.add(Species::new(12, 24, -13.933).unwrap()).unwrap();
        let mut reac = ReactionCatalog::new();
        reac.add(
            "c12 + c12 -> mg24"
                .parse::<Reaction>()
                .unwrap()
                .with_rate(RateData::Single(1.0)),
        );
        let net = Network::new(nuc, reac);
        let mut zone = Zone::new(&net, ZoneLabel::default());
        zone.update_species_abundance(&net, "c12", 0.5).unwrap();
        zone.update_rates_for_reaction(&net, "c12 + c12 -> mg24", Rates::new(4.0, 0.0))
            .unwrap();

        // d(dY_c12/dt)/dY_c12 = -2 * f/2 * 2 Y = -2 f Y
        let m = zone.compute_jacobian_matrix(&net).unwrap();
        assert_eq!(element(&m, 0, 0), 2.0 * 4.0 * 0.5);
        assert_eq!(element(&m, 1, 0), -4.0 * 0.5);

        let flows = zone.compute_reaction_flows(&net).unwrap();
        let flow = flows["c12 + c12 -> mg24"];
        assert_eq!(flow.forward, 4.0 / 2.0 * 0.25);
        assert_eq!(flow.reverse, 0.0);

        let dydt = zone.compute_flow_vector(&net).unwrap();
        assert_eq!(dydt[0], -1.0);
        assert_eq!(dydt[1], 0.5);
        // Mass is conserved even though the plain sum is not zero.
        assert_eq!(12.0 * dydt[0] + 24.0 * dydt[1], 0.0);
    }

    #[test]
    fn test_missing_rates_is_error() {
        let net = isomer_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        assert!(matches!(
            zone.compute_jacobian_matrix(&net),
            Err(NucnetError::RatesNotAssigned(_))
        ));
        assert!(zone.compute_flow_vector(&net).is_err());
    }

    #[test]
    fn test_zero_abundances_leave_only_linear_terms() {
        let net = isomer_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        zone.update_rates_for_reaction(&net, "a -> b", Rates::new(2.0, 0.0))
            .unwrap();
        let m = zone.compute_jacobian_matrix(&net).unwrap();
        // Single-reactant partials do not depend on abundances.
        assert_eq!(m.nnz(), 2);
        assert!(zone.compute_flow_vector(&net).unwrap().iter().all(|&v| v == 0.0));
    }
}
