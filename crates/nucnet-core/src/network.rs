// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Network
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! A species catalog paired with a reaction catalog.
//!
//! Owns conservation validation, reaction Q values and the detailed-balance
//! reverse rate. Validation is a pure function of (network, reaction) and
//! runs afresh on every call.

use crate::reaction::{LeptonFlavor, Participant, RateFunctionData, Reaction, ReactionCatalog};
use crate::species::{Species, SpeciesCatalog};
use log::{error, trace};
use nucnet_types::constants::{MASS_ELECTRON_MEV, REVERSE_EXPONENT_MAX, REVERSE_EXPONENT_MIN};
use nucnet_types::error::{NucnetError, NucnetResult};
use nucnet_types::state::Rates;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NETWORK_ID: AtomicU64 = AtomicU64::new(1);

/// Equilibrium correction term of a species at (T9, rho, Ye).
pub type NseCorrectionFn = dyn Fn(&Species, f64, f64, f64) -> f64 + Send + Sync;

#[derive(Debug)]
pub struct Network {
    id: u64,
    species: SpeciesCatalog,
    reactions: ReactionCatalog,
}

/// Detailed-balance clamp on the reverse exponent.
///
/// Above 115.13 both rates are zeroed; below −300 only the reverse rate is.
pub fn apply_detailed_balance(
    forward: f64,
    exponent: f64,
    duplicate_product_factor: f64,
    duplicate_reactant_factor: f64,
) -> Rates {
    if exponent > REVERSE_EXPONENT_MAX {
        trace!("reverse exponent {exponent} above cutoff, zeroing rates");
        return Rates::new(0.0, 0.0);
    }
    if exponent < REVERSE_EXPONENT_MIN {
        return Rates::new(forward, 0.0);
    }
    Rates::new(
        forward,
        forward * exponent.exp() * duplicate_product_factor / duplicate_reactant_factor,
    )
}

impl Network {
    pub fn new(species: SpeciesCatalog, reactions: ReactionCatalog) -> Self {
        Network {
            id: NEXT_NETWORK_ID.fetch_add(1, Ordering::Relaxed),
            species,
            reactions,
        }
    }

    /// Process-unique identity, used to pair zones and views with their network.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn species(&self) -> &SpeciesCatalog {
        &self.species
    }

    pub fn reactions(&self) -> &ReactionCatalog {
        &self.reactions
    }

    /// Mutating the catalogs invalidates every view built on this network.
    pub fn species_mut(&mut self) -> &mut SpeciesCatalog {
        &mut self.species
    }

    pub fn reactions_mut(&mut self) -> &mut ReactionCatalog {
        &mut self.reactions
    }

    /// (species generation, reaction generation)
    pub fn generations(&self) -> (u64, u64) {
        (self.species.generation(), self.reactions.generation())
    }

    fn nuclide(&self, name: &str) -> NucnetResult<&Species> {
        self.species
            .by_name(name)
            .ok_or_else(|| NucnetError::UnknownSpecies(name.to_string()))
    }

    /// Whether every nuclide resolves in the full catalog; conservation
    /// violations of a resolvable reaction are errors.
    pub fn is_valid_reaction(&self, reaction: &Reaction) -> NucnetResult<bool> {
        self.is_valid_reaction_with(reaction, |name| self.species.by_name(name))
    }

    /// Validation against an arbitrary species subset given by `resolve`.
    pub(crate) fn is_valid_reaction_with<'a, F>(
        &'a self,
        reaction: &Reaction,
        resolve: F,
    ) -> NucnetResult<bool>
    where
        F: Fn(&str) -> Option<&'a Species>,
    {
        let mut delta_a: i64 = 0;
        let mut delta_z: i64 = 0;
        let mut delta_l = [0i64; 3];

        for (list, sign) in [(reaction.reactants(), -1i64), (reaction.products(), 1i64)] {
            for participant in list {
                match participant {
                    Participant::Nuclide(name) => match resolve(name) {
                        Some(sp) => {
                            delta_a += sign * sp.a() as i64;
                            delta_z += sign * sp.z() as i64;
                        }
                        None => return Ok(false),
                    },
                    Participant::Lepton(lepton) => {
                        delta_z += sign * lepton.charge();
                        delta_l[lepton.flavor() as usize] += sign * lepton.lepton_number();
                    }
                    Participant::Photon => {}
                }
            }
        }

        if delta_a != 0 {
            error!("Reaction {reaction} does not conserve baryon number");
            return Err(NucnetError::BaryonNotConserved {
                reaction: reaction.string(),
            });
        }
        if delta_z != 0 {
            error!("Reaction {reaction} does not conserve charge");
            return Err(NucnetError::ChargeNotConserved {
                reaction: reaction.string(),
            });
        }
        for flavor in LeptonFlavor::ALL {
            if delta_l[flavor as usize] != 0 {
                error!(
                    "Reaction {reaction} does not conserve {} lepton number",
                    flavor.as_str()
                );
                return Err(NucnetError::LeptonNotConserved {
                    reaction: reaction.string(),
                    flavor: flavor.as_str().to_string(),
                });
            }
        }
        Ok(true)
    }

    pub fn number_of_valid_reactions(&self) -> NucnetResult<usize> {
        let mut count = 0;
        for (_, reaction) in self.reactions.iter() {
            if self.is_valid_reaction(reaction)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Q value (MeV): mass excess of reactants minus products, with the
    /// 2 m_e c² correction for positron emission and capture.
    pub fn reaction_q_value(&self, reaction: &Reaction) -> NucnetResult<f64> {
        if !self.is_valid_reaction(reaction)? {
            return Err(NucnetError::UnknownReaction(format!(
                "{reaction} is not valid in this network"
            )));
        }
        let mut q = 0.0;
        for name in reaction.nuclide_reactants() {
            q += self.nuclide(name)?.mass_excess();
        }
        for name in reaction.nuclide_products() {
            q -= self.nuclide(name)?.mass_excess();
        }
        if reaction.is_beta_plus() {
            q -= 2.0 * MASS_ELECTRON_MEV;
        } else if reaction.is_positron_capture() {
            q += 2.0 * MASS_ELECTRON_MEV;
        }
        Ok(q)
    }

    /// Reverse rate from detailed balance. Returns the (possibly zeroed)
    /// forward rate alongside the reverse rate.
    pub fn compute_reverse_rate(
        &self,
        reaction: &Reaction,
        forward: f64,
        t9: f64,
        rho: f64,
    ) -> NucnetResult<Rates> {
        if reaction.is_weak() || reaction.reactants().len() == 1 {
            return Ok(Rates::new(forward, 0.0));
        }

        let mut exponent = 0.0;
        for name in reaction.nuclide_reactants() {
            exponent += self.species.nse_factor(self.nuclide(name)?, t9, rho)?;
        }
        for name in reaction.nuclide_products() {
            exponent -= self.species.nse_factor(self.nuclide(name)?, t9, rho)?;
        }
        let n_r = reaction.number_of_nuclide_reactants() as f64;
        let n_p = reaction.number_of_nuclide_products() as f64;
        exponent += (n_r - n_p) * rho.ln();

        Ok(apply_detailed_balance(
            forward,
            exponent,
            reaction.duplicate_product_factor(),
            reaction.duplicate_reactant_factor(),
        ))
    }

    /// Forward rate from the registry plus its detailed-balance reverse.
    pub fn compute_rates_for_reaction(
        &self,
        reaction: &Reaction,
        t9: f64,
        rho: f64,
        data: Option<&RateFunctionData>,
    ) -> NucnetResult<Rates> {
        if t9 < 0.0 {
            return Err(NucnetError::InvalidTemperature(t9));
        }
        if rho < 0.0 {
            return Err(NucnetError::InvalidDensity(rho));
        }
        let forward = self.reactions.compute_rate(reaction, t9, data)?;
        self.compute_reverse_rate(reaction, forward, t9, rho)
    }

    /// exp(Σ reactant corrections − Σ product corrections) over nuclides;
    /// 1 without a correction function.
    pub fn compute_reverse_ratio_correction_factor(
        &self,
        reaction: &Reaction,
        t9: f64,
        rho: f64,
        ye: f64,
        correction: Option<&NseCorrectionFn>,
    ) -> NucnetResult<f64> {
        let Some(correction) = correction else {
            return Ok(1.0);
        };
        let mut sum = 0.0;
        for name in reaction.nuclide_reactants() {
            sum += correction(self.nuclide(name)?, t9, rho, ye);
        }
        for name in reaction.nuclide_products() {
            sum -= correction(self.nuclide(name)?, t9, rho, ye);
        }
        Ok(sum.exp())
    }
}
