// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Network View
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Filtered projections of a network.
//!
//! A view owns membership only: a set of species indices and the reactions
//! that are valid against that subset, with their nuclide participants
//! resolved to species indices. It records the network identity and the
//! catalog generations it was built against; any catalog mutation makes it
//! stale and it must be rebuilt.

use crate::network::Network;
use crate::reaction::Reaction;
use crate::species::Species;
use log::{debug, error};
use nucnet_types::error::{NucnetError, NucnetResult};
use std::collections::{BTreeMap, BTreeSet};

/// Nuclide participants of a view reaction, as species indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewReaction {
    pub reactants: Vec<usize>,
    pub products: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetView {
    network_id: u64,
    species_generation: u64,
    reaction_generation: u64,
    species: BTreeSet<usize>,
    reactions: BTreeMap<String, ViewReaction>,
}

fn resolve_indices<'a, I>(net: &Network, names: I) -> Option<Vec<usize>>
where
    I: Iterator<Item = &'a str>,
{
    names.map(|name| net.species().index_of(name)).collect()
}

impl NetView {
    /// Keep species passing `nuc_filter`, then every parent reaction that
    /// passes `reac_filter` and is valid against the kept species.
    pub fn new<N, R>(net: &Network, nuc_filter: N, reac_filter: R) -> NucnetResult<Self>
    where
        N: Fn(&Species) -> bool,
        R: Fn(&Reaction) -> bool,
    {
        let (species_generation, reaction_generation) = net.generations();
        let species: BTreeSet<usize> = net
            .species()
            .iter()
            .filter(|sp| nuc_filter(sp))
            .map(Species::index)
            .collect();

        let mut view = NetView {
            network_id: net.id(),
            species_generation,
            reaction_generation,
            species,
            reactions: BTreeMap::new(),
        };
        for (name, reaction) in net.reactions().iter() {
            if reac_filter(reaction) {
                view.insert_if_valid(net, name, reaction)?;
            }
        }
        debug!(
            "Built view of network {}: {} species, {} reactions",
            net.id(),
            view.species.len(),
            view.reactions.len()
        );
        Ok(view)
    }

    /// View over the whole network.
    pub fn all(net: &Network) -> NucnetResult<Self> {
        Self::new(net, |_| true, |_| true)
    }

    fn insert_if_valid(
        &mut self,
        net: &Network,
        name: &str,
        reaction: &Reaction,
    ) -> NucnetResult<bool> {
        let species = &self.species;
        let valid = net.is_valid_reaction_with(reaction, |n| {
            net.species()
                .by_name(n)
                .filter(|sp| species.contains(&sp.index()))
        })?;
        if !valid {
            return Ok(false);
        }
        let resolved = resolve_indices(net, reaction.nuclide_reactants())
            .zip(resolve_indices(net, reaction.nuclide_products()));
        match resolved {
            Some((reactants, products)) => {
                self.reactions
                    .insert(name.to_string(), ViewReaction { reactants, products });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn network_id(&self) -> u64 {
        self.network_id
    }

    pub fn number_of_species(&self) -> usize {
        self.species.len()
    }

    pub fn number_of_reactions(&self) -> usize {
        self.reactions.len()
    }

    pub fn contains_species(&self, index: usize) -> bool {
        self.species.contains(&index)
    }

    pub fn contains_reaction(&self, name: &str) -> bool {
        self.reactions.contains_key(name)
    }

    /// Species indices in ascending order.
    pub fn species_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.species.iter().copied()
    }

    pub fn reactions(&self) -> impl Iterator<Item = (&str, &ViewReaction)> {
        self.reactions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn reaction(&self, name: &str) -> Option<&ViewReaction> {
        self.reactions.get(name)
    }

    /// Add a parent reaction, re-validating it against the view's species.
    /// Returns false when it is not valid there.
    pub fn add_reaction(&mut self, net: &Network, name: &str) -> NucnetResult<bool> {
        self.ensure_current(net, "view")?;
        let reaction = net
            .reactions()
            .get(name)
            .ok_or_else(|| NucnetError::UnknownReaction(name.to_string()))?;
        self.insert_if_valid(net, name, reaction)
    }

    pub fn remove_reaction(&mut self, name: &str) -> bool {
        self.reactions.remove(name).is_some()
    }

    /// True once the parent's species or reaction generation has moved on.
    pub fn was_parent_updated(&self, net: &Network) -> bool {
        net.generations() != (self.species_generation, self.reaction_generation)
    }

    /// Error unless this view belongs to `net` and is current.
    pub fn ensure_current(&self, net: &Network, label: &str) -> NucnetResult<()> {
        if self.network_id != net.id() {
            return Err(NucnetError::NetworkMismatch {
                expected: net.id(),
                found: self.network_id,
            });
        }
        if self.was_parent_updated(net) {
            error!("Parent network of view '{label}' has been updated but the view has not");
            return Err(NucnetError::StaleView {
                view: label.to_string(),
            });
        }
        Ok(())
    }
}
