// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Species
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Nuclear species and the species catalog.
//!
//! Species live in an index-addressed arena. Every mutation of the catalog
//! (add, remove, sort) bumps a generation counter that network views compare
//! against to detect staleness.

use nucnet_math::interp::interpolate_clamped;
use nucnet_types::constants::{
    AMU_TO_MEV, AVOGADRO, ERGS_TO_MEV, GIGA, HBAR, K_BOLTZMANN, MEV_TO_ERGS, SPEED_OF_LIGHT,
};
use nucnet_types::error::{NucnetError, NucnetResult};
use nucnet_types::state::NucleonType;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Name of the free neutron.
pub const NEUTRON: &str = "n";

/// Name of the free proton.
pub const PROTON: &str = "h1";

const ELEMENTS: [&str; 119] = [
    "n", "h", "he", "li", "be", "b", "c", "n", "o", "f", "ne", "na", "mg", "al", "si", "p", "s",
    "cl", "ar", "k", "ca", "sc", "ti", "v", "cr", "mn", "fe", "co", "ni", "cu", "zn", "ga", "ge",
    "as", "se", "br", "kr", "rb", "sr", "y", "zr", "nb", "mo", "tc", "ru", "rh", "pd", "ag", "cd",
    "in", "sn", "sb", "te", "i", "xe", "cs", "ba", "la", "ce", "pr", "nd", "pm", "sm", "eu", "gd",
    "tb", "dy", "ho", "er", "tm", "yb", "lu", "hf", "ta", "w", "re", "os", "ir", "pt", "au", "hg",
    "tl", "pb", "bi", "po", "at", "rn", "fr", "ra", "ac", "th", "pa", "u", "np", "pu", "am", "cm",
    "bk", "cf", "es", "fm", "md", "no", "lr", "rf", "db", "sg", "bh", "hs", "mt", "ds", "rg", "cn",
    "nh", "fl", "mc", "lv", "ts", "og",
];

/// Lower-case element symbol for atomic number `z`.
pub fn element_symbol(z: u32) -> Option<&'static str> {
    ELEMENTS.get(z as usize).copied()
}

/// Build the conventional species name: element symbol followed by the mass
/// number, plus an optional state suffix. The free neutron is "n".
pub fn species_name(z: u32, a: u32, state: Option<&str>) -> NucnetResult<String> {
    if a < z || a == 0 {
        return Err(NucnetError::InvalidProperty(format!(
            "no nuclide with Z = {z}, A = {a}"
        )));
    }
    let base = if z == 0 && a == 1 {
        NEUTRON.to_string()
    } else {
        let symbol = element_symbol(z).ok_or_else(|| {
            NucnetError::InvalidProperty(format!("no element symbol for Z = {z}"))
        })?;
        format!("{symbol}{a}")
    };
    Ok(match state {
        Some(s) => format!("{base}{s}"),
        None => base,
    })
}

/// Tabulated partition-function factor: log10 of G(T9)/(2J+1) on a T9 grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionTable {
    pub t9: Vec<f64>,
    pub log10_partf: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    name: String,
    z: u32,
    a: u32,
    mass_excess: f64,
    spin: f64,
    state: Option<String>,
    source: Option<String>,
    partf: Option<PartitionTable>,
    index: usize,
}

impl Species {
    /// Species named from (Z, A) with the conventional symbol.
    pub fn new(z: u32, a: u32, mass_excess: f64) -> NucnetResult<Self> {
        Ok(Self::named(&species_name(z, a, None)?, z, a, mass_excess))
    }

    pub fn named(name: &str, z: u32, a: u32, mass_excess: f64) -> Self {
        Species {
            name: name.to_string(),
            z,
            a,
            mass_excess,
            spin: 0.0,
            state: None,
            source: None,
            partf: None,
            index: 0,
        }
    }

    pub fn with_spin(mut self, spin: f64) -> Self {
        self.spin = spin;
        self
    }

    /// Attach a state label; the name gains the label as a suffix.
    pub fn with_state(mut self, state: &str) -> Self {
        self.name.push_str(state);
        self.state = Some(state.to_string());
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn with_partition_table(
        mut self,
        t9: Vec<f64>,
        log10_partf: Vec<f64>,
    ) -> NucnetResult<Self> {
        if t9.len() != log10_partf.len() {
            return Err(NucnetError::DimensionMismatch {
                expected: t9.len(),
                got: log10_partf.len(),
            });
        }
        if t9.is_empty() {
            self.partf = None;
        } else {
            self.partf = Some(PartitionTable { t9, log10_partf });
        }
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn z(&self) -> u32 {
        self.z
    }

    pub fn a(&self) -> u32 {
        self.a
    }

    pub fn n(&self) -> u32 {
        self.a - self.z
    }

    /// Mass excess (MeV)
    pub fn mass_excess(&self) -> f64 {
        self.mass_excess
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn partition_table(&self) -> Option<&PartitionTable> {
        self.partf.as_ref()
    }

    /// Position in the owning catalog.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Nuclear partition function G(T9) = (2J+1)·10^f(T9), with f read from
    /// the table (held constant beyond its ends) or zero without one.
    pub fn partition_function(&self, t9: f64) -> NucnetResult<f64> {
        if t9 < 0.0 {
            return Err(NucnetError::InvalidTemperature(t9));
        }
        let g0 = 2.0 * self.spin + 1.0;
        match &self.partf {
            None => Ok(g0),
            Some(table) => {
                let exponent = interpolate_clamped(&table.t9, &table.log10_partf, t9)?;
                Ok(g0 * 10f64.powf(exponent))
            }
        }
    }

    /// Quantum abundance (G / (rho N_A)) · (m c² kT / (2π (ħc)²))^{3/2}.
    pub fn quantum_abundance(&self, t9: f64, rho: f64) -> NucnetResult<f64> {
        if t9 <= 0.0 {
            return Err(NucnetError::InvalidTemperature(t9));
        }
        if rho <= 0.0 {
            return Err(NucnetError::InvalidDensity(rho));
        }
        let mass_mev = AMU_TO_MEV * self.a as f64 + self.mass_excess;
        let hbar_c = HBAR * SPEED_OF_LIGHT;
        let thermal =
            mass_mev * MEV_TO_ERGS * K_BOLTZMANN * t9 * GIGA / (2.0 * PI * hbar_c * hbar_c);
        Ok(self.partition_function(t9)? / (rho * AVOGADRO) * thermal.powf(1.5))
    }
}

/// Default catalog order: Z, then A, then name.
pub fn default_species_order(a: &Species, b: &Species) -> Ordering {
    a.z.cmp(&b.z)
        .then(a.a.cmp(&b.a))
        .then_with(|| a.name.cmp(&b.name))
}

#[derive(Debug, Clone, Default)]
pub struct SpeciesCatalog {
    species: Vec<Species>,
    by_name: HashMap<String, usize>,
    generation: u64,
}

impl SpeciesCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Counter bumped by every catalog mutation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Append a species; its index is the previous catalog size.
    pub fn add(&mut self, mut species: Species) -> NucnetResult<usize> {
        if self.by_name.contains_key(&species.name) {
            return Err(NucnetError::DuplicateSpecies(species.name));
        }
        let index = self.species.len();
        species.index = index;
        self.by_name.insert(species.name.clone(), index);
        self.species.push(species);
        self.generation += 1;
        Ok(index)
    }

    pub fn remove(&mut self, name: &str) -> NucnetResult<Species> {
        let index = self
            .by_name
            .remove(name)
            .ok_or_else(|| NucnetError::UnknownSpecies(name.to_string()))?;
        let removed = self.species.remove(index);
        self.reindex();
        self.generation += 1;
        Ok(removed)
    }

    pub fn sort(&mut self) {
        self.sort_by(default_species_order);
    }

    /// Re-sort with a caller comparator and reassign indices.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Species, &Species) -> Ordering,
    {
        self.species.sort_by(compare);
        self.reindex();
        self.generation += 1;
    }

    fn reindex(&mut self) {
        self.by_name.clear();
        for (i, sp) in self.species.iter_mut().enumerate() {
            sp.index = i;
            self.by_name.insert(sp.name.clone(), i);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Species> {
        self.species.get(index)
    }

    pub fn by_name(&self, name: &str) -> Option<&Species> {
        self.by_name.get(name).map(|&i| &self.species[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn by_za(&self, z: u32, a: u32, state: Option<&str>) -> Option<&Species> {
        species_name(z, a, state)
            .ok()
            .and_then(|name| self.by_name(&name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    pub fn largest_nucleon_number(&self, kind: NucleonType) -> u32 {
        self.species
            .iter()
            .map(|sp| kind.count(sp.z, sp.a))
            .max()
            .unwrap_or(0)
    }

    fn nucleon(&self, name: &str) -> NucnetResult<&Species> {
        self.by_name(name)
            .ok_or_else(|| NucnetError::MissingNucleon(name.to_string()))
    }

    /// Binding energy (MeV) from mass excesses: Z Δ(h1) + N Δ(n) − Δ.
    pub fn binding_energy(&self, species: &Species) -> NucnetResult<f64> {
        let neutron = self.nucleon(NEUTRON)?;
        let proton = self.nucleon(PROTON)?;
        Ok(species.z as f64 * proton.mass_excess + species.n() as f64 * neutron.mass_excess
            - species.mass_excess)
    }

    /// NSE factor ln(quantum abundance) + B / kT.
    pub fn nse_factor(&self, species: &Species, t9: f64, rho: f64) -> NucnetResult<f64> {
        let binding = self.binding_energy(species)?;
        let kt_mev = K_BOLTZMANN * ERGS_TO_MEV * GIGA * t9;
        Ok(species.quantum_abundance(t9, rho)?.ln() + binding / kt_mev)
    }
}
