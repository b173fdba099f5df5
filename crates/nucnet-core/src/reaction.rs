// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Reaction
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reactions, participants and the reaction catalog.
//!
//! A participant is resolved into a tagged variant when the reaction is
//! built, so conservation checks read charge and lepton number straight off
//! the variant. The catalog also owns the string-keyed rate-function
//! registry with three built-in evaluators:
//!
//! - `single_rate`: a constant forward rate
//! - `rate_table`: T9/rate/stellar-enhancement table
//! - `non_smoker_fit`: sum of seven-parameter fits

use nucnet_math::interp::interpolate_table;
use nucnet_types::constants::{NON_SMOKER_T_HIGH_DEFAULT, TINY};
use nucnet_types::error::{NucnetError, NucnetResult};
use nucnet_types::state::PropertyKey;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const SINGLE_RATE: &str = "single_rate";
pub const RATE_TABLE: &str = "rate_table";
pub const NON_SMOKER_FIT: &str = "non_smoker_fit";

// ── Participants ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LeptonFlavor {
    Electron,
    Mu,
    Tau,
}

impl LeptonFlavor {
    pub const ALL: [LeptonFlavor; 3] =
        [LeptonFlavor::Electron, LeptonFlavor::Mu, LeptonFlavor::Tau];

    pub fn as_str(self) -> &'static str {
        match self {
            LeptonFlavor::Electron => "electron",
            LeptonFlavor::Mu => "mu",
            LeptonFlavor::Tau => "tau",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lepton {
    Charged { flavor: LeptonFlavor, anti: bool },
    Neutrino { flavor: LeptonFlavor, anti: bool },
}

impl Lepton {
    pub fn flavor(self) -> LeptonFlavor {
        match self {
            Lepton::Charged { flavor, .. } | Lepton::Neutrino { flavor, .. } => flavor,
        }
    }

    /// Electric charge in units of e.
    pub fn charge(self) -> i64 {
        match self {
            Lepton::Charged { anti: false, .. } => -1,
            Lepton::Charged { anti: true, .. } => 1,
            Lepton::Neutrino { .. } => 0,
        }
    }

    /// Lepton number within the particle's own flavor.
    pub fn lepton_number(self) -> i64 {
        match self {
            Lepton::Charged { anti, .. } | Lepton::Neutrino { anti, .. } => {
                if anti {
                    -1
                } else {
                    1
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        use LeptonFlavor::*;
        match self {
            Lepton::Charged { flavor: Electron, anti: false } => "electron",
            Lepton::Charged { flavor: Electron, anti: true } => "positron",
            Lepton::Charged { flavor: Mu, anti: false } => "mu",
            Lepton::Charged { flavor: Mu, anti: true } => "anti-mu",
            Lepton::Charged { flavor: Tau, anti: false } => "tau",
            Lepton::Charged { flavor: Tau, anti: true } => "anti-tau",
            Lepton::Neutrino { flavor: Electron, anti: false } => "neutrino_e",
            Lepton::Neutrino { flavor: Electron, anti: true } => "anti-neutrino_e",
            Lepton::Neutrino { flavor: Mu, anti: false } => "neutrino_mu",
            Lepton::Neutrino { flavor: Mu, anti: true } => "anti-neutrino_mu",
            Lepton::Neutrino { flavor: Tau, anti: false } => "neutrino_tau",
            Lepton::Neutrino { flavor: Tau, anti: true } => "anti-neutrino_tau",
        }
    }

    pub fn from_name(name: &str) -> Option<Lepton> {
        use LeptonFlavor::*;
        let lepton = match name {
            "electron" => Lepton::Charged { flavor: Electron, anti: false },
            "positron" => Lepton::Charged { flavor: Electron, anti: true },
            "mu" => Lepton::Charged { flavor: Mu, anti: false },
            "anti-mu" => Lepton::Charged { flavor: Mu, anti: true },
            "tau" => Lepton::Charged { flavor: Tau, anti: false },
            "anti-tau" => Lepton::Charged { flavor: Tau, anti: true },
            "neutrino_e" => Lepton::Neutrino { flavor: Electron, anti: false },
            "anti-neutrino_e" => Lepton::Neutrino { flavor: Electron, anti: true },
            "neutrino_mu" => Lepton::Neutrino { flavor: Mu, anti: false },
            "anti-neutrino_mu" => Lepton::Neutrino { flavor: Mu, anti: true },
            "neutrino_tau" => Lepton::Neutrino { flavor: Tau, anti: false },
            "anti-neutrino_tau" => Lepton::Neutrino { flavor: Tau, anti: true },
            _ => return None,
        };
        Some(lepton)
    }
}

pub const PHOTON: &str = "gamma";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Participant {
    Nuclide(String),
    Lepton(Lepton),
    Photon,
}

impl Participant {
    /// Classify a participant name. Anything that is not a lepton or the
    /// photon is taken to be a nuclide.
    pub fn parse(name: &str) -> Participant {
        if name == PHOTON {
            Participant::Photon
        } else if let Some(lepton) = Lepton::from_name(name) {
            Participant::Lepton(lepton)
        } else {
            Participant::Nuclide(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Participant::Nuclide(name) => name,
            Participant::Lepton(lepton) => lepton.name(),
            Participant::Photon => PHOTON,
        }
    }

    pub fn nuclide(&self) -> Option<&str> {
        match self {
            Participant::Nuclide(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_nuclide(&self) -> bool {
        matches!(self, Participant::Nuclide(_))
    }
}

// ── Rate Data ────────────────────────────────────────────────────────

/// Tabulated rate with stellar enhancement factors.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    t9: Vec<f64>,
    rate: Vec<f64>,
    sef: Vec<f64>,
}

impl RateTable {
    /// Table with unit enhancement factors.
    pub fn new(t9: Vec<f64>, rate: Vec<f64>) -> NucnetResult<Self> {
        let sef = vec![1.0; t9.len()];
        Self::with_sef(t9, rate, sef)
    }

    pub fn with_sef(t9: Vec<f64>, rate: Vec<f64>, sef: Vec<f64>) -> NucnetResult<Self> {
        if t9.is_empty() {
            return Err(NucnetError::InvalidProperty(
                "rate table needs at least one point".to_string(),
            ));
        }
        for len in [rate.len(), sef.len()] {
            if len != t9.len() {
                return Err(NucnetError::DimensionMismatch {
                    expected: t9.len(),
                    got: len,
                });
            }
        }
        Ok(RateTable { t9, rate, sef })
    }

    pub fn t9(&self) -> &[f64] {
        &self.t9
    }

    pub fn rate(&self) -> &[f64] {
        &self.rate
    }

    pub fn sef(&self) -> &[f64] {
        &self.sef
    }

    /// Outside the table the end rate is returned without enhancement.
    /// Inside, log10(rate) + log10(sef) is interpolated.
    pub fn evaluate(&self, t9: f64) -> NucnetResult<f64> {
        let last = self.t9.len() - 1;
        if t9 <= self.t9[0] {
            return Ok(self.rate[0]);
        }
        if t9 >= self.t9[last] {
            return Ok(self.rate[last]);
        }
        let y: Vec<f64> = self
            .rate
            .iter()
            .zip(&self.sef)
            .map(|(r, s)| (r + TINY).log10() + (s + TINY).log10())
            .collect();
        Ok(10f64.powf(interpolate_table(&self.t9, &y, t9)?))
    }
}

/// One seven-parameter fit with its temperature range.
#[derive(Debug, Clone, PartialEq)]
pub struct NonSmokerFit {
    pub a: [f64; 7],
    pub t_low_fit: f64,
    pub t_high_fit: f64,
    pub note: Option<String>,
}

impl NonSmokerFit {
    pub fn new(a: [f64; 7], t_low_fit: f64) -> Self {
        NonSmokerFit {
            a,
            t_low_fit,
            t_high_fit: NON_SMOKER_T_HIGH_DEFAULT,
            note: None,
        }
    }

    pub fn with_t_high_fit(mut self, t_high_fit: f64) -> Self {
        self.t_high_fit = t_high_fit;
        self
    }

    /// T9 is clamped to [t_low_fit, t_high_fit] before evaluation.
    pub fn evaluate(&self, t9: f64) -> f64 {
        let t = if t9 < self.t_low_fit {
            self.t_low_fit
        } else if t9 > self.t_high_fit {
            self.t_high_fit
        } else {
            t9
        };
        let t13 = t.cbrt();
        let a = &self.a;
        (a[0] + a[1] / t + a[2] / t13 + a[3] * t13 + a[4] * t + a[5] * t.powf(5.0 / 3.0)
            + a[6] * t.ln())
        .exp()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RateData {
    Single(f64),
    Table(RateTable),
    NonSmoker(Vec<NonSmokerFit>),
    /// Evaluated by the user function registered under this key.
    User(String),
}

impl RateData {
    pub fn key(&self) -> &str {
        match self {
            RateData::Single(_) => SINGLE_RATE,
            RateData::Table(_) => RATE_TABLE,
            RateData::NonSmoker(_) => NON_SMOKER_FIT,
            RateData::User(key) => key,
        }
    }
}

// ── Reaction ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    reactants: Vec<Participant>,
    products: Vec<Participant>,
    rate: Option<RateData>,
    properties: BTreeMap<PropertyKey, String>,
    source: Option<String>,
    duplicate_reactant_factor: f64,
    duplicate_product_factor: f64,
    parent_duplicate: Option<String>,
}

impl Default for Reaction {
    fn default() -> Self {
        Reaction {
            reactants: Vec::new(),
            products: Vec::new(),
            rate: None,
            properties: BTreeMap::new(),
            source: None,
            duplicate_reactant_factor: 1.0,
            duplicate_product_factor: 1.0,
            parent_duplicate: None,
        }
    }
}

fn push_participant(list: &mut Vec<Participant>, factor: &mut f64, name: &str) {
    let participant = Participant::parse(name);
    let is_nuclide = participant.is_nuclide();
    list.push(participant);
    if is_nuclide {
        // Multiplying by the running count of this nuclide builds n!.
        let count = list.iter().filter(|p| p.nuclide() == Some(name)).count();
        *factor *= count as f64;
    }
}

impl Reaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_reactant(&mut self, name: &str) {
        push_participant(&mut self.reactants, &mut self.duplicate_reactant_factor, name);
    }

    pub fn add_product(&mut self, name: &str) {
        push_participant(&mut self.products, &mut self.duplicate_product_factor, name);
    }

    pub fn reactant(mut self, name: &str) -> Self {
        self.add_reactant(name);
        self
    }

    pub fn product(mut self, name: &str) -> Self {
        self.add_product(name);
        self
    }

    pub fn with_rate(mut self, rate: RateData) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// Attach a string property read by user rate functions.
    pub fn with_property(
        mut self,
        name: &str,
        tag1: Option<&str>,
        tag2: Option<&str>,
        value: &str,
    ) -> NucnetResult<Self> {
        self.properties
            .insert(PropertyKey::new(name, tag1, tag2)?, value.to_string());
        Ok(self)
    }

    pub fn set_rate(&mut self, rate: RateData) {
        self.rate = Some(rate);
    }

    pub fn reactants(&self) -> &[Participant] {
        &self.reactants
    }

    pub fn products(&self) -> &[Participant] {
        &self.products
    }

    pub fn nuclide_reactants(&self) -> impl Iterator<Item = &str> {
        self.reactants.iter().filter_map(Participant::nuclide)
    }

    pub fn nuclide_products(&self) -> impl Iterator<Item = &str> {
        self.products.iter().filter_map(Participant::nuclide)
    }

    pub fn other_reactants(&self) -> impl Iterator<Item = &Participant> {
        self.reactants.iter().filter(|p| !p.is_nuclide())
    }

    pub fn other_products(&self) -> impl Iterator<Item = &Participant> {
        self.products.iter().filter(|p| !p.is_nuclide())
    }

    pub fn number_of_nuclide_reactants(&self) -> usize {
        self.nuclide_reactants().count()
    }

    pub fn number_of_nuclide_products(&self) -> usize {
        self.nuclide_products().count()
    }

    pub fn rate_data(&self) -> Option<&RateData> {
        self.rate.as_ref()
    }

    pub fn rate_function_key(&self) -> Option<&str> {
        self.rate.as_ref().map(RateData::key)
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn property(&self, name: &str, tag1: Option<&str>, tag2: Option<&str>) -> Option<&str> {
        let key = PropertyKey::new(name, tag1, tag2).ok()?;
        self.properties.get(&key).map(String::as_str)
    }

    /// Numeric property, for user rate functions.
    pub fn property_f64(
        &self,
        name: &str,
        tag1: Option<&str>,
        tag2: Option<&str>,
    ) -> NucnetResult<f64> {
        let raw = self.property(name, tag1, tag2).ok_or_else(|| {
            NucnetError::InvalidProperty(format!("reaction {self} has no property '{name}'"))
        })?;
        raw.trim().parse::<f64>().map_err(|e| {
            NucnetError::InvalidProperty(format!("property '{name}' = '{raw}' of {self}: {e}"))
        })
    }

    pub fn properties(&self) -> impl Iterator<Item = (&PropertyKey, &str)> {
        self.properties.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn duplicate_reactant_factor(&self) -> f64 {
        self.duplicate_reactant_factor
    }

    pub fn duplicate_product_factor(&self) -> f64 {
        self.duplicate_product_factor
    }

    /// Reaction this one duplicates, set on reactions returned by
    /// [`ReactionCatalog::duplicate_reactions`].
    pub fn parent_duplicate(&self) -> Option<&str> {
        self.parent_duplicate.as_deref()
    }

    /// Canonical string: nuclides first, then other participants on each side.
    pub fn string(&self) -> String {
        self.to_string()
    }

    /// True when any lepton takes part.
    pub fn is_weak(&self) -> bool {
        self.reactants
            .iter()
            .chain(&self.products)
            .any(|p| matches!(p, Participant::Lepton(_)))
    }

    /// Positron and electron neutrino among the products.
    pub fn is_beta_plus(&self) -> bool {
        let count = self
            .other_products()
            .filter(|p| matches!(p.name(), "positron" | "neutrino_e"))
            .count();
        count == 2
    }

    /// Exactly one positron or electron antineutrino on each side.
    pub fn is_positron_capture(&self) -> bool {
        let is_match = |p: &&Participant| matches!(p.name(), "positron" | "anti-neutrino_e");
        self.other_reactants().filter(is_match).count() == 1
            && self.other_products().filter(is_match).count() == 1
    }

    /// Order-insensitive signature shared by reactions with the same
    /// participants in either direction.
    fn duplicate_signature(&self) -> NucnetResult<String> {
        let side = |list: &[Participant]| {
            let mut names: Vec<&str> = list.iter().map(Participant::name).collect();
            names.sort_unstable();
            names.join(" ")
        };
        let reactants = side(&self.reactants);
        let products = side(&self.products);
        match reactants.cmp(&products) {
            std::cmp::Ordering::Less => Ok(format!("{reactants}|{products}")),
            std::cmp::Ordering::Greater => Ok(format!("{products}|{reactants}")),
            std::cmp::Ordering::Equal => Err(NucnetError::InvalidProperty(format!(
                "reactants and products of {self} are the same"
            ))),
        }
    }
}

fn write_side(f: &mut fmt::Formatter<'_>, list: &[Participant]) -> fmt::Result {
    let ordered = list
        .iter()
        .filter(|p| p.is_nuclide())
        .chain(list.iter().filter(|p| !p.is_nuclide()));
    for (i, p) in ordered.enumerate() {
        if i > 0 {
            f.write_str(" + ")?;
        }
        f.write_str(p.name())?;
    }
    Ok(())
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_side(f, &self.reactants)?;
        f.write_str(" -> ")?;
        write_side(f, &self.products)
    }
}

impl FromStr for Reaction {
    type Err = NucnetError;

    /// Parse "a + b -> c + d".
    fn from_str(s: &str) -> NucnetResult<Self> {
        let (lhs, rhs) = s.split_once("->").ok_or_else(|| {
            NucnetError::InvalidProperty(format!("reaction string '{s}' has no '->'"))
        })?;
        let mut reaction = Reaction::new();
        for name in lhs.split('+').map(str::trim).filter(|n| !n.is_empty()) {
            reaction.add_reactant(name);
        }
        for name in rhs.split('+').map(str::trim).filter(|n| !n.is_empty()) {
            reaction.add_product(name);
        }
        if reaction.reactants.is_empty() || reaction.products.is_empty() {
            return Err(NucnetError::InvalidProperty(format!(
                "reaction string '{s}' needs reactants and products"
            )));
        }
        Ok(reaction)
    }
}

// ── Rate-Function Registry and Catalog ───────────────────────────────

/// Opaque per-zone data handed to a rate function.
pub type RateFunctionData = dyn Any + Send + Sync;

/// Forward rate of a reaction at T9, given optional per-zone data.
pub type RateFunction =
    Arc<dyn Fn(&Reaction, f64, Option<&RateFunctionData>) -> NucnetResult<f64> + Send + Sync>;

fn single_rate(
    reaction: &Reaction,
    _t9: f64,
    _data: Option<&RateFunctionData>,
) -> NucnetResult<f64> {
    match reaction.rate_data() {
        Some(RateData::Single(rate)) => Ok(*rate),
        _ => Err(NucnetError::InvalidProperty(format!(
            "reaction {reaction} carries no single rate"
        ))),
    }
}

fn table_rate(reaction: &Reaction, t9: f64, _data: Option<&RateFunctionData>) -> NucnetResult<f64> {
    match reaction.rate_data() {
        Some(RateData::Table(table)) => table.evaluate(t9),
        _ => Err(NucnetError::InvalidProperty(format!(
            "reaction {reaction} carries no rate table"
        ))),
    }
}

fn non_smoker_rate(
    reaction: &Reaction,
    t9: f64,
    _data: Option<&RateFunctionData>,
) -> NucnetResult<f64> {
    match reaction.rate_data() {
        Some(RateData::NonSmoker(fits)) => Ok(fits.iter().map(|fit| fit.evaluate(t9)).sum()),
        _ => Err(NucnetError::InvalidProperty(format!(
            "reaction {reaction} carries no non-smoker fits"
        ))),
    }
}

#[derive(Clone)]
pub struct ReactionCatalog {
    reactions: BTreeMap<String, Reaction>,
    functions: HashMap<String, RateFunction>,
    generation: u64,
}

impl fmt::Debug for ReactionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.functions.keys().collect();
        keys.sort();
        f.debug_struct("ReactionCatalog")
            .field("reactions", &self.reactions.len())
            .field("rate_functions", &keys)
            .field("generation", &self.generation)
            .finish()
    }
}

impl Default for ReactionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ReactionCatalog {
    /// Empty catalog with the built-in rate functions registered.
    pub fn new() -> Self {
        let mut functions: HashMap<String, RateFunction> = HashMap::new();
        functions.insert(SINGLE_RATE.to_string(), Arc::new(single_rate));
        functions.insert(RATE_TABLE.to_string(), Arc::new(table_rate));
        functions.insert(NON_SMOKER_FIT.to_string(), Arc::new(non_smoker_rate));
        ReactionCatalog {
            reactions: BTreeMap::new(),
            functions,
            generation: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Insert or replace a reaction under its canonical string.
    pub fn add(&mut self, reaction: Reaction) -> String {
        let key = reaction.string();
        self.reactions.insert(key.clone(), reaction);
        self.generation += 1;
        key
    }

    pub fn remove(&mut self, name: &str) -> NucnetResult<Reaction> {
        let removed = self
            .reactions
            .remove(name)
            .ok_or_else(|| NucnetError::UnknownReaction(name.to_string()))?;
        self.generation += 1;
        Ok(removed)
    }

    pub fn get(&self, name: &str) -> Option<&Reaction> {
        self.reactions.get(name)
    }

    /// Replace the rate data of a stored reaction.
    pub fn update_rate(&mut self, name: &str, rate: RateData) -> NucnetResult<()> {
        let reaction = self
            .reactions
            .get_mut(name)
            .ok_or_else(|| NucnetError::UnknownReaction(name.to_string()))?;
        reaction.set_rate(rate);
        Ok(())
    }

    /// Reactions in canonical-string order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Reaction)> {
        self.reactions.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn register_rate_function<F>(&mut self, key: &str, function: F)
    where
        F: Fn(&Reaction, f64, Option<&RateFunctionData>) -> NucnetResult<f64>
            + Send
            + Sync
            + 'static,
    {
        self.functions.insert(key.to_string(), Arc::new(function));
        self.generation += 1;
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.functions.contains_key(key)
    }

    pub fn rate_function(&self, key: &str) -> Option<&RateFunction> {
        self.functions.get(key)
    }

    /// Evaluate the registered forward rate of `reaction` at `t9`.
    pub fn compute_rate(
        &self,
        reaction: &Reaction,
        t9: f64,
        data: Option<&RateFunctionData>,
    ) -> NucnetResult<f64> {
        if t9.is_nan() || t9 <= 0.0 {
            return Err(NucnetError::InvalidTemperature(t9));
        }
        let key = reaction.rate_function_key().unwrap_or_default();
        let function =
            self.functions
                .get(key)
                .ok_or_else(|| NucnetError::UnregisteredRateFunction {
                    key: key.to_string(),
                    reaction: reaction.string(),
                })?;
        let rate = (**function)(reaction, t9, data)?;
        if !rate.is_finite() {
            return Err(NucnetError::InvalidRate {
                reaction: reaction.string(),
                t9,
                rate,
            });
        }
        Ok(rate)
    }

    /// Copies of every reaction whose participants repeat an earlier one,
    /// each linked to the first reaction seen with that participant set.
    pub fn duplicate_reactions(&self) -> NucnetResult<Vec<Reaction>> {
        let mut first_seen: HashMap<String, &str> = HashMap::new();
        let mut duplicates = Vec::new();
        for (name, reaction) in &self.reactions {
            let signature = reaction.duplicate_signature()?;
            match first_seen.get(&signature) {
                Some(parent) => {
                    let mut copy = reaction.clone();
                    copy.parent_duplicate = Some(parent.to_string());
                    duplicates.push(copy);
                }
                None => {
                    first_seen.insert(signature, name);
                }
            }
        }
        Ok(duplicates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_classification() {
        assert_eq!(Participant::parse("gamma"), Participant::Photon);
        assert!(Participant::parse("he4").is_nuclide());
        let p = Participant::parse("anti-neutrino_mu");
        match p {
            Participant::Lepton(l) => {
                assert_eq!(l.flavor(), LeptonFlavor::Mu);
                assert_eq!(l.charge(), 0);
                assert_eq!(l.lepton_number(), -1);
            }
            other => panic!("expected lepton, got {other:?}"),
        }
        assert_eq!(Lepton::from_name("positron").unwrap().charge(), 1);
        assert_eq!(Lepton::from_name("tau").unwrap().charge(), -1);
    }

    #[test]
    fn test_lepton_names_roundtrip() {
        for name in [
            "electron",
            "positron",
            "mu",
            "anti-mu",
            "tau",
            "anti-tau",
            "neutrino_e",
            "anti-neutrino_e",
            "neutrino_mu",
            "anti-neutrino_mu",
            "neutrino_tau",
            "anti-neutrino_tau",
        ] {
            assert_eq!(Lepton::from_name(name).unwrap().name(), name);
        }
    }

    #[test]
    fn test_reaction_string_orders_nuclides_first() {
        let r = Reaction::new()
            .reactant("electron")
            .reactant("h1")
            .product("n")
            .product("neutrino_e");
        assert_eq!(r.string(), "h1 + electron -> n + neutrino_e");
        let parsed: Reaction = "h1 + electron -> n + neutrino_e".parse().unwrap();
        assert_eq!(parsed.string(), r.string());
    }

    #[test]
    fn test_duplicate_factors() {
        let r: Reaction = "he4 + he4 + he4 -> c12 + gamma".parse().unwrap();
        assert_eq!(r.duplicate_reactant_factor(), 6.0);
        assert_eq!(r.duplicate_product_factor(), 1.0);
        let r: Reaction = "c12 + c12 -> ne20 + he4".parse().unwrap();
        assert_eq!(r.duplicate_reactant_factor(), 2.0);
        let r: Reaction = "h2 + h2 + h1 + h1 -> he4 + h1 + h1".parse().unwrap();
        assert_eq!(r.duplicate_reactant_factor(), 4.0);
        assert_eq!(r.duplicate_product_factor(), 2.0);
    }

    #[test]
    fn test_weak_classification() {
        let beta_plus: Reaction = "c11 -> b11 + positron + neutrino_e".parse().unwrap();
        assert!(beta_plus.is_weak());
        assert!(beta_plus.is_beta_plus());
        assert!(!beta_plus.is_positron_capture());

        let capture: Reaction = "n + positron -> h1 + anti-neutrino_e".parse().unwrap();
        assert!(capture.is_positron_capture());
        assert!(!capture.is_beta_plus());

        let strong: Reaction = "n + h1 -> h2 + gamma".parse().unwrap();
        assert!(!strong.is_weak());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("n + h1".parse::<Reaction>().is_err());
        assert!(" -> h2".parse::<Reaction>().is_err());
    }

    #[test]
    fn test_rate_table_clamps_and_interpolates() {
        let table = RateTable::with_sef(
            vec![1.0, 2.0, 3.0, 4.0],
            vec![1.0, 10.0, 100.0, 1000.0],
            vec![2.0, 2.0, 2.0, 2.0],
        )
        .unwrap();
        // Endpoints return the bare rate.
        assert_eq!(table.evaluate(0.5).unwrap(), 1.0);
        assert_eq!(table.evaluate(5.0).unwrap(), 1000.0);
        // log10 of the product is linear in t9 here, so the spline is exact.
        let v = table.evaluate(2.5).unwrap();
        let expected = 2.0 * 10f64.powf(1.5);
        assert!((v - expected).abs() / expected < 1e-10, "v = {v}");
    }

    #[test]
    fn test_two_point_rate_table() {
        let table = RateTable::new(vec![1.0, 3.0], vec![1.0, 100.0]).unwrap();
        let v = table.evaluate(2.0).unwrap();
        assert!((v - 10.0).abs() < 1e-9, "v = {v}");
    }

    #[test]
    fn test_non_smoker_fit_clamped() {
        let fit = NonSmokerFit::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.1);
        assert!((fit.evaluate(5.0) - 1f64.exp()).abs() < 1e-12);

        let fit = NonSmokerFit::new([0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0], 0.1).with_t_high_fit(2.0);
        assert!((fit.evaluate(9.0) - 2f64.exp()).abs() < 1e-12);
        assert!((fit.evaluate(0.01) - 0.1f64.exp()).abs() < 1e-12);
    }

    #[test]
    fn test_compute_rate_builtins_and_errors() {
        let reac = ReactionCatalog::new();
        let r = Reaction::new()
            .reactant("n")
            .product("h1")
            .with_rate(RateData::Single(3.5));
        assert_eq!(reac.compute_rate(&r, 1.0, None).unwrap(), 3.5);
        assert!(matches!(
            reac.compute_rate(&r, 0.0, None),
            Err(NucnetError::InvalidTemperature(_))
        ));

        let fits = vec![
            NonSmokerFit::new([0.0; 7], 0.01),
            NonSmokerFit::new([1f64.ln(), 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.01),
        ];
        let r = r.with_rate(RateData::NonSmoker(fits));
        assert!((reac.compute_rate(&r, 2.0, None).unwrap() - 2.0).abs() < 1e-12);

        let r = r.with_rate(RateData::User("my rate".to_string()));
        match reac.compute_rate(&r, 1.0, None) {
            Err(NucnetError::UnregisteredRateFunction { key, reaction }) => {
                assert_eq!(key, "my rate");
                assert_eq!(reaction, "n -> h1");
            }
            other => panic!("expected unregistered key error, got {other:?}"),
        }
    }

    #[test]
    fn test_user_rate_function_and_generation() {
        let mut reac = ReactionCatalog::new();
        let g0 = reac.generation();
        reac.register_rate_function("scaled", |r, t9, data| {
            let scale = data
                .and_then(|d| d.downcast_ref::<f64>())
                .copied()
                .unwrap_or(1.0);
            Ok(r.property_f64("base", None, None)? * t9 * scale)
        });
        assert!(reac.generation() > g0);
        assert!(reac.is_registered("scaled"));

        let r = Reaction::new()
            .reactant("n")
            .product("h1")
            .with_rate(RateData::User("scaled".to_string()))
            .with_property("base", None, None, "2.0")
            .unwrap();
        assert_eq!(reac.compute_rate(&r, 3.0, None).unwrap(), 6.0);
        let scale: f64 = 10.0;
        assert_eq!(reac.compute_rate(&r, 3.0, Some(&scale)).unwrap(), 60.0);
    }

    #[test]
    fn test_non_finite_rate_is_error() {
        let mut reac = ReactionCatalog::new();
        reac.register_rate_function("bad", |_, _, _| Ok(f64::INFINITY));
        let r = Reaction::new()
            .reactant("n")
            .product("h1")
            .with_rate(RateData::User("bad".to_string()));
        assert!(matches!(
            reac.compute_rate(&r, 1.0, None),
            Err(NucnetError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_duplicate_reactions_linked_to_first() {
        let mut reac = ReactionCatalog::new();
        reac.add("h1 + h1 -> h2 + positron + neutrino_e".parse().unwrap());
        reac.add("h2 + positron + neutrino_e -> h1 + h1".parse().unwrap());
        reac.add("n + h1 -> h2 + gamma".parse().unwrap());
        let dups = reac.duplicate_reactions().unwrap();
        assert_eq!(dups.len(), 1);
        let parent = dups[0].parent_duplicate().unwrap();
        assert_ne!(parent, dups[0].string());
        assert!(reac.get(parent).is_some());
    }

    #[test]
    fn test_add_remove_bumps_generation() {
        let mut reac = ReactionCatalog::new();
        let key = reac.add("n + h1 -> h2 + gamma".parse().unwrap());
        let g1 = reac.generation();
        assert_eq!(reac.len(), 1);
        reac.remove(&key).unwrap();
        assert!(reac.generation() > g1);
        assert!(matches!(reac.remove(&key), Err(NucnetError::UnknownReaction(_))));
    }
}
