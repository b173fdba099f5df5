// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Zone
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-zone composition state and caches.
//!
//! A zone is created against one network and records that network's id.
//! Every operation that reads the catalogs takes the network explicitly and
//! rejects a foreign one with [`NucnetError::NetworkMismatch`]. Abundances
//! are stored sparsely: a zero value is an absent entry.

use crate::network::{Network, NseCorrectionFn};
use crate::reaction::{RateFunctionData, Reaction};
use crate::species::Species;
use crate::view::NetView;
use ndarray::Array1;
use nucnet_math::sparse::value_is_zero;
use nucnet_types::config::EvolutionConfig;
use nucnet_types::error::{NucnetError, NucnetResult};
use nucnet_types::state::{NucleonType, PropertyKey, Rates, ZoneLabel};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// First label of the view used by rate, Jacobian and flow computation.
pub const EVOLUTION_NETWORK: &str = "evolution network";

/// Screening hook: (network, reaction, T9, rho, Ye) -> (forward factor,
/// reverse factor). Hook data is whatever the closure captures.
pub type ScreeningFunction =
    dyn Fn(&Network, &Reaction, f64, f64, f64) -> NucnetResult<(f64, f64)> + Send + Sync;

pub struct Zone {
    pub(crate) network_id: u64,
    pub(crate) label: ZoneLabel,
    pub(crate) abundances: HashMap<String, f64>,
    pub(crate) abundance_changes: HashMap<String, f64>,
    pub(crate) rates: HashMap<String, Rates>,
    pub(crate) properties: BTreeMap<PropertyKey, String>,
    pub(crate) rate_function_data: HashMap<String, Box<RateFunctionData>>,
    pub(crate) views: BTreeMap<ZoneLabel, NetView>,
    pub(crate) screening: Option<Box<ScreeningFunction>>,
    pub(crate) nse_correction: Option<Box<NseCorrectionFn>>,
    pub(crate) detailed_balance: bool,
}

impl fmt::Debug for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zone")
            .field("network_id", &self.network_id)
            .field("label", &self.label)
            .field("abundances", &self.abundances.len())
            .field("rates", &self.rates.len())
            .field("views", &self.views.keys().collect::<Vec<_>>())
            .field("screening", &self.screening.is_some())
            .field("nse_correction", &self.nse_correction.is_some())
            .field("detailed_balance", &self.detailed_balance)
            .finish()
    }
}

fn evolution_label() -> ZoneLabel {
    ZoneLabel::single(EVOLUTION_NETWORK)
}

fn set_or_remove(map: &mut HashMap<String, f64>, name: &str, value: f64) {
    if value_is_zero(value) {
        map.remove(name);
    } else {
        map.insert(name.to_string(), value);
    }
}

impl Zone {
    pub fn new(net: &Network, label: ZoneLabel) -> Self {
        Zone {
            network_id: net.id(),
            label,
            abundances: HashMap::new(),
            abundance_changes: HashMap::new(),
            rates: HashMap::new(),
            properties: BTreeMap::new(),
            rate_function_data: HashMap::new(),
            views: BTreeMap::new(),
            screening: None,
            nse_correction: None,
            detailed_balance: true,
        }
    }

    pub fn network_id(&self) -> u64 {
        self.network_id
    }

    pub fn label(&self) -> &ZoneLabel {
        &self.label
    }

    pub(crate) fn set_label(&mut self, label: ZoneLabel) {
        self.label = label;
    }

    pub fn check_network(&self, net: &Network) -> NucnetResult<()> {
        if self.network_id != net.id() {
            return Err(NucnetError::NetworkMismatch {
                expected: self.network_id,
                found: net.id(),
            });
        }
        Ok(())
    }

    fn species<'n>(&self, net: &'n Network, name: &str) -> NucnetResult<&'n Species> {
        self.check_network(net)?;
        net.species()
            .by_name(name)
            .ok_or_else(|| NucnetError::UnknownSpecies(name.to_string()))
    }

    // ── Abundances ───────────────────────────────────────────────────

    /// Abundance of a species; 0 when absent.
    pub fn species_abundance(&self, name: &str) -> f64 {
        self.abundances.get(name).copied().unwrap_or(0.0)
    }

    pub fn update_species_abundance(
        &mut self,
        net: &Network,
        name: &str,
        y: f64,
    ) -> NucnetResult<()> {
        self.species(net, name)?;
        set_or_remove(&mut self.abundances, name, y);
        Ok(())
    }

    pub fn species_abundance_change(&self, name: &str) -> f64 {
        self.abundance_changes.get(name).copied().unwrap_or(0.0)
    }

    pub fn update_species_abundance_change(
        &mut self,
        net: &Network,
        name: &str,
        dy: f64,
    ) -> NucnetResult<()> {
        self.species(net, name)?;
        set_or_remove(&mut self.abundance_changes, name, dy);
        Ok(())
    }

    /// Number of species with a stored (nonzero) abundance.
    pub fn number_of_abundances(&self) -> usize {
        self.abundances.len()
    }

    fn export(&self, net: &Network, map: &HashMap<String, f64>) -> NucnetResult<Array1<f64>> {
        self.check_network(net)?;
        Ok(net
            .species()
            .iter()
            .map(|sp| map.get(sp.name()).copied().unwrap_or(0.0))
            .collect())
    }

    fn import(
        net: &Network,
        map: &mut HashMap<String, f64>,
        values: &Array1<f64>,
    ) -> NucnetResult<()> {
        let n = net.species().len();
        if values.len() != n {
            return Err(NucnetError::DimensionMismatch {
                expected: n,
                got: values.len(),
            });
        }
        map.clear();
        for (sp, &v) in net.species().iter().zip(values.iter()) {
            set_or_remove(map, sp.name(), v);
        }
        Ok(())
    }

    /// Abundances ordered by species index.
    pub fn abundances(&self, net: &Network) -> NucnetResult<Array1<f64>> {
        self.export(net, &self.abundances)
    }

    pub fn update_abundances(&mut self, net: &Network, y: &Array1<f64>) -> NucnetResult<()> {
        self.check_network(net)?;
        Self::import(net, &mut self.abundances, y)
    }

    pub fn abundance_changes(&self, net: &Network) -> NucnetResult<Array1<f64>> {
        self.export(net, &self.abundance_changes)
    }

    pub fn update_abundance_changes(
        &mut self,
        net: &Network,
        dy: &Array1<f64>,
    ) -> NucnetResult<()> {
        self.check_network(net)?;
        Self::import(net, &mut self.abundance_changes, dy)
    }

    fn moment<F>(&self, net: &Network, n: i32, weight: F) -> NucnetResult<f64>
    where
        F: Fn(&Species) -> u32,
    {
        self.check_network(net)?;
        Ok(net
            .species()
            .iter()
            .map(|sp| self.species_abundance(sp.name()) * (weight(sp) as f64).powi(n))
            .sum())
    }

    /// Σ Y·A^n over the catalog.
    pub fn a_moment(&self, net: &Network, n: i32) -> NucnetResult<f64> {
        self.moment(net, n, Species::a)
    }

    /// Σ Y·Z^n over the catalog. The first moment is Ye.
    pub fn z_moment(&self, net: &Network, n: i32) -> NucnetResult<f64> {
        self.moment(net, n, Species::z)
    }

    /// Abundances summed by nucleon number, indexed 0..=largest.
    pub fn summed_abundances(&self, net: &Network, kind: NucleonType) -> NucnetResult<Array1<f64>> {
        self.check_network(net)?;
        let mut sums =
            Array1::<f64>::zeros(net.species().largest_nucleon_number(kind) as usize + 1);
        for sp in net.species().iter() {
            sums[kind.count(sp.z(), sp.a()) as usize] += self.species_abundance(sp.name());
        }
        Ok(sums)
    }

    // ── Properties ───────────────────────────────────────────────────

    pub fn property(&self, name: &str, tag1: Option<&str>, tag2: Option<&str>) -> Option<&str> {
        let key = PropertyKey::new(name, tag1, tag2).ok()?;
        self.properties.get(&key).map(String::as_str)
    }

    pub fn property_f64(
        &self,
        name: &str,
        tag1: Option<&str>,
        tag2: Option<&str>,
    ) -> NucnetResult<f64> {
        let raw = self.property(name, tag1, tag2).ok_or_else(|| {
            NucnetError::InvalidProperty(format!("zone {} has no property '{name}'", self.label))
        })?;
        raw.trim().parse::<f64>().map_err(|e| {
            NucnetError::InvalidProperty(format!(
                "property '{name}' = '{raw}' of zone {}: {e}",
                self.label
            ))
        })
    }

    pub fn update_property(
        &mut self,
        name: &str,
        tag1: Option<&str>,
        tag2: Option<&str>,
        value: &str,
    ) -> NucnetResult<()> {
        self.properties
            .insert(PropertyKey::new(name, tag1, tag2)?, value.to_string());
        Ok(())
    }

    pub fn remove_property(
        &mut self,
        name: &str,
        tag1: Option<&str>,
        tag2: Option<&str>,
    ) -> NucnetResult<bool> {
        let key = PropertyKey::new(name, tag1, tag2)?;
        Ok(self.properties.remove(&key).is_some())
    }

    pub fn properties(&self) -> impl Iterator<Item = (&PropertyKey, &str)> {
        self.properties.iter().map(|(k, v)| (k, v.as_str()))
    }

    // ── Rate-function data ───────────────────────────────────────────

    /// Attach data handed to the rate function registered under `key`.
    /// Replaces (and drops) any previous data for the key.
    pub fn update_rate_function_data<T>(
        &mut self,
        net: &Network,
        key: &str,
        data: T,
    ) -> NucnetResult<()>
    where
        T: Any + Send + Sync,
    {
        self.check_network(net)?;
        if !net.reactions().is_registered(key) {
            return Err(NucnetError::UnregisteredRateFunction {
                key: key.to_string(),
                reaction: format!("zone {}", self.label),
            });
        }
        self.rate_function_data.insert(key.to_string(), Box::new(data));
        Ok(())
    }

    pub fn rate_function_data(&self, key: &str) -> Option<&RateFunctionData> {
        self.rate_function_data.get(key).map(|b| &**b)
    }

    pub fn remove_rate_function_data(&mut self, key: &str) -> bool {
        self.rate_function_data.remove(key).is_some()
    }

    // ── Rate cache ───────────────────────────────────────────────────

    /// Cached rates of a reaction. Rates must have been computed first.
    pub fn rates_for_reaction(&self, name: &str) -> NucnetResult<Rates> {
        self.rates
            .get(name)
            .copied()
            .ok_or_else(|| NucnetError::RatesNotAssigned(name.to_string()))
    }

    /// Overwrite the cached rates of a network reaction.
    pub fn update_rates_for_reaction(
        &mut self,
        net: &Network,
        name: &str,
        rates: Rates,
    ) -> NucnetResult<()> {
        self.check_network(net)?;
        if net.reactions().get(name).is_none() {
            return Err(NucnetError::UnknownReaction(name.to_string()));
        }
        self.rates.insert(name.to_string(), rates);
        Ok(())
    }

    pub fn clear_rates(&mut self) {
        self.rates.clear();
    }

    pub fn number_of_cached_rates(&self) -> usize {
        self.rates.len()
    }

    // ── Settings and hooks ───────────────────────────────────────────

    pub fn detailed_balance(&self) -> bool {
        self.detailed_balance
    }

    pub fn set_detailed_balance(&mut self, enabled: bool) {
        self.detailed_balance = enabled;
    }

    pub fn apply_config(&mut self, config: &EvolutionConfig) {
        self.detailed_balance = config.detailed_balance;
    }

    pub fn set_screening<F>(&mut self, function: F)
    where
        F: Fn(&Network, &Reaction, f64, f64, f64) -> NucnetResult<(f64, f64)>
            + Send
            + Sync
            + 'static,
    {
        self.screening = Some(Box::new(function));
    }

    pub fn clear_screening(&mut self) {
        self.screening = None;
    }

    pub fn has_screening(&self) -> bool {
        self.screening.is_some()
    }

    pub fn set_nse_correction<F>(&mut self, function: F)
    where
        F: Fn(&Species, f64, f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.nse_correction = Some(Box::new(function));
    }

    pub fn clear_nse_correction(&mut self) {
        self.nse_correction = None;
    }

    pub fn nse_correction(&self) -> Option<&NseCorrectionFn> {
        self.nse_correction.as_deref()
    }

    // ── View cache ───────────────────────────────────────────────────

    pub fn view(&self, label: &ZoneLabel) -> Option<&NetView> {
        self.views.get(label)
    }

    pub fn update_view(
        &mut self,
        net: &Network,
        label: ZoneLabel,
        view: NetView,
    ) -> NucnetResult<()> {
        self.check_network(net)?;
        view.ensure_current(net, &label.to_string())?;
        self.views.insert(label, view);
        Ok(())
    }

    pub fn remove_view(&mut self, label: &ZoneLabel) -> Option<NetView> {
        self.views.remove(label)
    }

    pub fn clear_views(&mut self) {
        self.views.clear();
    }

    pub fn number_of_views(&self) -> usize {
        self.views.len()
    }

    /// Cached view under `label`, built from the filters when absent and
    /// rebuilt when the network has changed since it was cached.
    pub fn get_or_build_view<N, R>(
        &mut self,
        net: &Network,
        label: ZoneLabel,
        nuc_filter: N,
        reac_filter: R,
    ) -> NucnetResult<&NetView>
    where
        N: Fn(&Species) -> bool,
        R: Fn(&Reaction) -> bool,
    {
        self.check_network(net)?;
        let rebuild = match self.views.get(&label) {
            Some(view) => view.was_parent_updated(net),
            None => true,
        };
        if rebuild {
            let view = NetView::new(net, nuc_filter, reac_filter)?;
            self.views.insert(label.clone(), view);
        }
        self.views
            .get(&label)
            .ok_or_else(|| NucnetError::StaleView {
                view: label.to_string(),
            })
    }

    /// Replace the view used for rates, the Jacobian and flows.
    pub fn set_evolution_view(&mut self, net: &Network, view: NetView) -> NucnetResult<()> {
        self.update_view(net, evolution_label(), view)
    }

    pub fn evolution_view(&self) -> Option<&NetView> {
        self.views.get(&evolution_label())
    }

    /// Build the evolution view from the whole network when absent. A cached
    /// view whose network has since changed is an error, not a rebuild.
    pub(crate) fn ensure_evolution_view(&mut self, net: &Network) -> NucnetResult<()> {
        self.check_network(net)?;
        let label = evolution_label();
        match self.views.get(&label) {
            Some(view) => view.ensure_current(net, EVOLUTION_NETWORK),
            None => {
                self.views.insert(label, NetView::all(net)?);
                Ok(())
            }
        }
    }

    pub(crate) fn current_evolution_view(&self) -> NucnetResult<&NetView> {
        self.evolution_view().ok_or_else(|| NucnetError::StaleView {
            view: EVOLUTION_NETWORK.to_string(),
        })
    }

    /// Copy of abundances, changes, properties and cached views. Rates,
    /// hooks and rate-function data are not carried over.
    pub fn copy(&self) -> Zone {
        Zone {
            network_id: self.network_id,
            label: self.label.clone(),
            abundances: self.abundances.clone(),
            abundance_changes: self.abundance_changes.clone(),
            rates: HashMap::new(),
            properties: self.properties.clone(),
            rate_function_data: HashMap::new(),
            views: self.views.clone(),
            screening: None,
            nse_correction: None,
            detailed_balance: self.detailed_balance,
        }
    }
}

/// Look up a view reaction in its parent network.
pub(crate) fn network_reaction<'n>(net: &'n Network, name: &str) -> NucnetResult<&'n Reaction> {
    net.reactions()
        .get(name)
        .ok_or_else(|| NucnetError::UnknownReaction(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::tests::light_network;
    use crate::reaction::RateData;
    use ndarray::array;

    #[test]
    fn test_zero_abundance_is_absent() {
        let net = light_network();
        let mut zone = Zone::new(&net, ZoneLabel::single("1"));
        zone.update_species_abundance(&net, "he4", 0.25).unwrap();
        assert_eq!(zone.species_abundance("he4"), 0.25);
        assert_eq!(zone.number_of_abundances(), 1);
        zone.update_species_abundance(&net, "he4", 0.0).unwrap();
        assert_eq!(zone.number_of_abundances(), 0);
        assert_eq!(zone.species_abundance("he4"), 0.0);
    }

    #[test]
    fn test_unknown_species_rejected() {
        let net = light_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        assert!(matches!(
            zone.update_species_abundance(&net, "fe56", 0.1),
            Err(NucnetError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn test_foreign_network_rejected() {
        let net = light_network();
        let other = light_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        assert!(matches!(
            zone.update_species_abundance(&other, "he4", 0.1),
            Err(NucnetError::NetworkMismatch { .. })
        ));
        assert!(zone.abundances(&other).is_err());
    }

    #[test]
    fn test_vector_roundtrip_by_index() {
        let net = light_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        let y = array![0.1, 0.2, 0.0, 0.0, 0.05];
        zone.update_abundances(&net, &y).unwrap();
        assert_eq!(zone.number_of_abundances(), 3);
        assert_eq!(zone.species_abundance("h1"), 0.2);
        assert_eq!(zone.abundances(&net).unwrap(), y);
        assert!(matches!(
            zone.update_abundances(&net, &array![1.0]),
            Err(NucnetError::DimensionMismatch { expected: 5, got: 1 })
        ));
    }

    #[test]
    fn test_moments_and_sums() {
        let net = light_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        zone.update_species_abundance(&net, "n", 0.1).unwrap();
        zone.update_species_abundance(&net, "h1", 0.5).unwrap();
        zone.update_species_abundance(&net, "he4", 0.1).unwrap();
        let ye = zone.z_moment(&net, 1).unwrap();
        assert!((ye - 0.7).abs() < 1e-15);
        let mass = zone.a_moment(&net, 1).unwrap();
        assert!((mass - 1.0).abs() < 1e-15);

        let by_a = zone.summed_abundances(&net, NucleonType::A).unwrap();
        assert_eq!(by_a.len(), 5);
        assert!((by_a[1] - 0.6).abs() < 1e-15);
        assert_eq!(by_a[4], 0.1);
    }

    #[test]
    fn test_property_tags() {
        let net = light_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        zone.update_property("t9", None, None, "1.5").unwrap();
        zone.update_property("mu", Some("electron"), None, "0.3").unwrap();
        assert!(zone.update_property("x", None, Some("b"), "1").is_err());
        assert_eq!(zone.property_f64("t9", None, None).unwrap(), 1.5);
        assert_eq!(zone.property("mu", Some("electron"), None), Some("0.3"));
        assert!(zone.property("mu", None, None).is_none());
        assert!(zone.remove_property("t9", None, None).unwrap());
        assert!(zone.property_f64("t9", None, None).is_err());
    }

    #[test]
    fn test_rates_must_be_computed_first() {
        let net = light_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        assert!(matches!(
            zone.rates_for_reaction("n + h1 -> h2 + gamma"),
            Err(NucnetError::RatesNotAssigned(_))
        ));
        zone.update_rates_for_reaction(&net, "n + h1 -> h2 + gamma", Rates::new(2.0, 1.0))
            .unwrap();
        assert_eq!(
            zone.rates_for_reaction("n + h1 -> h2 + gamma").unwrap(),
            Rates::new(2.0, 1.0)
        );
        assert!(zone
            .update_rates_for_reaction(&net, "no -> such", Rates::default())
            .is_err());
        zone.clear_rates();
        assert_eq!(zone.number_of_cached_rates(), 0);
    }

    #[test]
    fn test_rate_function_data_requires_registered_key() {
        let net = light_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        assert!(zone.update_rate_function_data(&net, "nope", 1.0f64).is_err());
        zone.update_rate_function_data(&net, crate::reaction::SINGLE_RATE, 2.5f64)
            .unwrap();
        let data = zone.rate_function_data(crate::reaction::SINGLE_RATE).unwrap();
        assert_eq!(data.downcast_ref::<f64>(), Some(&2.5));
        assert!(zone.remove_rate_function_data(crate::reaction::SINGLE_RATE));
    }

    #[test]
    fn test_evolution_view_built_then_stale_is_error() {
        let mut net = light_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        assert!(zone.evolution_view().is_none());
        zone.ensure_evolution_view(&net).unwrap();
        assert_eq!(zone.evolution_view().unwrap().number_of_reactions(), 3);

        net.reactions_mut().add(
            "h1 + h2 -> he3 + gamma"
                .parse::<Reaction>()
                .unwrap()
                .with_rate(RateData::Single(1.0)),
        );
        assert!(matches!(
            zone.ensure_evolution_view(&net),
            Err(NucnetError::StaleView { .. })
        ));
        zone.clear_views();
        zone.ensure_evolution_view(&net).unwrap();
        assert_eq!(zone.evolution_view().unwrap().number_of_reactions(), 4);
    }

    #[test]
    fn test_get_or_build_view_rebuilds_stale() {
        let mut net = light_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        let label = ZoneLabel::new("no neutrons", "0", "0");
        let count = zone
            .get_or_build_view(&net, label.clone(), |sp| sp.z() > 0, |_| true)
            .unwrap()
            .number_of_reactions();
        assert_eq!(count, 1);
        net.species_mut().remove("h2").unwrap();
        let count = zone
            .get_or_build_view(&net, label, |sp| sp.z() > 0, |_| true)
            .unwrap()
            .number_of_reactions();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_copy_excludes_rates_and_hooks() {
        let net = light_network();
        let mut zone = Zone::new(&net, ZoneLabel::single("a"));
        zone.update_species_abundance(&net, "h1", 0.7).unwrap();
        zone.update_species_abundance_change(&net, "h1", -0.1).unwrap();
        zone.update_property("t9", None, None, "2").unwrap();
        zone.update_rates_for_reaction(&net, "n + h1 -> h2 + gamma", Rates::new(1.0, 0.0))
            .unwrap();
        zone.set_screening(|_, _, _, _, _| Ok((1.0, 1.0)));
        zone.ensure_evolution_view(&net).unwrap();

        let copy = zone.copy();
        assert_eq!(copy.species_abundance("h1"), 0.7);
        assert_eq!(copy.species_abundance_change("h1"), -0.1);
        assert_eq!(copy.property("t9", None, None), Some("2"));
        assert_eq!(copy.number_of_views(), 1);
        assert_eq!(copy.number_of_cached_rates(), 0);
        assert!(!copy.has_screening());
    }

    #[test]
    fn test_apply_config() {
        let net = light_network();
        let mut zone = Zone::new(&net, ZoneLabel::default());
        assert!(zone.detailed_balance());
        let config = EvolutionConfig {
            detailed_balance: false,
            ..EvolutionConfig::default()
        };
        zone.apply_config(&config);
        assert!(!zone.detailed_balance());
    }
}
