// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Multi-Zone Container
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! A network together with the zones built against it.
//!
//! Zones are independent: per-zone rate computation runs in parallel with
//! rayon while the network is shared read-only. Catalog mutation goes
//! through [`Nucnet::network_mut`], which needs exclusive access and so can
//! never overlap a parallel pass.

use crate::network::Network;
use crate::zone::Zone;
use log::debug;
use nucnet_types::error::{NucnetError, NucnetResult};
use nucnet_types::state::ZoneLabel;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Zone property holding T9 for [`zone_conditions`].
pub const T9_PROPERTY: &str = "t9";
/// Zone property holding the mass density (g/cc) for [`zone_conditions`].
pub const RHO_PROPERTY: &str = "rho";

#[derive(Debug)]
pub struct Nucnet {
    net: Network,
    zones: BTreeMap<ZoneLabel, Zone>,
}

/// (T9, rho) taken from a zone's "t9" and "rho" properties.
pub fn zone_conditions(zone: &Zone) -> NucnetResult<(f64, f64)> {
    Ok((
        zone.property_f64(T9_PROPERTY, None, None)?,
        zone.property_f64(RHO_PROPERTY, None, None)?,
    ))
}

impl Nucnet {
    pub fn new(net: Network) -> Self {
        Nucnet {
            net,
            zones: BTreeMap::new(),
        }
    }

    pub fn network(&self) -> &Network {
        &self.net
    }

    /// Exclusive access to the catalogs. Any mutation stales the views
    /// cached in every zone.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.net
    }

    /// Insert a zone under its own label, returning the zone it replaced.
    pub fn add_zone(&mut self, zone: Zone) -> NucnetResult<Option<Zone>> {
        zone.check_network(&self.net)?;
        Ok(self.zones.insert(zone.label().clone(), zone))
    }

    /// Empty zone under `label`, or the zone already there.
    pub fn new_zone(&mut self, label: ZoneLabel) -> &mut Zone {
        let zone = Zone::new(&self.net, label.clone());
        self.zones.entry(label).or_insert(zone)
    }

    pub fn zone(&self, label: &ZoneLabel) -> Option<&Zone> {
        self.zones.get(label)
    }

    /// The network alongside a zone, for calls that need both.
    pub fn zone_mut(&mut self, label: &ZoneLabel) -> Option<(&Network, &mut Zone)> {
        let net = &self.net;
        self.zones.get_mut(label).map(|zone| (net, zone))
    }

    pub fn remove_zone(&mut self, label: &ZoneLabel) -> Option<Zone> {
        self.zones.remove(label)
    }

    /// Move a zone to a new label. The target label must be free.
    pub fn relabel_zone(&mut self, from: &ZoneLabel, to: ZoneLabel) -> NucnetResult<()> {
        if self.zones.contains_key(&to) {
            return Err(NucnetError::InvalidProperty(format!("zone {to} already exists")));
        }
        let mut zone = self
            .zones
            .remove(from)
            .ok_or_else(|| NucnetError::InvalidProperty(format!("no zone {from}")))?;
        zone.set_label(to.clone());
        self.zones.insert(to, zone);
        Ok(())
    }

    pub fn number_of_zones(&self) -> usize {
        self.zones.len()
    }

    /// Zones in label order.
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    pub fn sorted_zones<F>(&self, mut compare: F) -> Vec<&Zone>
    where
        F: FnMut(&Zone, &Zone) -> Ordering,
    {
        let mut zones: Vec<&Zone> = self.zones.values().collect();
        zones.sort_by(|a, b| compare(a, b));
        zones
    }

    pub fn clear_zones(&mut self) {
        self.zones.clear();
    }

    /// Run the rate pipeline in every zone in parallel, each at the
    /// (T9, rho) that `conditions` reads from it.
    pub fn compute_rates_in_zones<F>(&mut self, conditions: F) -> NucnetResult<()>
    where
        F: Fn(&Zone) -> NucnetResult<(f64, f64)> + Sync,
    {
        let net = &self.net;
        debug!(
            "Computing rates in {} zones on {} threads",
            self.zones.len(),
            rayon::current_num_threads()
        );
        self.zones.par_iter_mut().try_for_each(|(_, zone)| {
            let (t9, rho) = conditions(&*zone)?;
            zone.compute_rates(net, t9, rho)
        })
    }
}
