// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Timestep Controller
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::network::Network;
use crate::zone::Zone;
use nucnet_types::config::TimestepConfig;
use nucnet_types::constants::TINY;
use nucnet_types::error::NucnetResult;

/// Next timestep from (abundance, change) pairs.
///
/// Grows `dt` by `1 + reg_t`, then caps it so that no species with
/// `Y > y_min` and a nonzero change moves by more than `reg_y` of itself.
pub fn limit_time_step<I>(dt: f64, reg_t: f64, reg_y: f64, y_min: f64, pairs: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut dt_new = (1.0 + reg_t) * dt;
    for (y, dy) in pairs {
        if y > y_min && dy != 0.0 {
            dt_new = dt_new.min(dt * reg_y * (y / (dy + TINY)).abs());
        }
    }
    dt_new
}

impl Zone {
    /// Overwrite `dt` with the step limited by the zone's current abundances
    /// and abundance changes.
    pub fn update_time_step(
        &self,
        net: &Network,
        dt: &mut f64,
        reg_t: f64,
        reg_y: f64,
        y_min: f64,
    ) -> NucnetResult<()> {
        self.check_network(net)?;
        let pairs = net.species().iter().map(|sp| {
            (
                self.species_abundance(sp.name()),
                self.species_abundance_change(sp.name()),
            )
        });
        *dt = limit_time_step(*dt, reg_t, reg_y, y_min, pairs);
        Ok(())
    }

    pub fn next_time_step(
        &self,
        net: &Network,
        dt: f64,
        config: &TimestepConfig,
    ) -> NucnetResult<f64> {
        let mut dt = dt;
        self.update_time_step(net, &mut dt, config.reg_t, config.reg_y, config.y_min)?;
        Ok(dt)
    }
}
