// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Property-Based Tests (proptest) for nucnet-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for nucnet-types using proptest.
//!
//! Covers: configuration validation and serialization, label ordering,
//! nucleon counts.

use nucnet_types::config::{EvolutionConfig, TimestepConfig};
use nucnet_types::state::{NucleonType, ZoneLabel};
use proptest::prelude::*;

// ── Configuration ────────────────────────────────────────────────────

proptest! {
    /// Any non-negative finite step parameters validate and survive JSON.
    #[test]
    fn timestep_config_roundtrip(
        reg_t in 0.0f64..5.0,
        reg_y in 0.0f64..5.0,
        y_min in 0.0f64..1e-3,
        dt in 1e-20f64..1.0,
    ) {
        let cfg = EvolutionConfig {
            detailed_balance: reg_t > 1.0,
            initial_dt: dt,
            timestep: TimestepConfig { reg_t, reg_y, y_min },
        };
        prop_assert!(cfg.validate().is_ok());
        let json = serde_json::to_string(&cfg).unwrap();
        let back = EvolutionConfig::from_json_str(&json).unwrap();
        prop_assert_eq!(back, cfg);
    }

    /// Negative step parameters never validate.
    #[test]
    fn negative_reg_rejected(reg in -10.0f64..-1e-9) {
        let cfg = TimestepConfig { reg_t: 0.1, reg_y: reg, y_min: 1e-10 };
        prop_assert!(cfg.validate().is_err());
    }
}

// ── Labels and Nucleon Counts ────────────────────────────────────────

proptest! {
    /// N + Z always equals A.
    #[test]
    fn nucleon_counts_partition_mass(z in 0u32..120, n in 0u32..200) {
        let a = z + n;
        prop_assert_eq!(
            NucleonType::Z.count(z, a) + NucleonType::N.count(z, a),
            NucleonType::A.count(z, a)
        );
    }

    /// Labels order lexicographically by component.
    #[test]
    fn label_order_follows_first_component(a in "[a-z]{1,6}", b in "[a-z]{1,6}") {
        let la = ZoneLabel::single(&a);
        let lb = ZoneLabel::single(&b);
        prop_assert_eq!(la.cmp(&lb), a.cmp(&b));
    }
}
