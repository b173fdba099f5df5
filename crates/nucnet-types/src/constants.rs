// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical constants in CGS units and the derived MeV conversions used by
//! the equilibrium and Q-value calculations.

/// Speed of light (cm/s)
pub const SPEED_OF_LIGHT: f64 = 2.997_924_58e10;

/// Boltzmann constant (erg/K)
pub const K_BOLTZMANN: f64 = 1.380_650_4e-16;

/// Electron volt (erg)
pub const ELECTRON_VOLT: f64 = 1.602_176_487e-12;

/// Unified atomic mass unit (g)
pub const UNIFIED_ATOMIC_MASS: f64 = 1.660_538_782e-24;

/// Electron mass (g)
pub const MASS_ELECTRON: f64 = 9.109_381_88e-28;

/// Reduced Planck constant (erg s)
pub const HBAR: f64 = 1.054_571_628_25e-27;

/// Avogadro's number (1/mol)
pub const AVOGADRO: f64 = 6.022_141_99e23;

/// 10^9, the temperature unit behind T9.
pub const GIGA: f64 = 1.0e9;

/// MeV → erg
pub const MEV_TO_ERGS: f64 = 1.0e6 * ELECTRON_VOLT;

/// erg → MeV
pub const ERGS_TO_MEV: f64 = 1.0e-6 / ELECTRON_VOLT;

/// Rest energy of one atomic mass unit (MeV)
pub const AMU_TO_MEV: f64 = UNIFIED_ATOMIC_MASS * SPEED_OF_LIGHT * SPEED_OF_LIGHT * ERGS_TO_MEV;

/// Electron rest energy (MeV)
pub const MASS_ELECTRON_MEV: f64 = MASS_ELECTRON * SPEED_OF_LIGHT * SPEED_OF_LIGHT * ERGS_TO_MEV;

/// Reverse-rate exponent above which both rates are zeroed.
pub const REVERSE_EXPONENT_MAX: f64 = 115.13;

/// Reverse-rate exponent below which the reverse rate underflows to zero.
pub const REVERSE_EXPONENT_MIN: f64 = -300.0;

/// Floor added before logarithms and divisions by abundance changes.
pub const TINY: f64 = 1.0e-300;

/// Default upper validity temperature of a non-smoker fit (T9).
pub const NON_SMOKER_T_HIGH_DEFAULT: f64 = 10.0;
