// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NucnetError {
    #[error("Baryon number not conserved in reaction {reaction}")]
    BaryonNotConserved { reaction: String },

    #[error("Charge not conserved in reaction {reaction}")]
    ChargeNotConserved { reaction: String },

    #[error("{flavor} lepton number not conserved in reaction {reaction}")]
    LeptonNotConserved { reaction: String, flavor: String },

    #[error("No rate function registered for key '{key}' (reaction {reaction})")]
    UnregisteredRateFunction { key: String, reaction: String },

    #[error("No rates in zone for reaction {0}")]
    RatesNotAssigned(String),

    #[error("View '{view}' is stale: parent network was updated")]
    StaleView { view: String },

    #[error("Network mismatch: expected network {expected}, found {found}")]
    NetworkMismatch { expected: u64, found: u64 },

    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    #[error("Unknown reaction: {0}")]
    UnknownReaction(String),

    #[error("Species already present: {0}")]
    DuplicateSpecies(String),

    #[error("Invalid rate {rate} for reaction {reaction} at t9 = {t9}")]
    InvalidRate { reaction: String, t9: f64, rate: f64 },

    #[error("Invalid temperature: t9 = {0}")]
    InvalidTemperature(f64),

    #[error("Invalid density: rho = {0}")]
    InvalidDensity(f64),

    #[error("Species '{0}' not present in network")]
    MissingNucleon(String),

    #[error("Invalid property: {0}")]
    InvalidProperty(String),

    #[error("Matrix index out of bounds: row={row}, col={col}")]
    MatrixOutOfBounds { row: usize, col: usize },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Linear algebra error: {0}")]
    LinAlg(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type NucnetResult<T> = Result<T, NucnetError>;
