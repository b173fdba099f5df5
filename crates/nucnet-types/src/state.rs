// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{NucnetError, NucnetResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label used when a zone or view label component is left unspecified.
pub const DEFAULT_LABEL: &str = "0";

/// Three-part compound label naming a zone or a cached view.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneLabel(pub String, pub String, pub String);

impl ZoneLabel {
    pub fn new(label1: &str, label2: &str, label3: &str) -> Self {
        ZoneLabel(label1.to_string(), label2.to_string(), label3.to_string())
    }

    /// Label with only the first component set; the others default to "0".
    pub fn single(label1: &str) -> Self {
        ZoneLabel::new(label1, DEFAULT_LABEL, DEFAULT_LABEL)
    }
}

impl Default for ZoneLabel {
    fn default() -> Self {
        ZoneLabel::single(DEFAULT_LABEL)
    }
}

impl fmt::Display for ZoneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.0, self.1, self.2)
    }
}

/// Key of an optional property: a name plus up to two tags. A second tag
/// is only meaningful under a first one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyKey {
    pub name: String,
    pub tag1: Option<String>,
    pub tag2: Option<String>,
}

impl PropertyKey {
    pub fn new(name: &str, tag1: Option<&str>, tag2: Option<&str>) -> NucnetResult<Self> {
        if tag2.is_some() && tag1.is_none() {
            return Err(NucnetError::InvalidProperty(format!(
                "property '{name}' has tag2 without tag1"
            )));
        }
        Ok(PropertyKey {
            name: name.to_string(),
            tag1: tag1.map(str::to_string),
            tag2: tag2.map(str::to_string),
        })
    }

    pub fn simple(name: &str) -> Self {
        PropertyKey {
            name: name.to_string(),
            tag1: None,
            tag2: None,
        }
    }
}

/// Forward and reverse rates cached for one reaction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rates {
    pub forward: f64,
    pub reverse: f64,
}

impl Rates {
    pub fn new(forward: f64, reverse: f64) -> Self {
        Rates { forward, reverse }
    }
}

/// Nucleon count used to group abundances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NucleonType {
    /// Proton number
    Z,
    /// Neutron number
    N,
    /// Mass number
    A,
}

impl NucleonType {
    /// Pick the matching count out of (Z, A).
    pub fn count(self, z: u32, a: u32) -> u32 {
        match self {
            NucleonType::Z => z,
            NucleonType::N => a - z,
            NucleonType::A => a,
        }
    }
}

impl FromStr for NucleonType {
    type Err = NucnetError;

    fn from_str(s: &str) -> NucnetResult<Self> {
        match s {
            "z" | "Z" => Ok(NucleonType::Z),
            "n" | "N" => Ok(NucleonType::N),
            "a" | "A" => Ok(NucleonType::A),
            other => Err(NucnetError::InvalidProperty(format!(
                "nucleon type must be z, n or a, got '{other}'"
            ))),
        }
    }
}
