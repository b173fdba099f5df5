//! Mathematical primitives for the SCPN reaction network.

pub mod interp;
pub mod sparse;
pub mod tridiag;
