//! Nuclear reaction network engine.
//!
//! Catalogs and validation: species, reaction, network, view
//! Per-zone state and kernels: zone, rates, screening, jacobian, timestep
//! Multi-zone container: collection

pub mod collection;
pub mod jacobian;
pub mod network;
pub mod rates;
pub mod reaction;
pub mod screening;
pub mod species;
pub mod timestep;
pub mod view;
pub mod zone;
