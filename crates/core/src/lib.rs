//! Domain logic for the coflow change-order backend.
//!
//! Everything here is pure: no database, network, or filesystem access.
//! The `db`, `mail`, `pdf`, and `api` crates build on these types.

pub mod coerce;
pub mod error;
pub mod format;
pub mod line_item;
pub mod rollup;
pub mod status;
pub mod types;
pub mod validation;
