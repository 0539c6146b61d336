//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod change_order;
pub mod dashboard;
pub mod delay_notice;
pub mod line_item;
pub mod project;
