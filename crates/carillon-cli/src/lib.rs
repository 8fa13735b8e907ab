//! Carillon CLI library - command implementations behind the `carillon`
//! binary, exposed as a library so integration tests can drive them
//! directly.

pub mod commands;
pub mod reporting;
