//! Domain layer for the logging facility
//!
//! Pure models (levels, generic records, security events) and the port
//! trait that third-party code logs through. Nothing here performs I/O.

pub mod models;
pub mod ports;
