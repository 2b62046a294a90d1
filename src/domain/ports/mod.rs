//! Port trait definitions (Hexagonal Architecture)
//!
//! - Handler: the generic leveled-logging interface handed to third-party code

pub mod handler;

pub use handler::Handler;
