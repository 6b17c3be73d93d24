//! Schema module - Configuration and geometry types for net evaluation.

mod config;
mod net;

pub use config::*;
pub use net::*;
