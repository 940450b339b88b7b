//! aim-materials: headless host for aggregated materials search.
//!
//! Wires the [`materials_search`] core to a TOML configuration file and a
//! newline-delimited JSON bridge on stdin/stdout. All query semantics live
//! in the core crate; this crate only loads settings, installs logging and
//! moves requests and results across the process boundary.

pub mod config;
pub mod error;
pub mod host;

pub use config::AppConfig;
pub use error::{HostError, Result};
