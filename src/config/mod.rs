//! Configuration module for the research assistant.
//!
//! Provides CLI argument parsing, credential loading and the jurisdiction tables.

#[allow(clippy::module_inception)]
mod config;
pub mod jurisdictions;
pub mod templates;

pub use config::{ApiKey, AppConfig, OutputFormat};
pub use jurisdictions::Jurisdiction;
