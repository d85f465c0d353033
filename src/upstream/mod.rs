//! Upstream ML service integration.
//!
//! This module handles:
//! - The HTTP client used to proxy prediction requests
//! - The health probe, which absorbs failure into a status value

pub mod client;
pub mod probe;

pub use client::MlClient;
pub use probe::{check_health, DependencyHealth, DependencyStatus};
