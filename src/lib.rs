//! HTTP gateway in front of the pickup ML service.
//!
//! This library implements a small backend-for-frontend: it proxies
//! prediction requests to the ML service, accepts data payloads from
//! clients, and reports its own health plus the reachability of the
//! upstream dependency.
//!
//! # Request flow
//!
//! ```text
//! client ──HTTP──> gateway ──HTTP──> ml-service
//!                    │
//!                    └── /health, /health/detailed, /metrics
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`upstream`]: ML service client and health probe
//! - [`health`]: Health report assembly
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod metrics;
pub mod upstream;
pub mod utils;

pub use config::Config;
pub use error::{GatewayError, Result};
