//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the playlist manager:
//! - Engine configuration with fail-fast validation
//! - Logging and tracing initialization
//!
//! ## Overview
//!
//! Every other crate reads its tunables from [`EngineConfig`](config::EngineConfig)
//! and logs through `tracing`; this crate owns both so that the binary can
//! configure them once at startup.

pub mod config;
pub mod error;
pub mod logging;

pub use config::EngineConfig;
pub use error::{Error, Result};
