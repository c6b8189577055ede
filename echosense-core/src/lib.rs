//! # echosense-core
//!
//! Core library for echosense - a client for the Echosense call-analytics backend.
//!
//! This library provides:
//! - A typed async client for the backend REST API
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use echosense_core::{AnalyticsClient, Config};
//!
//! # async fn demo() -> echosense_core::Result<()> {
//! let config = Config::load()?;
//! let client = AnalyticsClient::from_config(&config.client)?;
//! client.delete_call("abc123").await?;
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use api::{AnalyticsClient, AudioFile};
pub use config::Config;
pub use error::{Error, Result};

// Public modules
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
