//! Client for the Echosense call-analytics backend
//!
//! ## Usage
//!
//! ```rust,no_run
//! use echosense_core::api::AnalyticsClient;
//!
//! # async fn demo() -> echosense_core::Result<()> {
//! let client = AnalyticsClient::new("http://localhost:8000")?;
//! let stats = client.get_dashboard_stats(None).await?;
//! println!("{} calls in the last {} days", stats.total_calls, stats.period_days);
//! # Ok(())
//! # }
//! ```
//!
//! The client is an ordinary value: build it once and hand it to the code
//! that needs it. Tests swap the network out through [`Transport`].

mod client;
pub mod transport;
pub mod types;

pub use client::{
    AnalyticsClient, RequestOptions, DEFAULT_COMPLIANCE_DAYS, DEFAULT_DASHBOARD_DAYS,
    DEFAULT_RECENT_CALLS_LIMIT, DEFAULT_TRAINING_DAYS, DEFAULT_TREND_DAYS,
};
pub use transport::{
    ApiRequest, ApiResponse, AudioFile, FilePart, HttpTransport, Method, RequestBody, Transport,
    TransportError,
};
pub use types::*;
