//! ses-mock: Mock email-sending API
//!
//! An in-memory stand-in for a cloud email-sending service, for tests and
//! local development. Nothing is delivered.
//!
//! # Features
//!
//! - **Quota tracking**: 24-hour send quota and rolling usage
//! - **Warm-up**: daily send ceiling that grows day by day
//! - **Throttling**: minimum interval between accepted sends
//! - **Statistics**: basic and detailed send statistics
//! - **Metrics**: Prometheus counters for accepted, throttled and failed sends
//!
//! # Example
//!
//! ```no_run
//! use ses_mock::engine::SesService;
//! use ses_mock::metrics::SendMetrics;
//! use ses_mock::models::SendEmailInput;
//! use std::sync::Arc;
//!
//! let service = SesService::new(Arc::new(SendMetrics::new()));
//! let output = service
//!     .send_email(&SendEmailInput::new("user@example.com", "Hello", "Body"))
//!     .unwrap();
//! println!("sent {}", output.message_id);
//! ```
//!
//! # Modules
//!
//! - [`engine`]: Sending engine (warm-up, throttling, statistics)
//! - [`api`]: HTTP transport
//! - [`metrics`]: Send counters
//! - [`utils`]: Address validation

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod models;
pub mod utils;

pub use config::SesMockConfig;
pub use engine::SesService;
pub use error::{Result, SesError};
