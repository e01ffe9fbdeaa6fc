//! Sending engine
//!
//! Gatekeeper and bookkeeper for every simulated send:
//! - warm-up ceiling per day
//! - recipient validation
//! - minimum interval between accepted sends
//! - statistics and rolling 24h quota usage

pub mod service;
pub mod warmup;
pub mod window;

pub use service::SesService;
pub use warmup::WarmupSchedule;
pub use window::SendWindow;
