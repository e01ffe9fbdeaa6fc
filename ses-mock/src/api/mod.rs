//! REST API module for ses-mock
//!
//! Maps HTTP requests onto the sending engine and serializes the results

pub mod handlers;
pub mod server;

pub use handlers::{ApiError, AppState};
pub use server::ApiServer;
