pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod parser;
pub mod types;

// Use cases and the ports they depend on
pub mod app;
// Adapters for HTTP and output
pub mod infra;

pub use error::{Result, TrackerError};
pub use types::{Carrier, TrackingResult, TrackingUpdate};
