//! Models Module - Data Structures & Configuration
//!
//! Records, assessments, error codes and configuration objects.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
