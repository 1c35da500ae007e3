//! # letterbox-core
//!
//! Shared vocabulary for the Letterbox end-to-end suite: the unified error
//! taxonomy, suite configuration and the per-scenario outcome records that
//! flow from the runner into the report.
//!
//! ## Error taxonomy
//!
//! - `ElementNotFound`: a required field is missing, ambiguous or stale
//! - `Timeout`: a strict bounded wait did not resolve
//! - `AssertionFailed`: observed page state did not match the expectation
//!
//! Each of these terminates only the scenario that raised it.

pub mod config;
mod error;
pub mod fail_open;
mod types;

pub use config::{SuiteConfig, DEFAULT_TARGET_URL};
pub use error::{LetterboxError, Result};
pub use types::*;
