//! Letterbox suite: the scenario table and the runner that drives it
//!
//! Scenarios are independent and run in table order, each on a fresh
//! session. Failures are recorded with a screenshot and never abort the run.

pub mod runner;
pub mod scenarios;

pub use runner::SuiteRunner;
pub use scenarios::{select, Check, Email, Scenario, SCENARIOS};
