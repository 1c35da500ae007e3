//! Reporting sink for Letterbox runs
//!
//! Scenario outcomes are collected in memory and written as a self-contained
//! HTML page plus a JSON document every time the sink is flushed, so a run
//! that dies half-way still leaves a report of what finished.

mod html;
pub mod report;

pub use report::{FileReport, ReportSink, RunReport};
