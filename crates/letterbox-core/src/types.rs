//! Scenario outcome records shared by the runner and the report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Terminal result of one scenario run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
    /// Not executed (known issue of the target page)
    Skipped,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "pass"),
            Outcome::Fail => write!(f, "fail"),
            Outcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// Record of a single scenario, created per run and discarded after reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Short identifier, e.g. `TC01`
    pub scenario_id: String,
    /// Human-readable title
    pub title: String,
    pub outcome: Outcome,
    /// Pass message, failure reason or skip reason
    pub message: String,
    /// Screenshot captured on failure
    pub artifact: Option<PathBuf>,
    pub duration_ms: u64,
    pub finished_at: DateTime<Utc>,
}

impl ScenarioOutcome {
    pub fn pass(id: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(id, title, Outcome::Pass, message, None)
    }

    pub fn fail(
        id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        artifact: Option<PathBuf>,
    ) -> Self {
        Self::new(id, title, Outcome::Fail, message, artifact)
    }

    pub fn skipped(id: impl Into<String>, title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(id, title, Outcome::Skipped, reason, None)
    }

    fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        outcome: Outcome,
        message: impl Into<String>,
        artifact: Option<PathBuf>,
    ) -> Self {
        Self {
            scenario_id: id.into(),
            title: title.into(),
            outcome,
            message: message.into(),
            artifact,
            duration_ms: 0,
            finished_at: Utc::now(),
        }
    }

    /// Attach the measured run time
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Label used in logs and artifact names, e.g. `TC01-valid-email-submission`
    pub fn label(&self) -> String {
        scenario_label(&self.scenario_id, &self.title)
    }
}

/// Build a filesystem-safe label from a scenario id and title
pub fn scenario_label(id: &str, title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        id.to_string()
    } else {
        format!("{}-{}", id, slug)
    }
}

/// Totals for one suite run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteSummary {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a ScenarioOutcome>) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.add(outcome.outcome);
        }
        summary
    }

    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail => self.failed += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for SuiteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} skipped",
            self.passed, self.failed, self.skipped
        )
    }
}
