//! Report sink and the file-backed implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use letterbox_core::{LetterboxError, Outcome, Result, ScenarioOutcome, SuiteSummary};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::html::render_html;

/// Destination for scenario outcomes
#[async_trait]
pub trait ReportSink: Send {
    /// Record one finished (or skipped) scenario
    fn record(&mut self, outcome: ScenarioOutcome);

    /// Persist everything recorded so far
    async fn flush(&mut self) -> Result<()>;

    fn outcomes(&self) -> &[ScenarioOutcome];

    fn summary(&self) -> SuiteSummary {
        SuiteSummary::from_outcomes(self.outcomes())
    }
}

/// Serialized form of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub target_url: String,
    pub started_at: DateTime<Utc>,
    pub summary: SuiteSummary,
    pub scenarios: Vec<ScenarioOutcome>,
}

impl RunReport {
    /// Load a previously written JSON report
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Writes `<name>.html` and `<name>.json` on every flush
pub struct FileReport {
    run_id: Uuid,
    target_url: String,
    started_at: DateTime<Utc>,
    html_path: PathBuf,
    json_path: PathBuf,
    outcomes: Vec<ScenarioOutcome>,
}

impl FileReport {
    pub fn new(
        target_url: impl Into<String>,
        html_path: impl Into<PathBuf>,
        json_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            target_url: target_url.into(),
            started_at: Utc::now(),
            html_path: html_path.into(),
            json_path: json_path.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn html_path(&self) -> &Path {
        &self.html_path
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    fn snapshot(&self) -> RunReport {
        RunReport {
            run_id: self.run_id,
            target_url: self.target_url.clone(),
            started_at: self.started_at,
            summary: self.summary(),
            scenarios: self.outcomes.clone(),
        }
    }
}

async fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|e| {
            LetterboxError::Report(format!(
                "Failed to create report directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    fs::write(path, content).await.map_err(|e| {
        LetterboxError::Report(format!("Failed to write {}: {}", path.display(), e))
    })
}

#[async_trait]
impl ReportSink for FileReport {
    fn record(&mut self, outcome: ScenarioOutcome) {
        match outcome.outcome {
            Outcome::Pass => info!("PASS {}: {}", outcome.scenario_id, outcome.message),
            Outcome::Fail => info!("FAIL {}: {}", outcome.scenario_id, outcome.message),
            Outcome::Skipped => info!("SKIP {}: {}", outcome.scenario_id, outcome.message),
        }
        self.outcomes.push(outcome);
    }

    async fn flush(&mut self) -> Result<()> {
        let report = self.snapshot();

        let json = serde_json::to_vec_pretty(&report)?;
        write_file(&self.json_path, &json).await?;
        write_file(&self.html_path, render_html(&report).as_bytes()).await?;

        debug!(
            "Report flushed ({} scenarios) to {}",
            report.scenarios.len(),
            self.html_path.display()
        );
        Ok(())
    }

    fn outcomes(&self) -> &[ScenarioOutcome] {
        &self.outcomes
    }
}
