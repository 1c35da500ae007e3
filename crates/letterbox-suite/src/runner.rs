//! Sequential scenario runner
//!
//! Every scenario gets its own session. A failing scenario is screenshotted,
//! recorded and closed; the run then moves on to the next one.

use letterbox_browser::{
    NewsletterPage, PageDriver, Result, ScreenshotCapture, SessionLauncher, TestHelper, Waiter,
};
use letterbox_core::fail_open::fail_open;
use letterbox_core::{scenario_label, ScenarioOutcome, SuiteConfig, SuiteSummary};
use letterbox_report::ReportSink;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::scenarios::Scenario;

/// Drives scenarios through a launcher and records them into a report sink
pub struct SuiteRunner<L: SessionLauncher, R: ReportSink> {
    launcher: L,
    report: R,
    screenshots: ScreenshotCapture,
    page_waiter: Waiter,
    helper: TestHelper,
    run_known_issues: bool,
}

impl<L: SessionLauncher, R: ReportSink> SuiteRunner<L, R> {
    pub fn new(launcher: L, report: R, config: &SuiteConfig) -> Self {
        Self {
            launcher,
            report,
            screenshots: ScreenshotCapture::new(&config.output.screenshots_dir),
            page_waiter: Waiter::page_from_settings(&config.waits),
            helper: TestHelper::new(Waiter::from_settings(&config.waits)),
            run_known_issues: config.run_known_issues,
        }
    }

    pub fn report(&self) -> &R {
        &self.report
    }

    pub fn into_report(self) -> R {
        self.report
    }

    /// Run `scenarios` in order and return the tally
    ///
    /// Never stops early: every scenario ends up in the report.
    pub async fn run<'a>(&mut self, scenarios: impl IntoIterator<Item = &'a Scenario>) -> SuiteSummary {
        let mut summary = SuiteSummary::default();

        for scenario in scenarios {
            let outcome = self.run_one(scenario).await;
            summary.add(outcome.outcome);
            self.report.record(outcome);
            fail_open("report_flush", self.report.flush()).await;
        }

        info!("Suite finished: {}", summary);
        summary
    }

    async fn run_one(&self, scenario: &Scenario) -> ScenarioOutcome {
        if let Some(reason) = scenario.known_issue.filter(|_| !self.run_known_issues) {
            warn!("Skipping {} (known issue: {})", scenario.id, reason);
            return ScenarioOutcome::skipped(scenario.id, scenario.title, format!("Known issue: {}", reason));
        }

        info!("Starting test: {} {}", scenario.id, scenario.title);
        let started = Instant::now();

        let outcome = match self.launcher.open().await {
            Ok(session) => {
                let outcome = self.drive(scenario, &session).await;
                fail_open("session_close", self.launcher.close(session)).await;
                outcome
            }
            Err(e) => {
                error!("{} could not open a session: {}", scenario.id, e);
                ScenarioOutcome::fail(scenario.id, scenario.title, e.to_string(), None)
            }
        };

        outcome.with_duration_ms(started.elapsed().as_millis() as u64)
    }

    async fn drive(&self, scenario: &Scenario, session: &L::Session) -> ScenarioOutcome {
        match self.execute(scenario, session).await {
            Ok(()) => ScenarioOutcome::pass(scenario.id, scenario.title, scenario.pass_message),
            Err(e) => {
                if e.is_scenario_failure() {
                    error!("{} failed: {}", scenario.id, e);
                } else {
                    error!("{} aborted by driver error: {}", scenario.id, e);
                }
                let label = scenario_label(scenario.id, scenario.title);
                let artifact = fail_open("screenshot", self.screenshots.capture(session, &label)).await;
                ScenarioOutcome::fail(scenario.id, scenario.title, e.to_string(), artifact)
            }
        }
    }

    async fn execute<D: PageDriver>(&self, scenario: &Scenario, session: &D) -> Result<()> {
        let page = NewsletterPage::new(session, self.page_waiter).await?;
        scenario.execute(page, &self.helper).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{select, SCENARIOS};
    use letterbox_browser::{Field, SimLauncher};
    use letterbox_core::Outcome;
    use letterbox_report::FileReport;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> SuiteConfig {
        let mut config = SuiteConfig::default();
        config.waits.timeout_ms = 300;
        config.waits.page_timeout_ms = 300;
        config.waits.poll_interval_ms = 10;
        config.output.screenshots_dir = dir.join("shots");
        config
    }

    fn report_in(dir: &Path) -> FileReport {
        FileReport::new("sim://newsletter", dir.join("r.html"), dir.join("r.json"))
    }

    #[tokio::test]
    async fn test_known_issue_skipped_by_default() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let mut runner = SuiteRunner::new(SimLauncher::new("sim://newsletter"), report_in(dir.path()), &config);

        let summary = runner.run(select(Some("TC14"))).await;
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 1);
        assert!(runner.report().outcomes()[0].message.starts_with("Known issue"));
    }

    #[tokio::test]
    async fn test_known_issue_runs_when_enabled() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(dir.path());
        config.run_known_issues = true;
        let mut runner = SuiteRunner::new(SimLauncher::new("sim://newsletter"), report_in(dir.path()), &config);

        let summary = runner.run(select(Some("TC14"))).await;
        assert_eq!(summary.passed, 1);
    }

    #[tokio::test]
    async fn test_missing_field_fails_with_screenshot() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let launcher = SimLauncher::new("sim://newsletter").without(Field::NewsletterForm);
        let mut runner = SuiteRunner::new(launcher, report_in(dir.path()), &config);

        let summary = runner.run(select(Some("TC19"))).await;
        assert_eq!(summary.failed, 1);

        let outcome = &runner.report().outcomes()[0];
        assert_eq!(outcome.outcome, Outcome::Fail);
        assert!(outcome.message.contains("#newsletter-form"));
        let shot = outcome.artifact.as_ref().unwrap();
        assert!(shot.exists());
        assert!(shot
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("TC19-verify-form-id-exists_"));
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_the_run() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let launcher = SimLauncher::new("sim://newsletter").without(Field::SuccessModal);
        let mut runner = SuiteRunner::new(launcher, report_in(dir.path()), &config);

        let summary = runner.run(SCENARIOS).await;
        assert_eq!(summary.total(), SCENARIOS.len());
        assert_eq!(runner.report().outcomes().len(), SCENARIOS.len());
        assert!(summary.failed > 0);
        assert!(!summary.all_passed());
    }
}
