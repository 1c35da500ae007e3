//! Configuration management for Letterbox
//!
//! Settings are read from `letterbox.toml` in the working directory when it
//! exists, then adjusted from the environment. Command-line flags are applied
//! last by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{LetterboxError, Result};

/// Public newsletter sign-up form the suite targets by default
pub const DEFAULT_TARGET_URL: &str = "https://burabyo.github.io/Newsletter-sign-up-form/";

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "letterbox.toml";

/// Chrome arguments applied in headless (CI) mode
pub const CI_BROWSER_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-extensions",
    "--disable-software-rasterizer",
];

/// Suite-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Page every scenario starts from
    #[serde(default = "default_target_url")]
    pub target_url: String,

    /// Browser session settings
    #[serde(default)]
    pub browser: BrowserSettings,

    /// Bounded wait policy
    #[serde(default)]
    pub waits: WaitSettings,

    /// Where reports and screenshots go
    #[serde(default)]
    pub output: OutputSettings,

    /// Also execute scenarios flagged as known issues of the target page
    #[serde(default)]
    pub run_known_issues: bool,
}

/// Browser session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// Run without a visible window
    #[serde(default)]
    pub headless: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Extra Chrome command-line arguments
    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// Flat poll-until-timeout parameters shared by every asynchronous check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitSettings {
    /// Bound for helper waits and assertions
    #[serde(default = "default_wait_timeout_ms")]
    pub timeout_ms: u64,

    /// Bound for page-level waits (navigation, dismiss)
    #[serde(default = "default_page_timeout_ms")]
    pub page_timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Report and artifact locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_screenshots_dir")]
    pub screenshots_dir: PathBuf,

    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Report file stem; `.html` and `.json` are appended
    #[serde(default = "default_report_name")]
    pub report_name: String,
}

fn default_target_url() -> String {
    DEFAULT_TARGET_URL.to_string()
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_wait_timeout_ms() -> u64 {
    5_000
}

fn default_page_timeout_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_screenshots_dir() -> PathBuf {
    PathBuf::from("screenshots")
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_report_name() -> String {
    "test-report".to_string()
}

impl SuiteConfig {
    /// Load configuration from `letterbox.toml` in `dir`, or use defaults
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| {
                LetterboxError::Config(format!(
                    "Failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Write the default configuration to `letterbox.toml` in `dir`
    pub fn write_default(dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let config_path = dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| LetterboxError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source
    ///
    /// `HEADLESS=true` or any value of `CI` selects headless mode;
    /// `LETTERBOX_TARGET_URL` replaces the target page.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let headless_flag = lookup("HEADLESS")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if headless_flag || lookup("CI").is_some() {
            self.browser.headless = true;
        }

        if let Some(url) = lookup("LETTERBOX_TARGET_URL").filter(|u| !u.trim().is_empty()) {
            self.target_url = url;
        }
    }

    /// Reject settings no run could succeed with
    pub fn validate(&self) -> Result<()> {
        if self.target_url.trim().is_empty() {
            return Err(LetterboxError::Config("target_url is empty".to_string()));
        }
        if self.waits.poll_interval_ms == 0 {
            return Err(LetterboxError::Config(
                "waits.poll_interval_ms must be positive".to_string(),
            ));
        }
        if self.waits.poll_interval_ms > self.waits.timeout_ms {
            return Err(LetterboxError::Config(format!(
                "waits.poll_interval_ms ({}) exceeds waits.timeout_ms ({})",
                self.waits.poll_interval_ms, self.waits.timeout_ms
            )));
        }
        Ok(())
    }

    /// Full path of the HTML report
    pub fn html_report_path(&self) -> PathBuf {
        self.output
            .report_dir
            .join(format!("{}.html", self.output.report_name))
    }

    /// Full path of the JSON report
    pub fn json_report_path(&self) -> PathBuf {
        self.output
            .report_dir
            .join(format!("{}.json", self.output.report_name))
    }
}

impl BrowserSettings {
    /// Chrome arguments for the configured mode
    pub fn launch_args(&self) -> Vec<String> {
        let mut args: Vec<String> = if self.headless {
            CI_BROWSER_ARGS.iter().map(|a| a.to_string()).collect()
        } else {
            Vec::new()
        };
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

impl WaitSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            browser: BrowserSettings::default(),
            waits: WaitSettings::default(),
            output: OutputSettings::default(),
            run_known_issues: false,
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: false,
            window_width: default_window_width(),
            window_height: default_window_height(),
            extra_args: Vec::new(),
        }
    }
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_wait_timeout_ms(),
            page_timeout_ms: default_page_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            screenshots_dir: default_screenshots_dir(),
            report_dir: default_report_dir(),
            report_name: default_report_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();
        assert_eq!(config.target_url, DEFAULT_TARGET_URL);
        assert!(!config.browser.headless);
        assert_eq!(config.waits.timeout(), Duration::from_secs(5));
        assert_eq!(config.waits.page_timeout(), Duration::from_secs(10));
        assert_eq!(config.html_report_path(), PathBuf::from("./test-report.html"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SuiteConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.waits.poll_interval_ms, 100);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "target_url = \"http://localhost:8080/\"\n\n[waits]\ntimeout_ms = 2000\n",
        )
        .unwrap();

        let config = SuiteConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.target_url, "http://localhost:8080/");
        assert_eq!(config.waits.timeout_ms, 2000);
        assert_eq!(config.waits.page_timeout_ms, 10_000);
        assert_eq!(config.browser.window_width, 1920);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "waits = 3").unwrap();

        let err = SuiteConfig::load_or_default(dir.path()).unwrap_err();
        assert!(matches!(err, LetterboxError::Config(_)));
    }

    #[test]
    fn test_write_default_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = SuiteConfig::write_default(dir.path()).unwrap();
        assert!(path.exists());

        let config = SuiteConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.target_url, DEFAULT_TARGET_URL);
    }

    #[test]
    fn test_ci_variable_forces_headless() {
        let mut config = SuiteConfig::default();
        config.apply_env_from(env(&[("CI", "1")]));
        assert!(config.browser.headless);
        assert!(config
            .browser
            .launch_args()
            .contains(&"--no-sandbox".to_string()));
    }

    #[test]
    fn test_headless_flag_must_be_true() {
        let mut config = SuiteConfig::default();
        config.apply_env_from(env(&[("HEADLESS", "no")]));
        assert!(!config.browser.headless);
        assert!(config.browser.launch_args().is_empty());

        config.apply_env_from(env(&[("HEADLESS", "TRUE")]));
        assert!(config.browser.headless);
    }

    #[test]
    fn test_target_url_override() {
        let mut config = SuiteConfig::default();
        config.apply_env_from(env(&[("LETTERBOX_TARGET_URL", "http://127.0.0.1:3000/")]));
        assert_eq!(config.target_url, "http://127.0.0.1:3000/");

        config.apply_env_from(env(&[("LETTERBOX_TARGET_URL", "  ")]));
        assert_eq!(config.target_url, "http://127.0.0.1:3000/");
    }

    #[test]
    fn test_validate_rejects_poll_longer_than_timeout() {
        let mut config = SuiteConfig::default();
        config.waits.poll_interval_ms = 10_000;
        assert!(matches!(config.validate(), Err(LetterboxError::Config(_))));

        config.waits.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
