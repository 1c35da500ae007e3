//! Letterbox CLI - end-to-end checks for the newsletter sign-up form
//!
//! Usage:
//!   letterbox run               Run every scenario against the configured page
//!   letterbox run --simulate    Run against the in-memory form (no browser)
//!   letterbox list              List scenarios
//!   letterbox init              Write a default letterbox.toml

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use letterbox_browser::{ChromeLauncher, SessionLauncher, SimLauncher};
use letterbox_core::SuiteConfig;
use letterbox_report::{FileReport, ReportSink};
use letterbox_suite::{select, Scenario, SuiteRunner, SCENARIOS};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "letterbox")]
#[command(author, version, about = "End-to-end checks for the newsletter sign-up form")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding letterbox.toml
    #[arg(long, global = true, default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenarios
    Run {
        /// Only scenarios whose id starts with this prefix (e.g. TC0, TC17)
        #[arg(short, long)]
        filter: Option<String>,

        /// Use the in-memory form instead of launching Chrome
        #[arg(long)]
        simulate: bool,

        /// Run Chrome headless
        #[arg(long)]
        headless: bool,

        /// Target page URL
        #[arg(long)]
        url: Option<String>,

        /// Element wait bound in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Also run scenarios the target page is known to fail
        #[arg(long)]
        include_known_issues: bool,

        /// Open the HTML report when the run finishes
        #[arg(long)]
        open_report: bool,
    },

    /// List the scenarios
    List {
        /// Only scenarios whose id starts with this prefix
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Write a default letterbox.toml
    Init,
}

struct RunArgs {
    filter: Option<String>,
    simulate: bool,
    open_report: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            filter,
            simulate,
            headless,
            url,
            timeout,
            include_known_issues,
            open_report,
        } => {
            let mut config = load_config(&cli.config_dir)?;
            if headless {
                config.browser.headless = true;
            }
            if let Some(url) = url {
                config.target_url = url;
            }
            if let Some(secs) = timeout {
                config.waits.timeout_ms = secs * 1000;
            }
            if include_known_issues {
                config.run_known_issues = true;
            }
            config.validate()?;

            let args = RunArgs {
                filter,
                simulate,
                open_report,
            };
            cmd_run(config, args).await
        }
        Commands::List { filter } => {
            cmd_list(&select(filter.as_deref()));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init => {
            cmd_init(&cli.config_dir)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// File config, then environment overrides
fn load_config(dir: &Path) -> Result<SuiteConfig> {
    let mut config = SuiteConfig::load_or_default(dir)
        .with_context(|| format!("Failed to load configuration from {}", dir.display()))?;
    config.apply_env();
    Ok(config)
}

async fn cmd_run(config: SuiteConfig, args: RunArgs) -> Result<ExitCode> {
    let scenarios = select(args.filter.as_deref());
    if scenarios.is_empty() {
        anyhow::bail!(
            "No scenario matches filter {:?}",
            args.filter.unwrap_or_default()
        );
    }

    let report = FileReport::new(
        config.target_url.clone(),
        config.html_report_path(),
        config.json_report_path(),
    );
    info!(
        "Run {} against {} ({} scenarios)",
        report.run_id(),
        config.target_url,
        scenarios.len()
    );

    let report = if args.simulate {
        info!("Using the simulated sign-up form");
        run_with(SimLauncher::new(config.target_url.clone()), report, &config, &scenarios).await
    } else {
        info!(
            "Launching Chrome ({})",
            if config.browser.headless { "headless" } else { "headed" }
        );
        run_with(ChromeLauncher::from_suite_config(&config), report, &config, &scenarios).await
    };

    let summary = report.summary();
    println!("{}", summary);
    println!("Report: {}", report.html_path().display());

    if args.open_report {
        if let Err(e) = open::that(report.html_path()) {
            warn!("Failed to open report: {}", e);
        }
    }

    Ok(if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_with<L: SessionLauncher>(
    launcher: L,
    report: FileReport,
    config: &SuiteConfig,
    scenarios: &[&Scenario],
) -> FileReport {
    let mut runner = SuiteRunner::new(launcher, report, config);
    runner.run(scenarios.iter().copied()).await;
    runner.into_report()
}

fn cmd_list(scenarios: &[&Scenario]) {
    for scenario in scenarios {
        match scenario.known_issue {
            Some(reason) => println!(
                "{}  {}  (skipped by default: {})",
                scenario.id, scenario.title, reason
            ),
            None => println!("{}  {}", scenario.id, scenario.title),
        }
    }
    println!("{} of {} scenarios", scenarios.len(), SCENARIOS.len());
}

fn cmd_init(dir: &Path) -> Result<()> {
    let path = SuiteConfig::write_default(dir)
        .with_context(|| format!("Failed to write configuration into {}", dir.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
