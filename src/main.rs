//! Lint Analytics CLI
//!
//! Inspect and send the usage report for a recorded analysis run.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lint_analytics::{
    report, Config, Language, LanguageMode, Reporter, Telemetry, ToolSettings,
    PRIVACY_DECLARATION, VERSION,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lint-analytics")]
#[command(version = VERSION)]
#[command(about = "Anonymous usage reporting for static analysis runs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the events a run would report, without sending them
    Preview {
        /// Recorded run (JSON)
        #[arg(long, short)]
        input: PathBuf,
    },

    /// Send the usage report for a recorded run
    Send {
        /// Recorded run (JSON)
        #[arg(long, short)]
        input: PathBuf,

        /// Configuration file (defaults to the user config directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show configuration
    Config,

    /// Display privacy declaration
    Privacy,
}

/// Everything the analysis tool observed during one run.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunRecord {
    settings: ToolSettings,
    /// Every rule the tool loaded
    rules: Vec<String>,
    rule_configurations: BTreeMap<String, String>,
    /// Language tags of each compilation unit, e.g. `[["cpp", "objc"], ["c"]]`
    languages: Vec<Vec<Language>>,
}

impl RunRecord {
    fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read run record {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse run record {}", path.display()))
    }

    fn replay(&self, telemetry: &dyn Telemetry) {
        for (key, value) in &self.rule_configurations {
            telemetry.record_rule_configuration(key, value);
        }
        for unit in &self.languages {
            telemetry.record_language_observed(unit.iter().copied().collect::<LanguageMode>());
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Preview { input } => cmd_preview(&input),
        Commands::Send { input, config } => cmd_send(&input, config.as_deref()),
        Commands::Config => cmd_config(),
        Commands::Privacy => {
            println!("{PRIVACY_DECLARATION}");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn cmd_preview(input: &Path) -> Result<()> {
    let record = RunRecord::load(input)?;

    let reporter = Reporter::for_preview();
    record.replay(&reporter);

    let events = reporter.preview(&record.settings, &record.rules);
    println!("{}", serde_json::to_string_pretty(&events)?);
    println!();
    println!("{}", reporter.usage().summary());
    Ok(())
}

fn cmd_send(input: &Path, config_path: Option<&Path>) -> Result<()> {
    let record = RunRecord::load(input)?;
    let config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };

    if config.endpoint().is_none() {
        eprintln!("Warning: no analytics endpoint configured, nothing will be sent");
    }

    // Transport failures are logged by the reporter and never reach the exit code.
    let telemetry = report::from_config(&config);
    record.replay(telemetry.as_ref());
    telemetry.send(&record.settings, &record.rules);
    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    println!("Lint Analytics Configuration");
    println!("============================");
    println!();
    println!("Config file: {}", Config::config_path().display());
    println!("Enabled: {}", config.enabled);
    match config.endpoint() {
        Some(endpoint) => println!("Endpoint: {}", endpoint.ingest_url()),
        None => println!("Endpoint: not configured"),
    }
    println!("Timeout: {}s", config.timeout_secs);
    println!(
        "HTTP transport: {}",
        if cfg!(feature = "countly") {
            "compiled in"
        } else {
            "compiled out"
        }
    );
    Ok(())
}
