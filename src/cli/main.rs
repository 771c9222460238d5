use anyhow::Context;
use clap::{Parser, Subcommand};
use ops_healer::{
    config::Config,
    logging::{self, LogTarget},
    models::{AnalysisReport, AnalyzeRequest},
    processing::Analyzer,
    rules::RuleCatalog,
    AppError, Severity,
};
use reqwest::Client;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::AsyncReadExt;

const EXIT_OK: u8 = 0;
const EXIT_URGENT: u8 = 1;
const EXIT_NO_INPUT: u8 = 2;
const EXIT_FATAL: u8 = 3;

const NO_INPUT_MESSAGE: &str = "No input lines on stdin";

#[derive(Parser)]
#[command(name = "ops-healer-cli")]
#[command(about = "Classify log lines and write a redacted postmortem", long_about = None)]
struct Cli {
    /// Directory for postmortem reports
    #[arg(long, env = "OPS_HEALER_REPORTS_DIR")]
    reports_dir: Option<PathBuf>,

    /// YAML file of rules appended after the built-in catalog
    #[arg(long)]
    extra_rules: Option<PathBuf>,

    /// Send lines to a running ops-healer server instead of analyzing locally
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze log lines (default)
    Analyze {
        /// Read lines from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print the effective rule catalog
    Rules,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            print_json(&json!({ "error": format!("{:#}", e) }));
            ExitCode::from(EXIT_FATAL)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let mut config = Config::load().context("invalid configuration")?;
    config.observability.log_level = if cli.verbose { "debug" } else { "warn" }.to_string();
    if let Some(dir) = cli.reports_dir {
        config.reports.dir = dir;
    }
    if let Some(path) = cli.extra_rules {
        config.rules.extra_rules_path = Some(path);
    }

    logging::init(&config.observability, LogTarget::Stderr);

    match cli.command.unwrap_or(Commands::Analyze { file: None }) {
        Commands::Rules => {
            let catalog = RuleCatalog::load(&config.rules)?;
            print_json(&serde_json::to_value(catalog.summaries())?);
            Ok(EXIT_OK)
        }
        Commands::Analyze { file } => {
            let raw = match file {
                Some(path) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("cannot read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin()
                        .read_to_string(&mut buf)
                        .await
                        .context("cannot read stdin")?;
                    buf
                }
            };

            let lines = collect_lines(&raw);
            if lines.is_empty() {
                print_json(&json!({ "error": NO_INPUT_MESSAGE }));
                return Ok(EXIT_NO_INPUT);
            }

            let report = match cli.endpoint {
                Some(endpoint) => analyze_remote(&endpoint, lines).await?,
                None => Analyzer::from_config(&config)?.analyze(&lines).await?,
            };

            print_json(&serde_json::to_value(&report)?);
            Ok(exit_code_for(report.severity))
        }
    }
}

async fn analyze_remote(endpoint: &str, lines: Vec<String>) -> ops_healer::Result<AnalysisReport> {
    let client = Client::new();
    let response = client
        .post(format!("{}/analyze", endpoint.trim_end_matches('/')))
        .json(&AnalyzeRequest { lines })
        .send()
        .await?;

    let status = response.status();
    let body: serde_json::Value = response.json().await?;
    if !status.is_success() {
        let message = body["error"]["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());
        return Err(AppError::Network(format!("server returned {}: {}", status, message)));
    }

    Ok(serde_json::from_value(body)?)
}

/// Non-blank lines, kept verbatim
fn collect_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn exit_code_for(severity: Severity) -> u8 {
    if severity.is_urgent() {
        EXIT_URGENT
    } else {
        EXIT_OK
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_lines_drops_blank() {
        let raw = "first\n\n   \n\tsecond  \r\nthird";
        assert_eq!(collect_lines(raw), vec!["first", "\tsecond  ", "third"]);
        assert!(collect_lines(" \n\n").is_empty());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(Severity::Low), EXIT_OK);
        assert_eq!(exit_code_for(Severity::Medium), EXIT_OK);
        assert_eq!(exit_code_for(Severity::High), EXIT_URGENT);
        assert_eq!(exit_code_for(Severity::Critical), EXIT_URGENT);
    }

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::try_parse_from(["ops-healer-cli"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.endpoint.is_none());

        let cli = Cli::try_parse_from(["ops-healer-cli", "--reports-dir", "/tmp/r", "rules"]).unwrap();
        assert_eq!(cli.reports_dir, Some(PathBuf::from("/tmp/r")));
        assert!(matches!(cli.command, Some(Commands::Rules)));
    }
}
