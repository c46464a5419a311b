//! `atlas` – aligns scanner reports into one beacon map.
//!
//! ```text
//! atlas align scans.txt
//! atlas align - --json < scans.txt
//! atlas init-config
//! ```
//!
//! Results go to stdout; logs go to stderr.

mod config;
mod input;
mod report;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use atlas_runtime::{AlignmentEngine, init_tracing};
use atlas_types::ScannerId;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use config::{Config, OutputFormat};
use report::RunReport;

#[derive(Parser)]
#[command(name = "atlas")]
#[command(about = "Align overlapping 3-D scanner reports into one beacon map")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ~/.beacon-atlas/config.toml)
    #[arg(long, global = true, env = "ATLAS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Align the scanners in INPUT and report the merged beacon map
    Align {
        /// Report file, or `-` for stdin
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Beacons two scanners must share to be aligned
        #[arg(long)]
        min_overlap: Option<usize>,

        /// Exit with an error when some scanner stays unresolved
        #[arg(long)]
        require_complete: bool,

        /// Scanner id that defines the shared frame (defaults to the first)
        #[arg(long)]
        reference: Option<u32>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.unwrap_or_else(config::config_path);

    match cli.command {
        Command::Align {
            input,
            json,
            min_overlap,
            require_complete,
            reference,
        } => {
            let mut cfg = config::load_from(&config_path)
                .with_context(|| format!("loading {}", config_path.display()))?;
            if let Some(n) = min_overlap {
                cfg.min_overlap = n;
            }
            if json {
                cfg.output = OutputFormat::Json;
            }
            cfg.require_complete |= require_complete;

            let guard = init_tracing(&cfg.telemetry());
            info!(
                exporting_spans = guard.is_exporting(),
                config = %config_path.display(),
                "telemetry initialised"
            );
            align(&cfg, &input, reference.map(ScannerId))
        }
        Command::InitConfig { force } => {
            init_config(&config_path, force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn align(cfg: &Config, source: &Path, reference: Option<ScannerId>) -> Result<ExitCode> {
    let text = read_input(source)?;
    let reports = input::parse_reports(&text)
        .with_context(|| format!("parsing {}", source.display()))?;
    info!(scanners = reports.len(), input = %source.display(), "reports loaded");

    let alignment = AlignmentEngine::new(reports, cfg.align_config(reference))?.run()?;
    let report = RunReport::new(alignment.summary());

    match cfg.output {
        OutputFormat::Json => println!("{}", report::render_json(&report)?),
        OutputFormat::Text => print!("{}", report::render_text(&report)),
    }

    if cfg.require_complete {
        alignment.require_complete()?;
    }
    Ok(ExitCode::SUCCESS)
}

fn read_input(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(source).with_context(|| format!("reading {}", source.display()))
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    config::save_to(&Config::default(), path)?;
    println!(
        "{} Configuration written to {}",
        "✓".green().bold(),
        path.display().to_string().bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_flags_parse() {
        let cli = Cli::try_parse_from([
            "atlas",
            "align",
            "scans.txt",
            "--json",
            "--min-overlap",
            "6",
            "--reference",
            "3",
        ])
        .unwrap();
        let Command::Align {
            input,
            json,
            min_overlap,
            require_complete,
            reference,
        } = cli.command
        else {
            panic!("expected align");
        };
        assert_eq!(input, PathBuf::from("scans.txt"));
        assert!(json);
        assert_eq!(min_overlap, Some(6));
        assert!(!require_complete);
        assert_eq!(reference, Some(3));
    }

    #[test]
    fn init_config_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");

        init_config(&path, false).expect("first write");
        assert!(init_config(&path, false).is_err());
        init_config(&path, true).expect("forced write");
        assert!(config::read_file(&path).unwrap().is_some());
    }

    #[test]
    fn align_fails_on_missing_input() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let err = align(
            &Config::default(),
            &dir.path().join("absent.txt"),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn align_requires_complete_when_configured() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("scans.txt");
        std::fs::write(
            &path,
            "--- scanner 0 ---\n1,2,3\n\n--- scanner 1 ---\n40,50,60\n",
        )
        .unwrap();

        let lenient = Config::default();
        assert!(align(&lenient, &path, None).is_ok());

        let strict = Config {
            require_complete: true,
            ..Config::default()
        };
        let err = align(&strict, &path, None).unwrap_err();
        assert!(err.to_string().contains("unresolved"));
    }
}
