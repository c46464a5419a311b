//! Configuration – reads/writes `~/.beacon-atlas/config.toml`.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, `ATLAS_*`
//! environment variables, command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use atlas_runtime::{AlignConfig, DEFAULT_MIN_OVERLAP, LogFormat, OverlapConfig, TelemetryConfig};
use atlas_types::ScannerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading or writing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// How results are printed on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Beacons two scanners must share before they are aligned.
    #[serde(default = "default_min_overlap")]
    pub min_overlap: usize,

    /// Fail the run when some scanner cannot be aligned.
    #[serde(default)]
    pub require_complete: bool,

    #[serde(default)]
    pub output: OutputFormat,

    #[serde(default)]
    pub log_format: LogFormat,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// OTLP/HTTP collector for span export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otlp_endpoint: Option<String>,
}

fn default_min_overlap() -> usize {
    DEFAULT_MIN_OVERLAP
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_overlap: default_min_overlap(),
            require_complete: false,
            output: OutputFormat::default(),
            log_format: LogFormat::default(),
            log_filter: default_log_filter(),
            otlp_endpoint: None,
        }
    }
}

impl Config {
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            format: self.log_format,
            filter: self.log_filter.clone(),
            otlp_endpoint: self.otlp_endpoint.clone(),
            ..TelemetryConfig::default()
        }
    }

    pub fn align_config(&self, reference: Option<ScannerId>) -> AlignConfig {
        AlignConfig {
            overlap: OverlapConfig {
                min_overlap: self.min_overlap,
            },
            reference,
        }
    }
}

/// Return the path to `~/.beacon-atlas/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".beacon-atlas").join("config.toml")
}

/// Load the effective configuration: the file at `path` (defaults when it
/// does not exist) with environment overrides applied.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let mut cfg = read_file(path)?.unwrap_or_default();
    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

/// Read the file at `path` as-is.  Returns `None` if it does not exist.
pub(crate) fn read_file(path: &Path) -> Result<Option<Config>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(toml::from_str(&raw)?))
}

/// Apply `ATLAS_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `ATLAS_MIN_OVERLAP` | `min_overlap` |
/// | `ATLAS_REQUIRE_COMPLETE` | `require_complete` (`true` / `false`) |
/// | `ATLAS_OUTPUT` | `output` (`text` / `json`) |
/// | `ATLAS_LOG_FORMAT` | `log_format` (`compact` / `json`) |
///
/// Values that do not parse are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("ATLAS_MIN_OVERLAP")
        && let Ok(n) = v.trim().parse::<usize>()
    {
        cfg.min_overlap = n;
    }
    if let Ok(v) = std::env::var("ATLAS_REQUIRE_COMPLETE")
        && let Ok(flag) = v.trim().parse::<bool>()
    {
        cfg.require_complete = flag;
    }
    if let Ok(v) = std::env::var("ATLAS_OUTPUT") {
        match v.trim() {
            "text" => cfg.output = OutputFormat::Text,
            "json" => cfg.output = OutputFormat::Json,
            _ => {}
        }
    }
    if let Ok(v) = std::env::var("ATLAS_LOG_FORMAT") {
        match v.trim() {
            "compact" => cfg.log_format = LogFormat::Compact,
            "json" => cfg.log_format = LogFormat::Json,
            _ => {}
        }
    }
}

/// Write `cfg` to `path`, creating the parent directory if necessary.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let raw = toml::to_string_pretty(cfg)?;
    fs::write(path, raw).map_err(write_err)
}
