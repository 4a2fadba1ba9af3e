//! Logging System
//!
//! Structured logging using the `tracing` crate: configurable level, output
//! format and destination. `SCAFFOLD_LOG*` environment variables override the
//! configuration file.

use crate::config::xdg::mirror_path;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Resolve the log file path with precedence: CLI, SCAFFOLD_LOG_FILE env, config file, default.
///
/// Default uses the `ProjectDirs` state directory, optionally scoped by workspace.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    workspace: Option<&Path>,
) -> Result<PathBuf, ApiError> {
    if let Some(p) = cli_file.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(p);
    }
    if let Ok(env_path) = std::env::var("SCAFFOLD_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(p) = config_file.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(p);
    }
    default_log_file_path(workspace)
}

fn default_log_file_path(workspace: Option<&Path>) -> Result<PathBuf, ApiError> {
    let project_dirs = directories::ProjectDirs::from("", "scaffold", "scaffold").ok_or_else(|| {
        ApiError::ConfigError(
            "Could not determine platform state directory for log file".to_string(),
        )
    })?;
    // state_dir is Linux-only; elsewhere fall back to the data dir.
    let base = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir())
        .to_path_buf();
    let dir = match workspace {
        Some(ws) => {
            let canonical = ws.canonicalize().map_err(|e| {
                ApiError::ConfigError(format!("Failed to canonicalize workspace path: {}", e))
            })?;
            mirror_path(base, &canonical)
        }
        None => base,
    };
    Ok(dir.join("scaffold.log"))
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr, both
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; None means use runtime default
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Initialize the global subscriber.
///
/// Priority order (highest to lowest):
/// 1. Environment variables (SCAFFOLD_LOG, SCAFFOLD_LOG_FORMAT, ...)
/// 2. `config`, which the CLI has already overlaid with its flags
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let disabled = config.map(|c| !c.enabled).unwrap_or(false);
    if disabled {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .with(fmt::layer().with_writer(std::io::sink))
            .try_init()
            .map_err(|e| ApiError::ConfigError(format!("Failed to initialize logging: {}", e)));
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    // Never colour a file.
    let use_color = config.map(|c| c.color).unwrap_or(true) && !output.file;

    let writer = if output.file {
        let log_file = resolve_log_file_path(None, config.and_then(|c| c.file.clone()), None)?;
        let file = open_log_file(&log_file)?;
        if output.stderr {
            BoxMakeWriter::new(file.and(std::io::stderr))
        } else {
            BoxMakeWriter::new(file)
        }
    } else if output.stdout && output.stderr {
        BoxMakeWriter::new(std::io::stdout.and(std::io::stderr))
    } else if output.stderr {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };

    let base_subscriber = Registry::default().with(filter);
    let result = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .try_init()
    };
    result.map_err(|e| ApiError::ConfigError(format!("Failed to initialize logging: {}", e)))
}

fn open_log_file(log_file: &Path) -> Result<std::sync::Arc<std::fs::File>, ApiError> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map(std::sync::Arc::new)
        .map_err(|e| {
            ApiError::ConfigError(format!("Failed to open log file {:?}: {}", log_file, e))
        })
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env("SCAFFOLD_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("warn");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);

    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            let directive = format!("{}={}", module, module_level);
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?,
            );
        }
    }

    if let Ok(modules_str) = std::env::var("SCAFFOLD_LOG_MODULES") {
        for module_spec in modules_str.split(',') {
            if let Some((module, module_level)) = module_spec.split_once('=') {
                let directive = format!("{}={}", module.trim(), module_level.trim());
                filter = filter.add_directive(directive.parse().map_err(|e| {
                    ApiError::ConfigError(format!("Invalid log directive from env: {}", e))
                })?);
            }
        }
    }

    Ok(filter)
}

/// Determine output format from config or environment
fn determine_format(config: Option<&LoggingConfig>) -> Result<String, ApiError> {
    if let Ok(format) = std::env::var("SCAFFOLD_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    if format != "json" && format != "text" {
        return Err(ApiError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    Ok(format.to_string())
}

/// Output destinations
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

/// Determine output destinations from config or environment
fn determine_output(config: Option<&LoggingConfig>) -> Result<OutputDestinations, ApiError> {
    if let Ok(output) = std::env::var("SCAFFOLD_LOG_OUTPUT") {
        return parse_output_destinations(&output);
    }
    let output = config.map(|c| c.output.as_str()).unwrap_or("stderr");
    parse_output_destinations(output)
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, ApiError> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" => (false, true, true),
        "both" => (true, true, false),
        _ => {
            return Err(ApiError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                output
            )))
        }
    };
    Ok(OutputDestinations {
        stdout,
        stderr,
        file,
    })
}
