//! Optional config file support: TOML or JSON values merged under CLI
//! flags. A value from the file applies only when the matching flag was
//! left at its default on the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ArgMatches;
use clap::parser::ValueSource;
use serde::Deserialize;

use crate::args::{BenchArgs, PositiveUsize};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

/// Default config filenames probed when `--config` is not given.
const DEFAULT_CONFIG_FILES: [&str; 2] = ["dfsbench.toml", "dfsbench.json"];

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub trials: Option<usize>,
    pub burst: Option<usize>,
    pub request_timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub op_timeout_ms: Option<u64>,
    pub concurrency_limit: Option<usize>,
}

/// Loads a configuration file from the provided path or default locations.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> AppResult<Option<ConfigFile>> {
    if let Some(path) = path {
        return Ok(Some(load_config_file(Path::new(path))?));
    }

    for candidate in DEFAULT_CONFIG_FILES {
        let candidate = PathBuf::from(candidate);
        if candidate.exists() {
            return Ok(Some(load_config_file(&candidate)?));
        }
    }

    Ok(None)
}

fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some(ext) => Err(AppError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(AppError::config(ConfigError::MissingExtension)),
    }
}

/// Applies config values to the args the CLI left at their defaults.
///
/// # Errors
///
/// Returns an error when a config value fails validation.
pub fn apply_config(
    args: &mut BenchArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if let Some(host) = config.host.as_ref()
        && !is_cli(matches, "host")
    {
        args.host = host.clone();
    }
    if let Some(port) = config.port
        && !is_cli(matches, "port")
    {
        args.port = port;
    }
    if let Some(trials) = config.trials
        && !is_cli(matches, "trials")
    {
        args.trials = ensure_positive(trials, "trials")?;
    }
    if let Some(burst) = config.burst
        && !is_cli(matches, "burst")
    {
        args.burst = ensure_positive(burst, "burst")?;
    }
    if let Some(ms) = config.request_timeout_ms
        && !is_cli(matches, "request_timeout")
    {
        args.request_timeout = ensure_duration_ms(ms, "request_timeout_ms")?;
    }
    if let Some(ms) = config.connect_timeout_ms
        && !is_cli(matches, "connect_timeout")
    {
        args.connect_timeout = ensure_duration_ms(ms, "connect_timeout_ms")?;
    }
    if let Some(ms) = config.op_timeout_ms
        && !is_cli(matches, "op_timeout")
    {
        args.op_timeout = Some(ensure_duration_ms(ms, "op_timeout_ms")?);
    }
    if let Some(limit) = config.concurrency_limit
        && !is_cli(matches, "concurrency_limit")
    {
        args.concurrency_limit = Some(ensure_positive(limit, "concurrency_limit")?);
    }
    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn ensure_duration_ms(value: u64, field: &str) -> AppResult<Duration> {
    if value == 0 {
        return Err(AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: ValidationError::ValueTooSmall { min: 1 },
        }));
    }
    Ok(Duration::from_millis(value))
}
