//! Runtime configuration resolved from CLI flags, the environment and `.env`
//!
//! `.env` is read before argument parsing so that clap's `env = ...` lookups see
//! its values. Variables already present in the environment win.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::cache::CacheManager;
use crate::cli::Cli;
use crate::output::OutputFormat;

/// Errors that can occur while resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No token was given on the command line or in the environment
    #[error("No API token found: set DO_TOKEN or pass --token")]
    MissingToken,

    /// A `.env` line is not `KEY=VALUE`
    #[error("Malformed line {line} in {path}: expected KEY=VALUE")]
    MalformedDotenv { path: String, line: usize },

    /// `.env` exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Configuration for one CLI invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// API token sent as a bearer credential
    pub token: String,
    /// API base URL
    pub api_url: String,
    /// Format for printed results
    pub output: OutputFormat,
    /// Cache directory, or `None` when caching is off
    pub cache_dir: Option<PathBuf>,
    /// How long cached results are served
    pub cache_ttl: Duration,
    /// Skip cache reads while still storing fresh results
    pub refresh: bool,
}

impl Config {
    /// Resolves configuration from parsed CLI arguments
    ///
    /// # Returns
    /// * `Ok(Config)` with the cache directory defaulted to the XDG cache path
    /// * `Err(ConfigError::MissingToken)` if no non-empty token is available
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let token = cli
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?
            .to_string();

        let cache_dir = if cli.no_cache {
            None
        } else {
            let dir = cli.cache_dir.clone().or_else(CacheManager::default_dir);
            if dir.is_none() {
                debug!("No cache directory available; caching disabled");
            }
            dir
        };

        Ok(Config {
            token,
            api_url: cli.api_url.clone(),
            output: cli.output,
            cache_dir,
            cache_ttl: Duration::from_secs(cli.cache_ttl),
            refresh: cli.refresh,
        })
    }
}

/// Parses `.env` content into key/value pairs
///
/// Supports blank lines, `#` comments, an optional `export ` prefix and values
/// wrapped in matching single or double quotes.
pub fn parse_dotenv(content: &str, path: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let mut vars = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let malformed = || ConfigError::MalformedDotenv {
            path: path.to_string(),
            line: index + 1,
        };
        let (key, value) = line.split_once('=').ok_or_else(malformed)?;
        let key = key.trim();
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(malformed());
        }

        vars.push((key.to_string(), unquote(value.trim()).to_string()));
    }

    Ok(vars)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Exports variables from the `.env` file at `path` that are not already set
///
/// A missing file is not an error.
///
/// # Returns
/// * `Ok(n)` with the number of variables exported
/// * `Err(ConfigError)` if the file cannot be read or contains a malformed line
pub fn load_dotenv(path: &Path) -> Result<usize, ConfigError> {
    let display = path.display().to_string();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(ConfigError::Io {
                path: display,
                source,
            })
        }
    };

    let mut exported = 0;
    for (key, value) in parse_dotenv(&content, &display)? {
        if env::var_os(&key).is_none() {
            env::set_var(&key, value);
            exported += 1;
        }
    }
    Ok(exported)
}
