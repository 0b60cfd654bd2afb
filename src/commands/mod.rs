//! Command handlers
//!
//! Each resource module turns one parsed subcommand into API calls and returns
//! the text to print. Read-only calls go through [`Context::cached`].

pub mod billing;
pub mod database;
pub mod domain;
pub mod droplet;
pub mod kubernetes;
pub mod vpc;

use std::future::Future;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::api::{ApiError, DigitalOceanClient};
use crate::cache::CacheManager;
use crate::cli::Command;
use crate::config::Config;
use crate::error::AppError;
use crate::output::OutputFormat;

/// Shared state for running one command
#[derive(Debug, Clone)]
pub struct Context {
    client: DigitalOceanClient,
    cache: Option<CacheManager>,
    ttl: Duration,
    refresh: bool,
    /// Short token fingerprint that namespaces cache keys per account
    account: String,
    format: OutputFormat,
}

impl Context {
    /// Builds the API client and, when enabled, the response cache
    ///
    /// A cache directory that cannot be created disables caching with a warning.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = DigitalOceanClient::with_base_url(&config.token, &config.api_url)?;

        let cache = config.cache_dir.as_ref().and_then(|dir| {
            let cache = CacheManager::new(dir);
            match cache.ensure_dir() {
                Ok(()) => Some(cache),
                Err(e) => {
                    warn!(dir = %cache.cache_dir().display(), error = %e, "Cache directory unavailable; caching disabled");
                    None
                }
            }
        });

        Ok(Self::from_parts(
            client,
            cache,
            config.cache_ttl,
            config.refresh,
            &config.token,
            config.output,
        ))
    }

    pub fn from_parts(
        client: DigitalOceanClient,
        cache: Option<CacheManager>,
        ttl: Duration,
        refresh: bool,
        token: &str,
        format: OutputFormat,
    ) -> Self {
        Self {
            client,
            cache,
            ttl,
            refresh,
            account: account_fingerprint(token),
            format,
        }
    }

    pub fn client(&self) -> &DigitalOceanClient {
        &self.client
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Cache key for `resource` within this account
    pub fn cache_key(&self, resource: &str) -> String {
        format!("{}:{}", self.account, resource)
    }

    /// Serves `resource` from the cache, or fetches and caches it
    ///
    /// A failed cache write is logged and does not fail the command.
    pub async fn cached<T, F, Fut>(&self, resource: &str, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let key = self.cache_key(resource);

        if let Some(cache) = self.cache.as_ref().filter(|_| !self.refresh) {
            if let Some(value) = cache.get::<T>(&key) {
                debug!(resource, "Serving from cache");
                return Ok(value);
            }
        }

        let value = fetch().await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(&key, &value, self.ttl) {
                warn!(resource, error = %e, "Failed to cache response");
            }
        }

        Ok(value)
    }
}

/// First 12 hex characters of the token's SHA-256
fn account_fingerprint(token: &str) -> String {
    let digest = hex::encode(Sha256::digest(token.as_bytes()));
    digest[..12].to_string()
}

/// Runs a parsed command and returns its printable output
pub async fn run(ctx: &Context, command: Command) -> Result<String, AppError> {
    match command {
        Command::Droplet(cmd) => droplet::run(ctx, cmd).await,
        Command::Vpc(cmd) => vpc::run(ctx, cmd).await,
        Command::Kubernetes(cmd) => kubernetes::run(ctx, cmd).await,
        Command::Database(cmd) => database::run(ctx, cmd).await,
        Command::Domain(cmd) => domain::run(ctx, cmd).await,
        Command::Billing => billing::run(ctx).await,
    }
}
