//! Configuration for the resource manager.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use netres_reconcile::{
    Backoff, FailurePolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INITIAL, DEFAULT_RETRY_MAX_DELAY,
};

use crate::dispatch::{DispatchConfig, DEFAULT_WORKERS};

/// Resource manager configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Reconciliation worker count.
    pub dispatch_workers: usize,

    /// Failure handling for reconciliation work.
    pub failure_policy: FailurePolicy,

    /// Network configuration file to load, if any.
    pub network_config: Option<PathBuf>,

    /// How often to re-read the network configuration file. Zero loads it once.
    pub sync_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let log_level = lookup("NETRES_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let dispatch_workers = parse_or(&lookup, "NETRES_DISPATCH_WORKERS", DEFAULT_WORKERS)?;
        if dispatch_workers == 0 {
            anyhow::bail!("NETRES_DISPATCH_WORKERS must be at least 1");
        }

        let failure_policy = match lookup("NETRES_RETRY_POLICY").as_deref() {
            None | Some("drop") => FailurePolicy::LogAndDrop,
            Some("backoff") => FailurePolicy::RetryWithBackoff(Backoff {
                initial: Duration::from_millis(parse_or(
                    &lookup,
                    "NETRES_RETRY_INITIAL_MS",
                    DEFAULT_RETRY_INITIAL.as_millis() as u64,
                )?),
                max: DEFAULT_RETRY_MAX_DELAY,
                max_retries: parse_or(&lookup, "NETRES_RETRY_MAX", DEFAULT_MAX_RETRIES)?,
            }),
            Some(other) => {
                anyhow::bail!("NETRES_RETRY_POLICY must be 'drop' or 'backoff', got '{other}'")
            }
        };

        let network_config = lookup("NETRES_NETWORK_CONFIG")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let sync_interval_secs = parse_or(&lookup, "NETRES_SYNC_INTERVAL_SECS", 0)?;

        Ok(Self {
            log_level,
            dispatch_workers,
            failure_policy,
            network_config,
            sync_interval_secs,
        })
    }

    /// Dispatch pool settings.
    pub fn dispatch(&self) -> DispatchConfig {
        DispatchConfig {
            workers: self.dispatch_workers,
            failure_policy: self.failure_policy.clone(),
        }
    }

    /// Interval between file syncs, or `None` to load once.
    pub fn sync_interval(&self) -> Option<Duration> {
        (self.sync_interval_secs > 0).then(|| Duration::from_secs(self.sync_interval_secs))
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: '{raw}'")),
        None => Ok(default),
    }
}
