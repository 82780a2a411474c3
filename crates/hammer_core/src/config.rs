use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::HammerError;
use crate::transport::TransportKind;

/// Endpoint hit when nothing else is configured.
pub const DEFAULT_TARGET_URL: &str = "https://localhost:8080/helloworld";

/// Number of concurrent workers (OS threads).
pub const DEFAULT_WORKERS: usize = 10;

/// Requests issued by each worker before it exits.
pub const DEFAULT_ITERATIONS_PER_WORKER: usize = 100;

/// Upper bound on a single request attempt (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Parameters for one hammer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HammerConfig {
    pub target_url: String,
    pub workers: usize,
    pub iterations_per_worker: usize,
    /// Skip TLS certificate verification (self-signed local servers).
    pub accept_invalid_certs: bool,
    pub request_timeout_secs: u64,
    pub transport: TransportKind,
}

impl Default for HammerConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            workers: DEFAULT_WORKERS,
            iterations_per_worker: DEFAULT_ITERATIONS_PER_WORKER,
            accept_invalid_certs: true,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            transport: TransportKind::default(),
        }
    }
}

impl HammerConfig {
    /// Load a JSON preset. Missing fields fall back to the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, HammerError> {
        let raw = fs::read_to_string(path)
            .map_err(|err| HammerError::ConfigFile(format!("{}: {err}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|err| HammerError::ConfigFile(format!("{}: {err}", path.display())))
    }

    pub fn with_target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = url.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_iterations_per_worker(mut self, iterations: usize) -> Self {
        self.iterations_per_worker = iterations;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Requests attempted by a full run: workers × iterations.
    pub fn total_attempts(&self) -> usize {
        self.workers.saturating_mul(self.iterations_per_worker)
    }

    /// Reject configurations that cannot start a run.
    ///
    /// Zero iterations is allowed: every worker starts, issues nothing, and is joined.
    pub fn validate(&self) -> Result<(), HammerError> {
        if self.workers == 0 {
            return Err(HammerError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.target_url.trim().is_empty() {
            return Err(HammerError::InvalidConfig(
                "target URL must not be empty".to_string(),
            ));
        }
        let url = Url::parse(&self.target_url).map_err(|err| {
            HammerError::InvalidConfig(format!("target URL '{}': {err}", self.target_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HammerError::InvalidConfig(format!(
                "unsupported URL scheme '{}'",
                url.scheme()
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(HammerError::InvalidConfig(
                "request timeout must be at least 1 second".to_string(),
            ));
        }
        if let TransportKind::External { program } = &self.transport {
            if program.trim().is_empty() {
                return Err(HammerError::InvalidConfig(
                    "external transport needs a program".to_string(),
                ));
            }
        }
        Ok(())
    }
}
