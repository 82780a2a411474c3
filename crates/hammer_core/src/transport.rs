//! Request transports: how a worker issues one GET.
//!
//! Two implementations, selectable via [`TransportKind`]:
//!
//! - **`NativeIssuer`**: blocking `reqwest` client shared by all workers.
//! - **`ExternalCommandIssuer`**: spawns a curl-compatible program per request.
//!
//! Responses are never inspected. An HTTP error status is not a failure; only
//! transport-level problems (connect, TLS, spawn, non-zero exit) come back as
//! [`RequestError`], and the worker loop discards those.

use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::process::{Command, Stdio};

use crate::config::HammerConfig;
use crate::error::{HammerError, RequestError};

/// Program used by the external transport when none is configured.
pub const DEFAULT_EXTERNAL_PROGRAM: &str = "curl";

/// Which request mechanism a run uses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportKind {
    /// In-process HTTP client.
    #[default]
    Native,
    /// One child process per request (e.g. `"curl"`).
    External { program: String },
}

/// Issues a single request. Shared by reference across all worker threads.
pub trait RequestIssuer: Send + Sync {
    fn issue(&self) -> Result<(), RequestError>;
}

/// Build the issuer selected by `config.transport`.
pub fn build_request_issuer(config: &HammerConfig) -> Result<Box<dyn RequestIssuer>, HammerError> {
    match &config.transport {
        TransportKind::Native => Ok(Box::new(NativeIssuer::new(config)?)),
        TransportKind::External { program } => Ok(Box::new(ExternalCommandIssuer::new(
            program,
            &config.target_url,
            config.accept_invalid_certs,
        ))),
    }
}

// ---------------------------------------------------------------------------
// Native provider
// ---------------------------------------------------------------------------

/// GETs the target URL with a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct NativeIssuer {
    client: Client,
    url: Url,
}

impl NativeIssuer {
    pub fn new(config: &HammerConfig) -> Result<Self, HammerError> {
        let url = Url::parse(&config.target_url).map_err(|err| {
            HammerError::InvalidConfig(format!("target URL '{}': {err}", config.target_url))
        })?;
        let client = Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(config.request_timeout())
            .pool_max_idle_per_host(config.workers)
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl RequestIssuer for NativeIssuer {
    fn issue(&self) -> Result<(), RequestError> {
        // Status and body are ignored; dropping the response releases the connection.
        let _response = self.client.get(self.url.clone()).send()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// External command provider
// ---------------------------------------------------------------------------

/// Runs `<program> --silent [--insecure] <url>` once per request with all
/// standard streams discarded.
#[derive(Debug, Clone)]
pub struct ExternalCommandIssuer {
    program: String,
    args: Vec<String>,
}

impl ExternalCommandIssuer {
    pub fn new(program: &str, url: &str, accept_invalid_certs: bool) -> Self {
        let mut args = vec!["--silent".to_string()];
        if accept_invalid_certs {
            args.push("--insecure".to_string());
        }
        args.push(url.to_string());
        Self {
            program: program.to_string(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed on every invocation; identical for every request.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl RequestIssuer for ExternalCommandIssuer {
    fn issue(&self) -> Result<(), RequestError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(RequestError::Exit(status))
        }
    }
}
