use std::fmt;
use std::io;
use std::process::ExitStatus;

/// Errors that stop a run before any worker starts.
#[derive(Debug)]
pub enum HammerError {
    InvalidConfig(String),
    ConfigFile(String),
    Client(reqwest::Error),
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl fmt::Display for HammerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HammerError::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
            HammerError::ConfigFile(reason) => write!(f, "failed to load config file: {reason}"),
            HammerError::Client(err) => write!(f, "failed to build HTTP client: {err}"),
            HammerError::ThreadPool(err) => write!(f, "failed to build worker pool: {err}"),
        }
    }
}

impl std::error::Error for HammerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HammerError::Client(err) => Some(err),
            HammerError::ThreadPool(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HammerError {
    fn from(err: reqwest::Error) -> Self {
        HammerError::Client(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for HammerError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        HammerError::ThreadPool(err)
    }
}

/// Outcome of a single failed request. Workers log and discard these.
#[derive(Debug)]
pub enum RequestError {
    Http(reqwest::Error),
    Spawn(io::Error),
    Exit(ExitStatus),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Http(err) => write!(f, "request failed: {err}"),
            RequestError::Spawn(err) => write!(f, "failed to spawn request process: {err}"),
            RequestError::Exit(status) => write!(f, "request process exited with {status}"),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        RequestError::Http(err)
    }
}

impl From<io::Error> for RequestError {
    fn from(err: io::Error) -> Self {
        RequestError::Spawn(err)
    }
}
