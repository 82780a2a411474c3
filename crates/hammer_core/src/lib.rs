//! Fixed-size HTTP(S) request hammer.
//!
//! A run fans out a fixed number of worker threads, each issuing a fixed
//! number of GET requests against one URL, then joins them all. Request
//! outcomes are discarded; only setup errors are reported.
//!
//! ```no_run
//! use hammer_core::{run_hammer, HammerConfig};
//!
//! let config = HammerConfig::default()
//!     .with_workers(10)
//!     .with_iterations_per_worker(100);
//! let summary = run_hammer(&config).unwrap();
//! assert_eq!(summary.total_attempts(), 1000);
//! ```
//!
//! - [`config`]: run parameters with named defaults and JSON presets
//! - [`transport`]: native client or external-program request issuers
//! - [`worker`]: the counted request loop
//! - [`driver`]: fan-out/fan-in over a fixed thread pool

pub mod config;
pub mod driver;
pub mod error;
pub mod transport;
pub mod worker;

pub use config::HammerConfig;
pub use driver::{run_hammer, run_hammer_with_issuer, run_hammer_with_progress, RunSummary};
pub use error::{HammerError, RequestError};
pub use transport::{build_request_issuer, RequestIssuer, TransportKind};
pub use worker::{run_worker, WorkerReport};
