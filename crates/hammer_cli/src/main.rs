use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use hammer_core::transport::DEFAULT_EXTERNAL_PROGRAM;
use hammer_core::{run_hammer_with_progress, HammerConfig, TransportKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "hammer",
    about = "Hammer one URL with a fixed pool of request workers",
    long_about = "Spawns a fixed number of worker threads, each issuing a fixed number of\n\
                  GET requests against one URL, then waits for all of them. Request\n\
                  outcomes are discarded."
)]
struct Cli {
    /// JSON preset; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Target URL [default: https://localhost:8080/helloworld]
    #[arg(long, env = "HAMMER_URL")]
    url: Option<String>,
    /// Number of concurrent workers [default: 10]
    #[arg(long, env = "HAMMER_WORKERS")]
    workers: Option<usize>,
    /// Requests issued by each worker [default: 100]
    #[arg(long, env = "HAMMER_ITERATIONS")]
    iterations: Option<usize>,
    /// Request mechanism
    #[arg(long, value_enum)]
    transport: Option<Transport>,
    /// Program used by the external transport [default: curl]
    #[arg(long)]
    program: Option<String>,
    /// Verify TLS certificates instead of accepting any
    #[arg(long, overrides_with = "no_verify_tls")]
    verify_tls: bool,
    /// Accept any TLS certificate (the default; overrides a preset)
    #[arg(long, overrides_with = "verify_tls")]
    no_verify_tls: bool,
    /// Per-request timeout in seconds [default: 10]
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Draw a progress bar over all attempts
    #[arg(long)]
    progress: bool,
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Transport {
    /// In-process HTTP client
    Native,
    /// One child process per request
    External,
}

impl Cli {
    /// Preset (or defaults) with every explicit flag applied on top.
    fn resolve_config(&self) -> Result<HammerConfig> {
        let mut config = match &self.config {
            Some(path) => HammerConfig::from_json_file(path)
                .with_context(|| format!("loading preset {}", path.display()))?,
            None => HammerConfig::default(),
        };

        if let Some(url) = &self.url {
            config = config.with_target_url(url.clone());
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(iterations) = self.iterations {
            config = config.with_iterations_per_worker(iterations);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_request_timeout_secs(secs);
        }
        if self.verify_tls {
            config = config.with_accept_invalid_certs(false);
        } else if self.no_verify_tls {
            config = config.with_accept_invalid_certs(true);
        }
        let transport = self.resolve_transport(&config.transport);
        config = config.with_transport(transport);

        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    /// `--transport` picks the kind; `--program` names the program, falling
    /// back to the preset's program and then the default.
    fn resolve_transport(&self, preset: &TransportKind) -> TransportKind {
        let preset_program = match preset {
            TransportKind::External { program } => Some(program.clone()),
            TransportKind::Native => None,
        };
        match self.transport {
            Some(Transport::Native) => TransportKind::Native,
            Some(Transport::External) => TransportKind::External {
                program: self
                    .program
                    .clone()
                    .or(preset_program)
                    .unwrap_or_else(|| DEFAULT_EXTERNAL_PROGRAM.to_string()),
            },
            // A bare --program only makes sense for the external transport.
            None => match &self.program {
                Some(program) => TransportKind::External {
                    program: program.clone(),
                },
                None => preset.clone(),
            },
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let summary = run_hammer_with_progress(&config, cli.progress)?;
    info!(
        workers_joined = summary.workers_joined(),
        attempts = summary.total_attempts(),
        "all workers joined"
    );
    Ok(())
}

// ── main ───────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
