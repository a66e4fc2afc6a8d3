use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quicpulse_auth::cli::Args;
use quicpulse_auth::core;
use quicpulse_auth::status::ExitStatus;

/// Entry point - parses arguments, sets up logging and runs the pipeline
///
/// The runtime is built by hand so an interrupted prompt cannot hold up exit.
fn main() -> ExitStatus {
    let args = Args::parse();
    init_tracing(args.log_directive());
    core::block_on_detached(core::run(args))
}

/// Initialize tracing subscriber with environment filter (RUST_LOG wins)
fn init_tracing(default_directive: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
