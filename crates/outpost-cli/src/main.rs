//! # outpost — container TCP connection discovery
//!
//! Reads a manifest of containers (name, artefact, main-process PID,
//! network mode, publish bindings), discovers each container's listening
//! and established TCP connections through its `/proc` socket tables, and
//! prints the result as a JSON array.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use outpost_common::config::ScanConfig;
use outpost_common::constants;
use outpost_scan::{ProcfsHost, Scanner};

/// Command-line arguments for the `outpost` binary.
#[derive(Debug, Parser)]
#[command(name = constants::APP_NAME, version, about = "Discover the TCP sockets each container is actually talking on")]
struct Cli {
    /// Container manifest: a JSON array of
    /// {name, artefact, pid, host_network, publish_bindings} records.
    #[arg(long)]
    manifest: PathBuf,

    /// Comma-separated interface addresses substituted for wildcard binds.
    #[arg(long, env = constants::INTERFACES_ENV, default_value = constants::DEFAULT_INTERFACE)]
    interfaces: String,

    /// Maximum number of containers scanned concurrently.
    #[arg(long, default_value_t = constants::DEFAULT_SCAN_CONCURRENCY)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = ScanConfig::from_interface_spec(&cli.interfaces);
    config.max_concurrency = cli.concurrency;
    tracing::debug!(interfaces = ?config.interfaces, "wildcard fan-out targets");

    let host = ProcfsHost::from_manifest(&cli.manifest)?;
    let scanner = Scanner::new(Arc::new(host), config);
    let intel = scanner.scan_all().await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&intel)?);
    }
    Ok(())
}
