//! CLI argument parsing and per-target orchestration.

pub mod args;

use anyhow::{Context as _, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use trustscan::{fetch_peer_chain, trust_stores_from_chain, ClientIdentity};
use trustscan_stores::Registry;

use crate::output::{self, Evaluation, QueryMeta};
use args::{parse_target, Cli};

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.targets.is_empty() {
        Cli::command().print_help()?;
        std::process::exit(1);
    }

    let identity = match cli.client_pem.as_deref() {
        Some(path) => Some(
            ClientIdentity::from_pem_file(path)
                .with_context(|| format!("loading client PEM {}", path.display()))?,
        ),
        None => None,
    };

    let registry = Registry::bundled();
    let execution_date = chrono::Utc::now();
    let started = std::time::Instant::now();
    let use_sni = !cli.disable_sni;

    let mut evaluations: Vec<Evaluation> = Vec::new();
    for target in &cli.targets {
        // One unreachable or malformed target never aborts the rest.
        match evaluate_target(registry, target, use_sni, identity.as_ref()) {
            Ok(result) => {
                output::render_target(&result);
                evaluations.extend(result);
            }
            Err(e) => {
                eprintln!("  {} {target}: {e:#}", "error".bright_red());
            }
        }
    }

    if let Some(path) = &cli.json_file {
        output::write_json_file(
            path,
            &cli.targets,
            execution_date,
            started.elapsed(),
            &evaluations,
        )
        .with_context(|| format!("writing {}", path.display()))?;
        println!("  JSON written to {}", path.display().to_string().dimmed());
    }

    Ok(())
}

/// Fetch one target's peer chain and evaluate every discovered root.
fn evaluate_target(
    registry: &Registry,
    target: &str,
    use_sni: bool,
    identity: Option<&ClientIdentity>,
) -> Result<Vec<Evaluation>> {
    let (host, port) = parse_target(target)?;
    let peer = fetch_peer_chain(&host, port, use_sni, identity)?;
    let stores = trust_stores_from_chain(registry, &peer.certificates)?;
    Ok(stores
        .iter()
        .map(|store| Evaluation {
            query: QueryMeta {
                host: host.clone(),
                port,
                peer_address: peer.peer_address.to_string(),
                protocol: peer.protocol.to_string(),
                use_sni,
            },
            report: store.to_report(),
        })
        .collect())
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
