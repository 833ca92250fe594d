//! Command-line argument definitions using clap.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

/// Evaluate TLS server certificates against root CA trust stores
///
/// Connects to each target, collects the presented certificate chain,
/// reconstructs it against the bundled trust stores, and reports which
/// platforms, browsers, and language runtimes trust the discovered roots.
#[derive(Parser, Debug)]
#[command(name = "trustscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Targets to evaluate, as host or host:port (default port 443)
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Client certificate and key PEM file for mutual TLS targets
    #[arg(short = 'C', long, value_name = "FILE")]
    pub client_pem: Option<PathBuf>,

    /// Do not send the SNI extension during the handshake
    #[arg(long)]
    pub disable_sni: bool,

    /// Write the full evaluation as JSON to this file
    #[arg(short = 'O', long, value_name = "FILE")]
    pub json_file: Option<PathBuf>,

    /// Increase verbosity (-v errors .. -vvvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Split a `host[:port]` target, defaulting to port 443.
///
/// # Errors
///
/// Fails on an empty host or a port that is not a valid `u16`.
pub fn parse_target(target: &str) -> Result<(String, u16)> {
    let (host, port) = match target.rsplit_once(':') {
        Some((host, port)) => {
            let port: u16 = port
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid port in target {target:?}"))?;
            (host, port)
        }
        None => (target, 443),
    };
    if host.is_empty() {
        bail!("empty host in target {target:?}");
    }
    Ok((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_defaults_to_443() {
        assert_eq!(parse_target("example.com").unwrap(), ("example.com".into(), 443));
    }

    #[test]
    fn target_with_port() {
        assert_eq!(parse_target("example.com:8443").unwrap(), ("example.com".into(), 8443));
    }

    #[test]
    fn bad_targets_are_rejected() {
        assert!(parse_target(":443").is_err());
        assert!(parse_target("example.com:notaport").is_err());
        assert!(parse_target("example.com:99999").is_err());
    }
}
