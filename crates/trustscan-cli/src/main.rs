//! trustscan - evaluate TLS server certificates against root CA trust
//! stores.

use anyhow::Result;

fn main() -> Result<()> {
    trustscan_cli::run()
}
