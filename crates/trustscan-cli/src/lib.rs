//! # trustscan-cli
//!
//! Command-line front end for the trustscan evaluation engine.
//!
//! Fetches each target's TLS peer chain, reconstructs issuance chains
//! against the embedded trust store bundles, and renders per-context
//! verdicts to the console and optionally to a JSON file. Failures are
//! isolated per target; one unreachable host never aborts the run.

pub mod cli;
pub mod output;

pub use cli::run;
