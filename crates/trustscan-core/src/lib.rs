//! # trustscan-core
//!
//! Shared types for trust store evaluation: key identifiers, trust contexts,
//! an owned X.509 certificate view, and the error taxonomy.
//!
//! Root CA identity here is the Subject Key Identifier, nothing else. The
//! engine in the `trustscan` crate links certificates to issuers by
//! AKI -> SKI and answers membership questions against per-source datasets
//! from `trustscan-stores`; this crate holds the vocabulary they share.

pub mod cert;
pub mod context;
pub mod error;
pub mod keyid;

pub use cert::{is_dns_name, Certificate};
pub use context::{Browser, Language, Platform, Source, TrustContext};
pub use error::{Result, TrustError};
pub use keyid::KeyId;
