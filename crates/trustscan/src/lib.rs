//! # trustscan
//!
//! Certificate chain reconstruction and root CA trust store evaluation.
//!
//! Given the unordered certificate pile a TLS peer presents, this crate
//! identifies the server leaf, reconstructs issuance chains by key
//! identifier linkage, discovers which bundled trust store roots complete
//! them, and evaluates each discovered root against every known trust
//! store context. Chain reconstruction is structural: Subject and
//! Authority Key Identifiers only, no signature verification.

pub mod chain;
pub mod evaluate;
pub mod fetch;
pub mod resolve;

pub use chain::{build_chains, find_leaf, trust_stores_from_chain, ChainNode, RootChain};
pub use evaluate::{StoreReport, TrustReport, TrustStore};
pub use fetch::{fetch_peer_chain, ClientIdentity, PeerChain};
pub use resolve::certificate_from_store;
