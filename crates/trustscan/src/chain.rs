//! Certificate chain reconstruction.
//!
//! A TLS peer hands over an unordered, untrusted pile of certificates that
//! usually stops short of any root. Reconstruction identifies the server
//! leaf, groups the rest by Authority Key Identifier, and probes every
//! bundled source for roots that complete the dangling links. No signature
//! is ever verified here; linkage is AKI -> SKI only.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use trustscan_core::{is_dns_name, Certificate, KeyId, Result, TrustContext, TrustError};
use trustscan_stores::Registry;

use crate::evaluate::TrustStore;
use crate::resolve::certificate_from_store;

/// One certificate's position in a reconstructed issuance chain.
#[derive(Debug, Clone)]
pub struct ChainNode {
    /// The peer-supplied certificate at this position
    pub certificate: Certificate,
    /// Its Subject Key Identifier, when present
    pub subject_key_id: Option<KeyId>,
    /// Its Authority Key Identifier, when present
    pub authority_key_id: Option<KeyId>,
    /// Display name (CN, falling back to O)
    pub common_name: String,
    /// Certificates this one issued, in input order
    pub next: Vec<ChainNode>,
}

/// A discovered trust store root and the peer chain hanging off it.
#[derive(Debug, Clone)]
pub struct RootChain {
    /// The bundled root certificate that completes the chain
    pub certificate: Certificate,
    /// The root's Subject Key Identifier
    pub ski: KeyId,
    /// The root's display name
    pub common_name: String,
    /// Peer certificates issued (transitively) by this root
    pub next: Vec<ChainNode>,
}

/// Identify the server leaf certificate.
///
/// A certificate is a leaf candidate when its effective name is a wildcard
/// or a syntactically valid DNS domain name. Exactly one candidate must
/// exist; the reconstruction never guesses among several. The heuristic is
/// name-shape based, deliberately not basicConstraints based.
///
/// # Errors
///
/// Returns `TrustError::InvalidChain` for zero or multiple candidates and
/// propagates `TrustError::NameExtraction` from certificates lacking any
/// display name.
pub fn find_leaf(certificates: &[Certificate]) -> Result<&Certificate> {
    let mut candidates = Vec::new();
    for cert in certificates {
        let name = cert.effective_name()?;
        if name.starts_with('*') || is_dns_name(name) {
            candidates.push(cert);
        }
    }
    match candidates.as_slice() {
        [leaf] => Ok(leaf),
        _ => Err(TrustError::InvalidChain),
    }
}

/// Reconstruct issuance chains from an unordered peer certificate list.
///
/// For every peer certificate whose AKI differs from the leaf's, each
/// source is probed in fixed order for a root carrying that AKI as its
/// SKI; the first success contributes one discovered root, deduplicated by
/// root SKI. Probe misses are routine, not errors. An empty result is the
/// legitimate "no bundled store completes this chain" outcome.
///
/// Output order is discovery order, stable across runs.
pub fn build_chains(
    registry: &Registry,
    leaf: &Certificate,
    certificates: &[Certificate],
) -> Vec<RootChain> {
    let leaf_aki = leaf.authority_key_id();

    // Link table: issuer SKI -> certificates claiming that issuer.
    let mut lookup: HashMap<&KeyId, Vec<&Certificate>> = HashMap::new();
    if let Some(aki) = leaf_aki {
        lookup.entry(aki).or_default().push(leaf);
    }

    let mut roots: Vec<Certificate> = Vec::new();
    let mut seen_root_skis: HashSet<KeyId> = HashSet::new();

    for cert in certificates {
        if cert.authority_key_id() == leaf_aki {
            continue;
        }
        let Some(aki) = cert.authority_key_id() else {
            debug!(
                subject = cert.subject(),
                "peer certificate without AKI cannot be linked, skipping"
            );
            continue;
        };
        lookup.entry(aki).or_default().push(cert);

        for source in registry.sources() {
            match certificate_from_store(registry, aki, TrustContext::Source(source)) {
                Ok(root) => {
                    if let Some(ski) = root.subject_key_id() {
                        if seen_root_skis.insert(ski.clone()) {
                            debug!(source = source.name(), ski = %ski, "discovered completing root");
                            roots.push(root);
                        }
                    }
                    break;
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => debug!(source = source.name(), error = %e, "probe failed"),
            }
        }
    }

    let mut chains = Vec::with_capacity(roots.len());
    for root in roots {
        // Both always present: discovery keys on SKI, and a bundled root
        // without a usable name would never have shipped.
        let Some(ski) = root.subject_key_id().cloned() else {
            continue;
        };
        let common_name = root
            .effective_name()
            .unwrap_or(root.subject())
            .to_string();
        let mut visited = HashSet::new();
        visited.insert(ski.clone());
        let next = attach_issued(&ski, &lookup, &mut visited);
        chains.push(RootChain {
            certificate: root,
            ski,
            common_name,
            next,
        });
    }
    chains
}

/// Recursively attach peer certificates whose AKI equals `ski`.
///
/// Real chains are near-linear but branching is tolerated; the visited set
/// guards against self-issued certificates looping the walk.
fn attach_issued(
    ski: &KeyId,
    lookup: &HashMap<&KeyId, Vec<&Certificate>>,
    visited: &mut HashSet<KeyId>,
) -> Vec<ChainNode> {
    let mut nodes = Vec::new();
    for cert in lookup.get(ski).map(Vec::as_slice).unwrap_or_default() {
        let subject_key_id = cert.subject_key_id().cloned();
        let next = match &subject_key_id {
            Some(next_ski) if visited.insert(next_ski.clone()) => {
                attach_issued(next_ski, lookup, visited)
            }
            _ => Vec::new(),
        };
        nodes.push(ChainNode {
            certificate: (*cert).clone(),
            subject_key_id,
            authority_key_id: cert.authority_key_id().cloned(),
            common_name: cert
                .effective_name()
                .unwrap_or(cert.subject())
                .to_string(),
            next,
        });
    }
    nodes
}

/// Reconstruct chains and produce one evaluator per discovered root.
///
/// # Errors
///
/// Fails when no unique server leaf can be identified; an empty `Vec` is
/// the "untrusted by every known store" outcome and is not an error.
pub fn trust_stores_from_chain<'r>(
    registry: &'r Registry,
    certificates: &[Certificate],
) -> Result<Vec<TrustStore<'r>>> {
    let leaf = find_leaf(certificates)?;
    let chains = build_chains(registry, leaf, certificates);
    Ok(chains
        .into_iter()
        .map(|chain| TrustStore::new(chain.ski, registry))
        .collect())
}
