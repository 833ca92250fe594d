//! # trustscan-stores
//!
//! Per-source root CA datasets and the registry that serves them.
//!
//! Each source ships as an embedded PEM bundle indexed by Subject Key
//! Identifier at load time. Datasets are immutable once built; the bundled
//! registry is constructed exactly once behind a `OnceLock`, so concurrent
//! readers never observe a partial load. Trust evaluation never mutates
//! anything here.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use tracing::warn;
use trustscan_core::{Certificate, KeyId, Source};

mod bundled;

/// Sources that must all agree for the aggregate "is globally trusted"
/// verdict.
///
/// Registry-level configuration, not evaluator logic: extend this list as
/// new sources are added. Mintsifry Rossii is deliberately absent — it is a
/// national profile, not a consumer default, and would veto every root the
/// other bundles carry.
pub const AGGREGATE_SOURCES: &[Source] = &[
    Source::Ccadb,
    Source::Java,
    Source::Android,
    Source::Linux,
    Source::Certifi,
    Source::Rustls,
    Source::Curl,
    Source::Dart,
];

/// One source's root certificates and distrust list.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: Source,
    version: String,
    untrusted: HashSet<KeyId>,
    roots: HashMap<KeyId, String>,
}

impl Dataset {
    /// Build a dataset from a concatenated PEM bundle, indexing each
    /// certificate by its computed SKI.
    ///
    /// Blocks that fail to parse or lack an SKI are skipped with a warning;
    /// embedded data is fixed at compile time, so a skip here means the
    /// bundle needs regenerating, not that the process should die.
    #[must_use]
    pub fn from_pem_bundle(
        source: Source,
        version: &str,
        untrusted: &[&str],
        bundle: &str,
    ) -> Self {
        let mut roots = HashMap::new();
        match pem::parse_many(bundle) {
            Ok(blocks) => {
                for block in blocks {
                    if block.tag() != "CERTIFICATE" {
                        continue;
                    }
                    let text = pem::encode(&block);
                    match Certificate::from_der(block.into_contents()) {
                        Ok(cert) => match cert.subject_key_id() {
                            Some(ski) => {
                                roots.insert(ski.clone(), text);
                            }
                            None => warn!(
                                source = source.name(),
                                subject = cert.subject(),
                                "root certificate lacks an SKI, skipping"
                            ),
                        },
                        Err(e) => warn!(
                            source = source.name(),
                            error = %e,
                            "skipping unparsable certificate in bundle"
                        ),
                    }
                }
            }
            Err(e) => warn!(source = source.name(), error = %e, "bundle is not valid PEM"),
        }

        let untrusted = untrusted
            .iter()
            .filter_map(|s| match KeyId::parse(s) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(source = source.name(), value = s, error = %e,
                        "skipping malformed untrusted entry");
                    None
                }
            })
            .collect();

        Self {
            source,
            version: version.to_string(),
            untrusted,
            roots,
        }
    }

    /// Build a dataset from pre-indexed `(SKI, PEM)` entries.
    ///
    /// This is the packaging the upstream dataset generator emits; nothing
    /// re-derives the keys, which is exactly why the resolver re-verifies
    /// them on every lookup.
    pub fn from_entries<I>(source: Source, version: &str, untrusted: &[&str], entries: I) -> Self
    where
        I: IntoIterator<Item = (KeyId, String)>,
    {
        let mut dataset = Self::from_pem_bundle(source, version, untrusted, "");
        dataset.roots = entries.into_iter().collect();
        dataset
    }

    /// The source this dataset belongs to.
    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    /// Upstream bundle version label.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether this identifier is explicitly distrusted.
    #[must_use]
    pub fn is_untrusted(&self, id: &KeyId) -> bool {
        self.untrusted.contains(id)
    }

    /// PEM text for a root, if present.
    #[must_use]
    pub fn root_text(&self, id: &KeyId) -> Option<&str> {
        self.roots.get(id).map(String::as_str)
    }

    /// Number of roots carried.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// True when the dataset carries no roots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// All key identifiers in this dataset, unordered.
    pub fn key_ids(&self) -> impl Iterator<Item = &KeyId> {
        self.roots.keys()
    }
}

/// Immutable collection of per-source datasets.
///
/// Safe to share by reference across concurrent evaluations; nothing
/// mutates it after construction.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    datasets: BTreeMap<Source, Dataset>,
}

impl Registry {
    /// Build a registry from explicit datasets.
    pub fn from_datasets<I>(datasets: I) -> Self
    where
        I: IntoIterator<Item = Dataset>,
    {
        Self {
            datasets: datasets.into_iter().map(|d| (d.source(), d)).collect(),
        }
    }

    /// The registry built from the embedded bundles, loaded once per
    /// process.
    pub fn bundled() -> &'static Self {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(bundled::build)
    }

    /// The dataset for one source, if this registry carries it.
    #[must_use]
    pub fn dataset(&self, source: Source) -> Option<&Dataset> {
        self.datasets.get(&source)
    }

    /// Whether the identifier is on the source's distrust list.
    #[must_use]
    pub fn is_untrusted(&self, source: Source, id: &KeyId) -> bool {
        self.dataset(source).is_some_and(|d| d.is_untrusted(id))
    }

    /// PEM text for a root in one source's dataset.
    #[must_use]
    pub fn root_text(&self, source: Source, id: &KeyId) -> Option<&str> {
        self.dataset(source).and_then(|d| d.root_text(id))
    }

    /// Upstream bundle version label for one source.
    #[must_use]
    pub fn version(&self, source: Source) -> Option<&str> {
        self.dataset(source).map(Dataset::version)
    }

    /// Sources present in this registry, in fixed probe order.
    pub fn sources(&self) -> impl Iterator<Item = Source> + '_ {
        Source::ALL
            .into_iter()
            .filter(|s| self.datasets.contains_key(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_registry_carries_every_source() {
        let registry = Registry::bundled();
        let sources: Vec<Source> = registry.sources().collect();
        assert_eq!(sources, Source::ALL.to_vec());
    }

    #[test]
    fn bundles_are_indexed_by_real_ski() {
        let registry = Registry::bundled();
        // DigiCert Global Root G2, present in every consumer bundle.
        let g2 = KeyId::parse("4e2254201895e6e36ee60ffafab912ed06178f39").unwrap();
        for source in AGGREGATE_SOURCES {
            let text = registry.root_text(*source, &g2).unwrap_or_else(|| {
                panic!("DigiCert G2 missing from {}", source.name())
            });
            let cert = Certificate::from_pem(text).unwrap();
            assert_eq!(cert.subject_key_id(), Some(&g2));
        }
    }

    #[test]
    fn java_snapshot_lacks_isrg_x2() {
        let registry = Registry::bundled();
        let x2 = KeyId::parse("7c4296aede4b483bfa92f89e8ccf6d8ba9723795").unwrap();
        assert!(registry.root_text(Source::Ccadb, &x2).is_some());
        assert!(registry.root_text(Source::Java, &x2).is_none());
    }

    #[test]
    fn russia_snapshot_is_present_but_empty() {
        let registry = Registry::bundled();
        let dataset = registry.dataset(Source::Russia).unwrap();
        assert!(dataset.is_empty());
        assert!(!AGGREGATE_SOURCES.contains(&Source::Russia));
    }

    #[test]
    fn key_ids_enumerate_the_indexed_roots() {
        let registry = Registry::bundled();
        let dataset = registry.dataset(Source::Ccadb).unwrap();
        let ids: Vec<KeyId> = dataset.key_ids().cloned().collect();
        assert_eq!(ids.len(), dataset.len());
        assert!(!ids.is_empty());
        for id in &ids {
            let cert = Certificate::from_pem(dataset.root_text(id).unwrap()).unwrap();
            assert_eq!(cert.subject_key_id(), Some(id));
        }
    }

    #[test]
    fn malformed_untrusted_entries_are_skipped() {
        let dataset =
            Dataset::from_pem_bundle(Source::Ccadb, "test", &["zz-not-hex", "abb6db"], "");
        assert!(dataset.is_untrusted(&KeyId::parse("abb6db").unwrap()));
        assert_eq!(dataset.len(), 0);
    }
}
