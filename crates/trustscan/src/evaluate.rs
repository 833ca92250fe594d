//! Per-store trust evaluation.
//!
//! A [`TrustStore`] evaluates one root CA key identifier against every
//! context a registry knows. The verdict per context is a plain
//! conjunction: not explicitly distrusted, present in the backing dataset,
//! and not expired. No signature checking and no network happens here.

use serde::Serialize;
use tracing::debug;
use trustscan_core::{Certificate, KeyId, Result, Source, TrustContext};
use trustscan_stores::{Registry, AGGREGATE_SOURCES};

use crate::resolve::certificate_from_store;

/// Evaluates one root CA identifier against a registry's trust stores.
#[derive(Debug, Clone)]
pub struct TrustStore<'r> {
    registry: &'r Registry,
    key_id: KeyId,
    certificate: Option<Certificate>,
}

impl<'r> TrustStore<'r> {
    /// Create an evaluator for one key identifier.
    ///
    /// The backing certificate is resolved eagerly by probing sources in
    /// fixed order; an identifier no source carries still evaluates, it
    /// just reports "absent" everywhere.
    #[must_use]
    pub fn new(key_id: KeyId, registry: &'r Registry) -> Self {
        let mut certificate = None;
        for source in registry.sources() {
            match certificate_from_store(registry, &key_id, TrustContext::Source(source)) {
                Ok(cert) => {
                    certificate = Some(cert);
                    break;
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => debug!(source = source.name(), error = %e, "resolve failed"),
            }
        }
        Self {
            registry,
            key_id,
            certificate,
        }
    }

    /// Create an evaluator backed by the embedded datasets.
    #[must_use]
    pub fn bundled(key_id: KeyId) -> TrustStore<'static> {
        TrustStore::new(key_id, Registry::bundled())
    }

    /// The identifier under evaluation.
    #[must_use]
    pub const fn key_id(&self) -> &KeyId {
        &self.key_id
    }

    /// The resolved root certificate, when any source carries it.
    #[must_use]
    pub const fn certificate(&self) -> Option<&Certificate> {
        self.certificate.as_ref()
    }

    /// Whether the identifier exists in the context's backing dataset.
    #[must_use]
    pub fn exists(&self, ctx: TrustContext) -> bool {
        certificate_from_store(self.registry, &self.key_id, ctx).is_ok()
    }

    /// Whether the root is expired as stored by this context's dataset.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::NotFound` when the context's dataset does not
    /// carry the identifier; expiry of an absent root is meaningless.
    pub fn expired_in_store(&self, ctx: TrustContext) -> Result<bool> {
        let cert = certificate_from_store(self.registry, &self.key_id, ctx)?;
        Ok(cert.is_expired())
    }

    /// Evaluate trust for one context, or the aggregate when `None`.
    ///
    /// A single context is trusted when the identifier is not on the
    /// source's distrust list, exists in its dataset, and the stored root
    /// has not expired. The aggregate requires every aggregate source to
    /// agree.
    #[must_use]
    pub fn check_trust(&self, ctx: Option<TrustContext>) -> bool {
        match ctx {
            Some(ctx) => self.check_source(ctx.source()),
            None => AGGREGATE_SOURCES
                .iter()
                .all(|source| self.check_source(*source)),
        }
    }

    /// Evaluate trust addressed by stable numeric tag.
    ///
    /// `None` evaluates the aggregate.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::InvalidContext` for an unrecognized tag; an
    /// unknown tag is a caller bug, never silently the aggregate.
    pub fn check_trust_tag(&self, tag: Option<u32>) -> Result<bool> {
        match tag {
            Some(tag) => Ok(self.check_trust(Some(TrustContext::from_tag(tag)?))),
            None => Ok(self.check_trust(None)),
        }
    }

    /// The aggregate verdict across all aggregate sources.
    #[must_use]
    pub fn is_trusted(&self) -> bool {
        self.check_trust(None)
    }

    fn check_source(&self, source: Source) -> bool {
        if self.registry.is_untrusted(source, &self.key_id) {
            return false;
        }
        let ctx = TrustContext::Source(source);
        match certificate_from_store(self.registry, &self.key_id, ctx) {
            Ok(cert) => !cert.is_expired(),
            Err(_) => false,
        }
    }

    /// Produce the full per-context report for this identifier.
    #[must_use]
    pub fn to_report(&self) -> TrustReport {
        let stores = TrustContext::ALL
            .iter()
            .map(|ctx| self.store_report(*ctx))
            .collect();
        TrustReport {
            key_id: self.key_id.clone(),
            common_name: self
                .certificate
                .as_ref()
                .and_then(|c| c.effective_name().ok())
                .map(ToString::to_string),
            not_after: self.certificate.as_ref().map(Certificate::not_after),
            is_trusted: self.is_trusted(),
            stores,
        }
    }

    fn store_report(&self, ctx: TrustContext) -> StoreReport {
        let source = ctx.source();
        let version = self
            .registry
            .version(source)
            .unwrap_or_default()
            .to_string();
        let exists = self.exists(ctx);
        let expired = exists.then(|| self.expired_in_store(ctx).unwrap_or(false));
        let trusted = self.check_trust(Some(ctx));
        let description =
            store_result_text(ctx.name(), source, &version, exists, expired.unwrap_or(false));
        StoreReport {
            name: ctx.name().to_string(),
            group: ctx.group().to_string(),
            tag: ctx.tag(),
            source: source.name().to_string(),
            version,
            trusted,
            exists,
            expired,
            description,
        }
    }
}

/// Aggregate evaluation result for one root CA identifier.
#[derive(Debug, Clone, Serialize)]
pub struct TrustReport {
    /// The evaluated Subject Key Identifier
    pub key_id: KeyId,
    /// Display name of the resolved root, when any source carries it
    pub common_name: Option<String>,
    /// Validity end of the resolved root
    pub not_after: Option<chrono::DateTime<chrono::Utc>>,
    /// Aggregate verdict across all aggregate sources
    pub is_trusted: bool,
    /// Per-context results in fixed reporting order
    pub stores: Vec<StoreReport>,
}

/// One context's evaluation result.
#[derive(Debug, Clone, Serialize)]
pub struct StoreReport {
    /// Context display name
    pub name: String,
    /// Context group: source, platform, browser, or language
    pub group: String,
    /// Stable numeric tag
    pub tag: u32,
    /// Backing source display name
    pub source: String,
    /// Backing dataset version label
    pub version: String,
    /// Trust verdict for this context
    pub trusted: bool,
    /// Whether the identifier exists in the backing dataset
    pub exists: bool,
    /// Expiry of the stored root; `None` when absent
    pub expired: Option<bool>,
    /// Human-readable result line
    pub description: String,
}

/// Render the per-store result line shown in reports.
fn store_result_text(
    name: &str,
    source: Source,
    version: &str,
    exists: bool,
    expired: bool,
) -> String {
    if !exists {
        return format!("No Root CA Certificate in the {name} Trust Store");
    }
    let mut text = if version.is_empty() {
        format!("Root CA Certificate present in {name} Trust Store")
    } else {
        format!("Root CA Certificate present in {name} {version} Trust Store")
    };
    match source {
        Source::Ccadb => text.push_str(" (Mozilla, Microsoft, and Apple)"),
        Source::Certifi => {
            text.push_str(" (Django, requests, urllib, and anything based from these)");
        }
        _ => {}
    }
    if expired {
        text.push_str(" EXPIRED");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustscan_core::{Browser, Language, Platform, TrustError};

    const DIGICERT_G2_SKI: &str = "4e2254201895e6e36ee60ffafab912ed06178f39";
    const ISRG_X2_SKI: &str = "7c4296aede4b483bfa92f89e8ccf6d8ba9723795";

    #[test]
    fn root_in_every_bundle_is_aggregate_trusted() {
        let store = TrustStore::bundled(KeyId::parse(DIGICERT_G2_SKI).unwrap());
        assert!(store.is_trusted());
        assert!(store.check_trust(Some(TrustContext::Browser(Browser::GoogleChrome))));
        assert!(store.check_trust(Some(TrustContext::Language(Language::Rust))));
    }

    #[test]
    fn one_missing_source_fails_the_aggregate() {
        // ISRG X2 is absent from the Java snapshot.
        let store = TrustStore::bundled(KeyId::parse(ISRG_X2_SKI).unwrap());
        assert!(store.check_trust(Some(TrustContext::Source(Source::Ccadb))));
        assert!(!store.check_trust(Some(TrustContext::Platform(Platform::Java))));
        assert!(!store.is_trusted());
    }

    #[test]
    fn unknown_identifier_evaluates_as_absent_everywhere() {
        let store =
            TrustStore::bundled(KeyId::parse("00112233445566778899aabbccddeeff00112233").unwrap());
        assert!(store.certificate().is_none());
        assert!(!store.is_trusted());
        for ctx in TrustContext::ALL {
            assert!(!store.exists(ctx));
            assert!(store.expired_in_store(ctx).unwrap_err().is_not_found());
        }
    }

    #[test]
    fn tag_addressing_matches_direct_contexts() {
        let store = TrustStore::bundled(KeyId::parse(DIGICERT_G2_SKI).unwrap());
        for ctx in TrustContext::ALL {
            assert_eq!(
                store.check_trust_tag(Some(ctx.tag())).unwrap(),
                store.check_trust(Some(ctx))
            );
        }
        assert_eq!(store.check_trust_tag(None).unwrap(), store.is_trusted());
        assert!(matches!(
            store.check_trust_tag(Some(99_999)),
            Err(TrustError::InvalidContext { tag: 99_999 })
        ));
    }

    #[test]
    fn report_covers_every_context_in_order() {
        let store = TrustStore::bundled(KeyId::parse(DIGICERT_G2_SKI).unwrap());
        let report = store.to_report();
        assert_eq!(report.common_name.as_deref(), Some("DigiCert Global Root G2"));
        assert!(report.is_trusted);
        assert_eq!(report.stores.len(), TrustContext::ALL.len());
        let tags: Vec<u32> = report.stores.iter().map(|s| s.tag).collect();
        let expected: Vec<u32> = TrustContext::ALL.iter().map(|c| c.tag()).collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn result_text_variants() {
        assert_eq!(
            store_result_text("CCADB", Source::Ccadb, "2025.07", true, false),
            "Root CA Certificate present in CCADB 2025.07 Trust Store \
             (Mozilla, Microsoft, and Apple)"
        );
        assert_eq!(
            store_result_text("Java", Source::Java, "jdk-21", true, true),
            "Root CA Certificate present in Java jdk-21 Trust Store EXPIRED"
        );
        assert_eq!(
            store_result_text("curl", Source::Curl, "x", false, false),
            "No Root CA Certificate in the curl Trust Store"
        );
    }
}
