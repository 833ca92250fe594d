//! Certificate-from-store resolution.

use tracing::warn;
use trustscan_core::{Certificate, KeyId, Result, TrustContext, TrustError};
use trustscan_stores::Registry;

/// Resolve a root certificate by key identifier from one context's dataset.
///
/// Aliased contexts (platforms, browsers, languages) resolve against their
/// underlying source. The parsed certificate's own SKI is re-verified
/// against the requested identifier: dataset tables are generated out of
/// band, and a stale or corrupted entry must resolve to nothing rather than
/// to an unrelated certificate.
///
/// # Errors
///
/// Returns `TrustError::NotFound` when the identifier is absent from the
/// dataset or fails SKI re-verification, and a parse error when the stored
/// PEM itself is malformed.
pub fn certificate_from_store(
    registry: &Registry,
    key_id: &KeyId,
    ctx: TrustContext,
) -> Result<Certificate> {
    let source = ctx.source();
    let text = registry
        .root_text(source, key_id)
        .ok_or_else(|| TrustError::NotFound {
            key_id: key_id.to_string(),
            context: source.name(),
        })?;
    let cert = Certificate::from_pem(text)?;
    if cert.subject_key_id() != Some(key_id) {
        warn!(
            source = source.name(),
            requested = %key_id,
            resolved = ?cert.subject_key_id(),
            "dataset entry fails SKI re-verification, treating as missing"
        );
        return Err(TrustError::NotFound {
            key_id: key_id.to_string(),
            context: source.name(),
        });
    }
    Ok(cert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustscan_core::Source;
    use trustscan_stores::Dataset;

    const AMAZON_CA3_SKI: &str = "abb6dbd7069e37ac3086079170c79cc419b178c0";
    const DIGICERT_G2_SKI: &str = "4e2254201895e6e36ee60ffafab912ed06178f39";

    #[test]
    fn resolves_and_verifies_round_trip() {
        let registry = Registry::bundled();
        let id = KeyId::parse(AMAZON_CA3_SKI).unwrap();
        let cert = certificate_from_store(
            registry,
            &id,
            TrustContext::Source(Source::Ccadb),
        )
        .unwrap();
        assert_eq!(cert.subject_key_id(), Some(&id));
        assert_eq!(cert.effective_name().unwrap(), "Amazon Root CA 3");
    }

    #[test]
    fn alias_context_resolves_via_its_source() {
        let registry = Registry::bundled();
        let id = KeyId::parse(DIGICERT_G2_SKI).unwrap();
        let via_browser = certificate_from_store(
            registry,
            &id,
            TrustContext::Browser(trustscan_core::Browser::Firefox),
        )
        .unwrap();
        assert_eq!(via_browser.effective_name().unwrap(), "DigiCert Global Root G2");
    }

    #[test]
    fn absent_identifier_is_not_found() {
        let registry = Registry::bundled();
        let id = KeyId::parse("00112233445566778899aabbccddeeff00112233").unwrap();
        let err = certificate_from_store(
            registry,
            &id,
            TrustContext::Source(Source::Linux),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn mismatched_entry_resolves_to_nothing() {
        let registry = Registry::bundled();
        let g2 = KeyId::parse(DIGICERT_G2_SKI).unwrap();
        let pem = registry
            .root_text(Source::Ccadb, &g2)
            .unwrap()
            .to_string();

        // Seed a table keyed by an identifier the PEM does not carry.
        let wrong = KeyId::parse("deadbeef00000000000000000000000000000000").unwrap();
        let corrupted = Registry::from_datasets([Dataset::from_entries(
            Source::Ccadb,
            "corrupt",
            &[],
            [(wrong.clone(), pem)],
        )]);

        let err = certificate_from_store(
            &corrupted,
            &wrong,
            TrustContext::Source(Source::Ccadb),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
