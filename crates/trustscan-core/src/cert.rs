//! Owned X.509 certificate view and identifier extraction.
//!
//! The rest of the engine never touches raw DER: everything it needs
//! (key identifiers, subject names, validity window) is extracted once at
//! construction into owned fields.

use chrono::{DateTime, TimeZone, Utc};
use x509_parser::prelude::*;

use crate::error::{Result, TrustError};
use crate::keyid::KeyId;

/// A parsed X.509 certificate with eagerly extracted fields.
///
/// Holds its own DER bytes; all accessors are pure reads.
#[derive(Debug, Clone)]
pub struct Certificate {
    der: Vec<u8>,
    subject_key_id: Option<KeyId>,
    authority_key_id: Option<KeyId>,
    common_name: Option<String>,
    organization: Option<String>,
    subject: String,
    issuer: String,
    serial: String,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

impl Certificate {
    /// Parse a DER-encoded certificate.
    ///
    /// Missing SKI/AKI extensions are a normal state (self-signed roots
    /// frequently lack an AKI), not an error.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::CertParse` if the DER is not a well-formed
    /// X.509 certificate.
    pub fn from_der(der: Vec<u8>) -> Result<Self> {
        let (_, cert) =
            parse_x509_certificate(&der).map_err(|e| TrustError::CertParse {
                reason: e.to_string(),
            })?;

        let mut subject_key_id = None;
        let mut authority_key_id = None;
        for ext in cert.extensions() {
            match ext.parsed_extension() {
                ParsedExtension::SubjectKeyIdentifier(ski) => {
                    subject_key_id = Some(KeyId::from_bytes(ski.0));
                }
                ParsedExtension::AuthorityKeyIdentifier(aki) => {
                    authority_key_id =
                        aki.key_identifier.as_ref().map(|k| KeyId::from_bytes(k.0));
                }
                _ => {}
            }
        }

        let common_name = cert
            .subject()
            .iter_common_name()
            .next()
            .and_then(|attr| attr.as_str().ok())
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);
        let organization = cert
            .subject()
            .iter_organization()
            .next()
            .and_then(|attr| attr.as_str().ok())
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);

        let subject = cert.subject().to_string();
        let issuer = cert.issuer().to_string();
        let serial = cert.raw_serial_as_string();
        let not_before = asn1_to_utc(cert.validity().not_before);
        let not_after = asn1_to_utc(cert.validity().not_after);

        Ok(Self {
            der,
            subject_key_id,
            authority_key_id,
            common_name,
            organization,
            subject,
            issuer,
            serial,
            not_before,
            not_after,
        })
    }

    /// Parse the first CERTIFICATE block in a PEM document.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::PemDecode` when no CERTIFICATE block is present
    /// and `TrustError::CertParse` when its payload is malformed.
    pub fn from_pem(text: &str) -> Result<Self> {
        let blocks = ::pem::parse_many(text).map_err(|e| TrustError::PemDecode {
            reason: e.to_string(),
        })?;
        let block = blocks
            .into_iter()
            .find(|p| p.tag() == "CERTIFICATE")
            .ok_or_else(|| TrustError::PemDecode {
                reason: "no CERTIFICATE block".to_string(),
            })?;
        Self::from_der(block.into_contents())
    }

    /// Subject Key Identifier, if the extension is present.
    #[must_use]
    pub const fn subject_key_id(&self) -> Option<&KeyId> {
        self.subject_key_id.as_ref()
    }

    /// Authority Key Identifier, if the extension is present.
    #[must_use]
    pub const fn authority_key_id(&self) -> Option<&KeyId> {
        self.authority_key_id.as_ref()
    }

    /// Subject Common Name, falling back to Organization Name.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::NameExtraction` when neither attribute exists;
    /// this indicates a malformed certificate and propagates.
    pub fn effective_name(&self) -> Result<&str> {
        self.common_name
            .as_deref()
            .or(self.organization.as_deref())
            .ok_or_else(|| TrustError::NameExtraction {
                subject: self.subject.clone(),
            })
    }

    /// Full subject distinguished name.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Full issuer distinguished name.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Serial number as uppercase hex with colons.
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Start of the validity window.
    #[must_use]
    pub const fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    /// End of the validity window.
    #[must_use]
    pub const fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    /// Whether the certificate is expired right now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.not_after
    }

    /// The DER encoding.
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Re-encode as a single PEM CERTIFICATE block.
    #[must_use]
    pub fn to_pem(&self) -> String {
        ::pem::encode(&::pem::Pem::new("CERTIFICATE", self.der.clone()))
    }
}

/// Convert an ASN.1 `GeneralizedTime` / `UTCTime` to `DateTime<Utc>`.
fn asn1_to_utc(t: x509_parser::time::ASN1Time) -> DateTime<Utc> {
    let epoch = t.timestamp();
    Utc.timestamp_opt(epoch, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Syntactic DNS domain name check used by leaf identification.
///
/// Mirrors the shape rule the chain builder relies on: at least two
/// dot-separated labels of alphanumerics and interior hyphens, with an
/// alphabetic top-level label. Deliberately not a registrable-domain check.
#[must_use]
pub fn is_dns_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 253 {
        return false;
    }
    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    for label in &labels {
        if label.is_empty()
            || label.len() > 63
            || label.starts_with('-')
            || label.ends_with('-')
            || !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return false;
        }
    }
    labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dns_name_shapes() {
        assert!(is_dns_name("example.com"));
        assert!(is_dns_name("tls-eval.trustscan.dev"));
        assert!(!is_dns_name("localhost"));
        assert!(!is_dns_name("Amazon Root CA 3"));
        assert!(!is_dns_name("-bad.example.com"));
        assert!(!is_dns_name("example.c3"));
        assert!(!is_dns_name(""));
    }
}
