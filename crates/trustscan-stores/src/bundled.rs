//! Embedded dataset snapshots.
//!
//! One PEM bundle per source under `data/`, refreshed out of band by the
//! dataset generator. Version labels identify the upstream snapshot each
//! bundle was cut from. Untrusted lists carry roots a store has explicitly
//! distrusted while legacy data still contains them; this curated snapshot
//! has none.

use trustscan_core::Source;

use crate::{Dataset, Registry};

const CCADB_VERSION: &str = "2025.07";
const JAVA_VERSION: &str = "jdk-21.0.4";
const ANDROID_VERSION: &str = "15";
const LINUX_VERSION: &str = "ca-certificates 2025-02";
const CERTIFI_VERSION: &str = "2025.07.14";
const RUSTLS_VERSION: &str = "webpki-roots 0.26";
const CURL_VERSION: &str = "2025-07-15";
const DART_VERSION: &str = "sdk 3.5";
const RUSSIA_VERSION: &str = "2022.01";

const CCADB_UNTRUSTED: &[&str] = &[];
const JAVA_UNTRUSTED: &[&str] = &[];
const ANDROID_UNTRUSTED: &[&str] = &[];
const LINUX_UNTRUSTED: &[&str] = &[];
const CERTIFI_UNTRUSTED: &[&str] = &[];
const RUSTLS_UNTRUSTED: &[&str] = &[];
const CURL_UNTRUSTED: &[&str] = &[];
const DART_UNTRUSTED: &[&str] = &[];
const RUSSIA_UNTRUSTED: &[&str] = &[];

pub(crate) fn build() -> Registry {
    Registry::from_datasets([
        Dataset::from_pem_bundle(
            Source::Ccadb,
            CCADB_VERSION,
            CCADB_UNTRUSTED,
            include_str!("../data/ccadb.pem"),
        ),
        Dataset::from_pem_bundle(
            Source::Java,
            JAVA_VERSION,
            JAVA_UNTRUSTED,
            include_str!("../data/java.pem"),
        ),
        Dataset::from_pem_bundle(
            Source::Android,
            ANDROID_VERSION,
            ANDROID_UNTRUSTED,
            include_str!("../data/android.pem"),
        ),
        Dataset::from_pem_bundle(
            Source::Linux,
            LINUX_VERSION,
            LINUX_UNTRUSTED,
            include_str!("../data/linux.pem"),
        ),
        Dataset::from_pem_bundle(
            Source::Certifi,
            CERTIFI_VERSION,
            CERTIFI_UNTRUSTED,
            include_str!("../data/certifi.pem"),
        ),
        Dataset::from_pem_bundle(
            Source::Rustls,
            RUSTLS_VERSION,
            RUSTLS_UNTRUSTED,
            include_str!("../data/rustls.pem"),
        ),
        Dataset::from_pem_bundle(
            Source::Curl,
            CURL_VERSION,
            CURL_UNTRUSTED,
            include_str!("../data/curl.pem"),
        ),
        Dataset::from_pem_bundle(
            Source::Dart,
            DART_VERSION,
            DART_UNTRUSTED,
            include_str!("../data/dart.pem"),
        ),
        Dataset::from_pem_bundle(
            Source::Russia,
            RUSSIA_VERSION,
            RUSSIA_UNTRUSTED,
            include_str!("../data/russia.pem"),
        ),
    ])
}
