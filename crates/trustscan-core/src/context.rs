//! Trust store contexts.
//!
//! Contexts partition into four disjoint groups. Sources are the bundles
//! that actually carry data; Platforms, Browsers, and Languages are aliases
//! that resolve to exactly one Source and exist only for reporting labels
//! and version metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TrustError};

/// A structurally distinct root certificate bundle.
///
/// Declaration order is the fixed probe order used by root discovery and
/// by the evaluator when resolving its backing certificate for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Common CA Database (Mozilla, Microsoft, and Apple programs)
    Ccadb,
    /// Java Runtime cacerts
    Java,
    /// Android latest AOSP bundle
    Android,
    /// Linux ca-certificates
    Linux,
    /// Python certifi bundle
    Certifi,
    /// rustls webpki-roots
    Rustls,
    /// curl CA extract
    Curl,
    /// Dart SDK bundle
    Dart,
    /// Mintsifry Rossii national roots
    Russia,
}

impl Source {
    /// Every source, in probe order.
    pub const ALL: [Self; 9] = [
        Self::Ccadb,
        Self::Java,
        Self::Android,
        Self::Linux,
        Self::Certifi,
        Self::Rustls,
        Self::Curl,
        Self::Dart,
        Self::Russia,
    ];

    /// Human-readable bundle name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ccadb => "CCADB",
            Self::Java => "Java",
            Self::Android => "Android",
            Self::Linux => "Linux",
            Self::Certifi => "Python certifi",
            Self::Rustls => "rustls",
            Self::Curl => "curl",
            Self::Dart => "Dart",
            Self::Russia => "Mintsifry Rossii",
        }
    }
}

/// Operating system / runtime version pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Platform {
    Android2_2,
    Android2_3,
    Android3,
    Android4,
    Android4_4,
    Android7,
    Android8,
    Android9,
    Android10,
    Android11,
    Android12,
    Android13,
    Android14,
    Linux,
    Java,
    Windows,
    Apple,
}

impl Platform {
    const fn source(self) -> Source {
        match self {
            Self::Android2_2
            | Self::Android2_3
            | Self::Android3
            | Self::Android4
            | Self::Android4_4
            | Self::Android7
            | Self::Android8
            | Self::Android9
            | Self::Android10
            | Self::Android11
            | Self::Android12
            | Self::Android13
            | Self::Android14 => Source::Android,
            Self::Linux => Source::Linux,
            Self::Java => Source::Java,
            Self::Windows | Self::Apple => Source::Ccadb,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Android2_2 => "Android 2.2 Froyo",
            Self::Android2_3 => "Android 2.3 Gingerbread",
            Self::Android3 => "Android 3 Honeycomb",
            Self::Android4 => "Android 4 Ice Cream Sandwich",
            Self::Android4_4 => "Android 4.4 KitKat",
            Self::Android7 => "Android 7 Nougat",
            Self::Android8 => "Android 8 Oreo",
            Self::Android9 => "Android 9 Pie",
            Self::Android10 => "Android 10",
            Self::Android11 => "Android 11",
            Self::Android12 => "Android 12",
            Self::Android13 => "Android 13",
            Self::Android14 => "Android 14",
            Self::Linux => "Linux (generic)",
            Self::Java => "Java Runtime",
            Self::Windows => "Microsoft Windows",
            Self::Apple => "Apple (macOS/iOS)",
        }
    }
}

/// Consumer web browsers. All current browsers consume the CCADB program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Browser {
    AmazonSilk,
    Brave,
    Chromium,
    Firefox,
    GoogleChrome,
    MicrosoftEdge,
    Opera,
    Safari,
    SamsungInternet,
    TorBrowser,
    Vivaldi,
    YandexBrowser,
}

impl Browser {
    const fn name(self) -> &'static str {
        match self {
            Self::AmazonSilk => "Amazon Silk",
            Self::Brave => "Brave",
            Self::Chromium => "Chromium",
            Self::Firefox => "Mozilla Firefox",
            Self::GoogleChrome => "Google Chrome",
            Self::MicrosoftEdge => "Microsoft Edge",
            Self::Opera => "Opera",
            Self::Safari => "Apple Safari",
            Self::SamsungInternet => "Samsung Internet Browser",
            Self::TorBrowser => "Tor Browser",
            Self::Vivaldi => "Vivaldi",
            Self::YandexBrowser => "Yandex Browser",
        }
    }
}

/// Language and ecosystem runtimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Language {
    PythonCertifi,
    PythonRequests,
    PythonUrllib,
    PythonDjango,
    Rust,
    Go,
    NodeJs,
    Curl,
    Dart,
}

impl Language {
    const fn source(self) -> Source {
        match self {
            Self::PythonCertifi
            | Self::PythonRequests
            | Self::PythonUrllib
            | Self::PythonDjango => Source::Certifi,
            Self::Rust => Source::Rustls,
            Self::Go => Source::Linux,
            Self::NodeJs => Source::Ccadb,
            Self::Curl => Source::Curl,
            Self::Dart => Source::Dart,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::PythonCertifi => "Python certifi",
            Self::PythonRequests => "Python requests",
            Self::PythonUrllib => "Python urllib",
            Self::PythonDjango => "Python Django",
            Self::Rust => "Rust rustls",
            Self::Go => "Go",
            Self::NodeJs => "Node.js",
            Self::Curl => "curl",
            Self::Dart => "Dart",
        }
    }
}

/// One trust store or platform/browser/language profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustContext {
    /// A bundle that carries its own data
    Source(Source),
    /// An OS/runtime version pin aliasing one source
    Platform(Platform),
    /// A browser aliasing one source
    Browser(Browser),
    /// A language runtime aliasing one source
    Language(Language),
}

impl TrustContext {
    /// Every recognized context, in the fixed reporting order.
    pub const ALL: [Self; 47] = [
        Self::Source(Source::Ccadb),
        Self::Source(Source::Java),
        Self::Source(Source::Android),
        Self::Source(Source::Linux),
        Self::Source(Source::Certifi),
        Self::Source(Source::Rustls),
        Self::Source(Source::Curl),
        Self::Source(Source::Dart),
        Self::Source(Source::Russia),
        Self::Platform(Platform::Android2_2),
        Self::Platform(Platform::Android2_3),
        Self::Platform(Platform::Android3),
        Self::Platform(Platform::Android4),
        Self::Platform(Platform::Android4_4),
        Self::Platform(Platform::Android7),
        Self::Platform(Platform::Android8),
        Self::Platform(Platform::Android9),
        Self::Platform(Platform::Android10),
        Self::Platform(Platform::Android11),
        Self::Platform(Platform::Android12),
        Self::Platform(Platform::Android13),
        Self::Platform(Platform::Android14),
        Self::Platform(Platform::Linux),
        Self::Platform(Platform::Java),
        Self::Platform(Platform::Windows),
        Self::Platform(Platform::Apple),
        Self::Browser(Browser::AmazonSilk),
        Self::Browser(Browser::Brave),
        Self::Browser(Browser::Chromium),
        Self::Browser(Browser::Firefox),
        Self::Browser(Browser::GoogleChrome),
        Self::Browser(Browser::MicrosoftEdge),
        Self::Browser(Browser::Opera),
        Self::Browser(Browser::Safari),
        Self::Browser(Browser::SamsungInternet),
        Self::Browser(Browser::TorBrowser),
        Self::Browser(Browser::Vivaldi),
        Self::Browser(Browser::YandexBrowser),
        Self::Language(Language::PythonCertifi),
        Self::Language(Language::PythonRequests),
        Self::Language(Language::PythonUrllib),
        Self::Language(Language::PythonDjango),
        Self::Language(Language::Rust),
        Self::Language(Language::Go),
        Self::Language(Language::NodeJs),
        Self::Language(Language::Curl),
        Self::Language(Language::Dart),
    ];

    /// Resolve this context to the source that carries its data.
    #[must_use]
    pub const fn source(self) -> Source {
        match self {
            Self::Source(s) => s,
            Self::Platform(p) => p.source(),
            Self::Browser(_) => Source::Ccadb,
            Self::Language(l) => l.source(),
        }
    }

    /// Human-readable name used in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Source(s) => s.name(),
            Self::Platform(p) => p.name(),
            Self::Browser(b) => b.name(),
            Self::Language(l) => l.name(),
        }
    }

    /// The context group, for report grouping.
    #[must_use]
    pub const fn group(self) -> &'static str {
        match self {
            Self::Source(_) => "source",
            Self::Platform(_) => "platform",
            Self::Browser(_) => "browser",
            Self::Language(_) => "language",
        }
    }

    /// Stable numeric tag for JSON/CLI callers.
    ///
    /// Sources are 1-based; platforms, browsers, and languages are offset
    /// by 100, 200, and 300 respectively. Tags never change meaning across
    /// releases; new contexts only append.
    #[must_use]
    pub fn tag(self) -> u32 {
        let (base, offset) = match self {
            Self::Source(_) => (0, self.position_in_group()),
            Self::Platform(_) => (100, self.position_in_group()),
            Self::Browser(_) => (200, self.position_in_group()),
            Self::Language(_) => (300, self.position_in_group()),
        };
        base + offset + 1
    }

    /// Look up a context by its stable numeric tag.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::InvalidContext` for a tag outside the
    /// recognized enumeration; it is never coerced to the aggregate.
    pub fn from_tag(tag: u32) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|ctx| ctx.tag() == tag)
            .ok_or(TrustError::InvalidContext { tag })
    }

    fn position_in_group(self) -> u32 {
        let mut index = 0;
        for ctx in Self::ALL {
            if ctx == self {
                return index;
            }
            if std::mem::discriminant(&ctx) == std::mem::discriminant(&self) {
                index += 1;
            }
        }
        // Unreachable: ALL enumerates every variant combination.
        0
    }
}

impl fmt::Display for TrustContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_alias_resolves_to_a_source() {
        for ctx in TrustContext::ALL {
            // Resolution must terminate in one hop and agree with itself.
            let source = ctx.source();
            assert_eq!(TrustContext::Source(source).source(), source);
        }
    }

    #[test]
    fn tags_are_unique_and_round_trip() {
        let mut seen = std::collections::HashSet::new();
        for ctx in TrustContext::ALL {
            let tag = ctx.tag();
            assert!(seen.insert(tag), "duplicate tag {tag} for {ctx:?}");
            assert_eq!(TrustContext::from_tag(tag).unwrap(), ctx);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = TrustContext::from_tag(99_999).unwrap_err();
        assert!(matches!(
            err,
            crate::error::TrustError::InvalidContext { tag: 99_999 }
        ));
    }

    #[test]
    fn browsers_alias_ccadb() {
        assert_eq!(
            TrustContext::Browser(Browser::Firefox).source(),
            Source::Ccadb
        );
        assert_eq!(
            TrustContext::Platform(Platform::Android9).source(),
            Source::Android
        );
        assert_eq!(
            TrustContext::Language(Language::PythonRequests).source(),
            Source::Certifi
        );
    }
}
