use thiserror::Error;

/// Result type alias for trust evaluation operations
pub type Result<T> = std::result::Result<T, TrustError>;

/// Errors that can occur during chain reconstruction and trust evaluation
#[derive(Error, Debug)]
pub enum TrustError {
    /// Caller supplied something that is not a hex-shaped key identifier
    #[error("invalid key identifier {value:?}, expected lowercase hex")]
    InvalidKeyId {
        /// The rejected input
        value: String,
    },

    /// A context tag outside the recognized enumeration
    #[error("invalid trust store context {tag}")]
    InvalidContext {
        /// The rejected numeric tag
        tag: u32,
    },

    /// No resolvable certificate for this identifier/context combination
    #[error("certificate {key_id} does not exist in the {context} trust store")]
    NotFound {
        /// Requested key identifier (lowercase hex)
        key_id: String,
        /// Name of the probed context
        context: &'static str,
    },

    /// Chain reconstruction could not identify a unique server leaf
    #[error("certificate chain is empty or missing a server leaf certificate")]
    InvalidChain,

    /// Certificate lacks both Common Name and Organization Name
    #[error("certificate subject {subject:?} has neither common name nor organization")]
    NameExtraction {
        /// Full subject distinguished name
        subject: String,
    },

    /// X.509 DER parsing failed
    #[error("certificate parse failed: {reason}")]
    CertParse {
        /// Parser diagnostic
        reason: String,
    },

    /// PEM decoding failed
    #[error("PEM decode failed: {reason}")]
    PemDecode {
        /// Decoder diagnostic
        reason: String,
    },

    /// Target host is not a syntactically valid DNS domain name
    #[error("invalid domain name: {host}")]
    InvalidDomain {
        /// The rejected host string
        host: String,
    },

    /// DNS resolution produced no usable address
    #[error("DNS resolution failed for {host}")]
    Dns {
        /// Host that failed to resolve
        host: String,
    },

    /// TCP connect or TLS I/O timed out
    #[error("connection to {host}:{port} timed out after {secs} seconds")]
    Timeout {
        /// Target host
        host: String,
        /// Target port
        port: u16,
        /// Configured timeout
        secs: u64,
    },

    /// TCP connection failed
    #[error("connection to {host}:{port} failed: {reason}")]
    ConnectFailure {
        /// Target host
        host: String,
        /// Target port
        port: u16,
        /// Underlying I/O diagnostic
        reason: String,
    },

    /// Every offered TLS protocol version was rejected by the peer
    #[error("no supported TLS protocols for {host}:{port}")]
    NoSupportedProtocol {
        /// Target host
        host: String,
        /// Target port
        port: u16,
    },

    /// Client certificate material could not be loaded
    #[error("client identity error: {reason}")]
    ClientIdentity {
        /// What was wrong with the supplied PEM
        reason: String,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl TrustError {
    /// Returns true for routine lookup misses callers may branch on
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for per-target network failures that should not abort
    /// evaluation of remaining targets
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Dns { .. }
                | Self::Timeout { .. }
                | Self::ConnectFailure { .. }
                | Self::NoSupportedProtocol { .. }
        )
    }
}
