//! TLS peer chain collection.
//!
//! Opens a TLS session for the sole purpose of receiving whatever
//! certificates the peer presents. Verification is deliberately disabled:
//! judging those certificates is the evaluator's job, and a peer whose
//! chain fails validation is exactly the peer worth inspecting.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use rustls::{
    ClientConfig, ClientConnection, DigitallySignedStruct, SignatureScheme,
    SupportedProtocolVersion,
};
use tracing::debug;
use trustscan_core::{is_dns_name, Certificate, Result, TrustError};

const CONNECT_TIMEOUT_SECS: u64 = 2;

/// Protocols offered in descending preference. Each gets its own
/// handshake attempt so a legacy-only peer still yields its chain.
const PROTOCOLS: &[(&SupportedProtocolVersion, &str)] = &[
    (&rustls::version::TLS13, "TLSv1.3"),
    (&rustls::version::TLS12, "TLSv1.2"),
];

const ALL_SIGNATURE_SCHEMES: &[SignatureScheme] = &[
    SignatureScheme::RSA_PKCS1_SHA256,
    SignatureScheme::RSA_PKCS1_SHA384,
    SignatureScheme::RSA_PKCS1_SHA512,
    SignatureScheme::ECDSA_NISTP256_SHA256,
    SignatureScheme::ECDSA_NISTP384_SHA384,
    SignatureScheme::ECDSA_NISTP521_SHA512,
    SignatureScheme::RSA_PSS_SHA256,
    SignatureScheme::RSA_PSS_SHA384,
    SignatureScheme::RSA_PSS_SHA512,
    SignatureScheme::ED25519,
];

/// Accepts any server certificate. Collection must not depend on the very
/// trust decision this tool exists to make.
#[derive(Debug)]
struct NoVerifier;

impl ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        ALL_SIGNATURE_SCHEMES.to_vec()
    }
}

/// Client certificate and key for servers that demand mutual TLS.
#[derive(Debug)]
pub struct ClientIdentity {
    certs: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

impl ClientIdentity {
    /// Load a client certificate chain and private key from one PEM file.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::Io` when the file cannot be read and
    /// `TrustError::ClientIdentity` when it lacks a certificate or key.
    pub fn from_pem_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|source| TrustError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let certs: Vec<CertificateDer<'static>> =
            rustls_pemfile::certs(&mut data.as_slice())
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| TrustError::ClientIdentity {
                    reason: e.to_string(),
                })?;
        if certs.is_empty() {
            return Err(TrustError::ClientIdentity {
                reason: "no certificate in PEM file".to_string(),
            });
        }
        let key = rustls_pemfile::private_key(&mut data.as_slice())
            .map_err(|e| TrustError::ClientIdentity {
                reason: e.to_string(),
            })?
            .ok_or_else(|| TrustError::ClientIdentity {
                reason: "no private key in PEM file".to_string(),
            })?;
        Ok(Self { certs, key })
    }
}

/// The certificates a TLS peer presented, in presentation order.
#[derive(Debug, Clone)]
pub struct PeerChain {
    /// Peer-presented certificates, leaf conventionally first but not
    /// guaranteed ordered
    pub certificates: Vec<Certificate>,
    /// Address the session was established with
    pub peer_address: SocketAddr,
    /// Protocol label of the successful handshake
    pub protocol: &'static str,
}

/// Collect the certificate chain a TLS server presents.
///
/// Attempts each protocol in [`PROTOCOLS`] order with a fresh TCP
/// connection and returns the first successful handshake's chain.
///
/// # Errors
///
/// `InvalidDomain` for a non-DNS host, `Dns` when resolution yields no
/// address, `Timeout`/`ConnectFailure` for transport problems, and
/// `NoSupportedProtocol` when every offered protocol is rejected.
pub fn fetch_peer_chain(
    host: &str,
    port: u16,
    use_sni: bool,
    client_identity: Option<&ClientIdentity>,
) -> Result<PeerChain> {
    if !is_dns_name(host) {
        return Err(TrustError::InvalidDomain {
            host: host.to_string(),
        });
    }
    let addr = (host, port)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| TrustError::Dns {
            host: host.to_string(),
        })?;
    let server_name =
        ServerName::try_from(host.to_string()).map_err(|_| TrustError::InvalidDomain {
            host: host.to_string(),
        })?;

    for &(version, label) in PROTOCOLS {
        match handshake(host, port, addr, &server_name, version, use_sni, client_identity)? {
            Some(certificates) => {
                return Ok(PeerChain {
                    certificates,
                    peer_address: addr,
                    protocol: label,
                });
            }
            None => debug!(host, port, protocol = label, "handshake rejected"),
        }
    }
    Err(TrustError::NoSupportedProtocol {
        host: host.to_string(),
        port,
    })
}

/// One protocol attempt. `Ok(None)` means the peer rejected this protocol;
/// transport-level failures abort the whole fetch.
fn handshake(
    host: &str,
    port: u16,
    addr: SocketAddr,
    server_name: &ServerName<'static>,
    version: &'static SupportedProtocolVersion,
    use_sni: bool,
    client_identity: Option<&ClientIdentity>,
) -> Result<Option<Vec<Certificate>>> {
    let timeout = Duration::from_secs(CONNECT_TIMEOUT_SECS);
    let mut sock = TcpStream::connect_timeout(&addr, timeout).map_err(|e| {
        if e.kind() == std::io::ErrorKind::TimedOut {
            TrustError::Timeout {
                host: host.to_string(),
                port,
                secs: CONNECT_TIMEOUT_SECS,
            }
        } else {
            TrustError::ConnectFailure {
                host: host.to_string(),
                port,
                reason: e.to_string(),
            }
        }
    })?;
    sock.set_read_timeout(Some(timeout)).ok();
    sock.set_write_timeout(Some(timeout)).ok();

    let builder = ClientConfig::builder_with_protocol_versions(&[version])
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(NoVerifier));
    let mut config = match client_identity {
        Some(identity) => builder
            .with_client_auth_cert(identity.certs.clone(), identity.key.clone_key())
            .map_err(|e| TrustError::ClientIdentity {
                reason: e.to_string(),
            })?,
        None => builder.with_no_client_auth(),
    };
    config.enable_sni = use_sni;

    let mut conn = ClientConnection::new(Arc::new(config), server_name.clone())
        .map_err(|e| TrustError::ConnectFailure {
            host: host.to_string(),
            port,
            reason: e.to_string(),
        })?;

    while conn.is_handshaking() {
        match conn.complete_io(&mut sock) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut
                || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                return Err(TrustError::Timeout {
                    host: host.to_string(),
                    port,
                    secs: CONNECT_TIMEOUT_SECS,
                });
            }
            // Alert or version refusal: let the caller try the next
            // protocol rather than failing the target.
            Err(e) => {
                debug!(host, port, error = %e, "handshake I/O failed");
                return Ok(None);
            }
        }
    }

    let Some(ders) = conn.peer_certificates() else {
        return Ok(None);
    };
    let mut certificates = Vec::with_capacity(ders.len());
    for der in ders {
        match Certificate::from_der(der.as_ref().to_vec()) {
            Ok(cert) => certificates.push(cert),
            Err(e) => debug!(host, error = %e, "skipping unparsable peer certificate"),
        }
    }
    Ok(Some(certificates))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_dns_host() {
        let err = fetch_peer_chain("not a host", 443, true, None).unwrap_err();
        assert!(matches!(err, TrustError::InvalidDomain { .. }));
    }

    #[test]
    fn missing_identity_file_is_an_io_error() {
        let err =
            ClientIdentity::from_pem_file(std::path::Path::new("/nonexistent/client.pem"))
                .unwrap_err();
        assert!(matches!(err, TrustError::Io { .. }));
    }
}
