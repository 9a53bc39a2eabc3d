//! Secure transport.
//!
//! The server core only ever sees [`SecureTransport`]: something that turns
//! an accepted TCP socket into a byte stream. Production uses rustls through
//! [`TlsTransport`]; [`Plaintext`] skips the handshake entirely.

use std::fs::File;
use std::future::Future;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsAcceptor;

use crate::error::{Result, ServerError};

pub trait SecureTransport: Clone + Send + Sync + 'static {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    fn handshake(&self, stream: TcpStream) -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

#[derive(Clone)]
pub struct TlsTransport {
    acceptor: TlsAcceptor,
}

impl TlsTransport {
    pub fn new(config: Arc<rustls::ServerConfig>) -> Self {
        Self {
            acceptor: TlsAcceptor::from(config),
        }
    }

    pub fn from_pem_files(cert_path: &Path, key_path: &Path) -> Result<Self> {
        Ok(Self::new(build_server_config(cert_path, key_path)?))
    }
}

impl SecureTransport for TlsTransport {
    type Stream = tokio_rustls::server::TlsStream<TcpStream>;

    fn handshake(&self, stream: TcpStream) -> impl Future<Output = io::Result<Self::Stream>> + Send {
        self.acceptor.accept(stream)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl SecureTransport for Plaintext {
    type Stream = TcpStream;

    fn handshake(&self, stream: TcpStream) -> impl Future<Output = io::Result<Self::Stream>> + Send {
        std::future::ready(Ok(stream))
    }
}

/// Build a rustls `ServerConfig` from a PEM certificate chain and key.
pub fn build_server_config(cert_path: &Path, key_path: &Path) -> Result<Arc<rustls::ServerConfig>> {
    let certs = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ServerError::Tls(e.to_string()))?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| ServerError::Tls(e.to_string()))?;
    config.alpn_protocols = vec![b"http/1.1".to_vec()];

    Ok(Arc::new(config))
}

/// Load certificates from PEM file
pub fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let file = File::open(path).map_err(|e| {
        ServerError::Tls(format!("failed to open certificate file {}: {}", path.display(), e))
    })?;
    let mut reader = BufReader::new(file);

    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ServerError::Tls(format!("failed to parse certificates: {}", e)))?;

    if certs.is_empty() {
        return Err(ServerError::Tls(format!(
            "no certificates found in {}",
            path.display()
        )));
    }

    Ok(certs)
}

/// Load private key from PEM file
pub fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let file = File::open(path)
        .map_err(|e| ServerError::Tls(format!("failed to open key file {}: {}", path.display(), e)))?;
    let mut reader = BufReader::new(file);

    loop {
        match rustls_pemfile::read_one(&mut reader)
            .map_err(|e| ServerError::Tls(format!("failed to parse key: {}", e)))?
        {
            Some(rustls_pemfile::Item::Pkcs1Key(key)) => return Ok(PrivateKeyDer::Pkcs1(key)),
            Some(rustls_pemfile::Item::Pkcs8Key(key)) => return Ok(PrivateKeyDer::Pkcs8(key)),
            Some(rustls_pemfile::Item::Sec1Key(key)) => return Ok(PrivateKeyDer::Sec1(key)),
            None => break,
            _ => continue,
        }
    }

    Err(ServerError::Tls(format!("no private key found in {}", path.display())))
}
