//! PostgreSQL TLS Support
//!
//! Builds the TLS connector used when opening sessions, from the configured
//! SSL mode and an optional CA certificate.

use native_tls::{Certificate, TlsConnector as NativeTlsConnector};
use postgres_native_tls::MakeTlsConnector;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio_postgres::config::SslMode;
use tracing::{debug, info};

/// Error types for TLS operations
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    /// Failed to load CA certificate
    #[error("Failed to load CA certificate from {path}: {source}")]
    CaCertLoadFailed {
        path: String,
        source: std::io::Error,
    },

    /// Invalid CA certificate format
    #[error("Invalid CA certificate format: {0}")]
    InvalidCaCert(String),

    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    ConfigurationError(String),

    /// Unrecognized sslmode string
    #[error("Unknown SSL mode '{0}' (expected disable, prefer, require or verify-full)")]
    UnknownMode(String),
}

/// SSL negotiation mode, named after libpq's `sslmode` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    Disable,
    #[default]
    Prefer,
    /// Encrypt, but accept any certificate
    Require,
    /// Encrypt and verify certificate chain and hostname
    VerifyFull,
}

impl TlsMode {
    pub fn as_sslmode(&self) -> &'static str {
        match self {
            TlsMode::Disable => "disable",
            TlsMode::Prefer => "prefer",
            TlsMode::Require => "require",
            TlsMode::VerifyFull => "verify-full",
        }
    }

    fn ssl_mode(&self) -> SslMode {
        match self {
            TlsMode::Disable => SslMode::Disable,
            TlsMode::Prefer => SslMode::Prefer,
            TlsMode::Require | TlsMode::VerifyFull => SslMode::Require,
        }
    }
}

impl FromStr for TlsMode {
    type Err = TlsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "disable" => Ok(TlsMode::Disable),
            "allow" | "prefer" => Ok(TlsMode::Prefer),
            "require" => Ok(TlsMode::Require),
            "verify-full" | "verify_full" => Ok(TlsMode::VerifyFull),
            other => Err(TlsError::UnknownMode(other.to_string())),
        }
    }
}

/// TLS options for opening sessions
#[derive(Debug, Clone, Default)]
pub struct TlsSettings {
    pub mode: TlsMode,
    /// PEM-encoded root certificate to trust in addition to the system store
    pub ca_cert: Option<PathBuf>,
}

impl TlsSettings {
    pub fn disabled() -> Self {
        Self {
            mode: TlsMode::Disable,
            ca_cert: None,
        }
    }

    /// Apply the negotiation mode to a tokio-postgres config
    pub(crate) fn apply(&self, config: &mut tokio_postgres::Config) {
        config.ssl_mode(self.mode.ssl_mode());
    }
}

/// Build a TLS connector for the given settings.
///
/// Returns `None` when TLS is disabled, in which case sessions use `NoTls`.
pub fn build_tls_connector(settings: &TlsSettings) -> Result<Option<MakeTlsConnector>, TlsError> {
    if settings.mode == TlsMode::Disable {
        return Ok(None);
    }

    info!(mode = settings.mode.as_sslmode(), "Building PostgreSQL TLS connector");

    let mut builder = NativeTlsConnector::builder();

    if settings.mode != TlsMode::VerifyFull {
        debug!("Disabling certificate verification");
        builder.danger_accept_invalid_certs(true);
        builder.danger_accept_invalid_hostnames(true);
    }

    if let Some(ca_cert_path) = &settings.ca_cert {
        let cert = load_ca_cert(ca_cert_path)?;
        builder.add_root_certificate(cert);
    }

    let connector = builder
        .build()
        .map_err(|e| TlsError::ConfigurationError(e.to_string()))?;

    Ok(Some(MakeTlsConnector::new(connector)))
}

fn load_ca_cert(path: &Path) -> Result<Certificate, TlsError> {
    debug!(path = %path.display(), "Loading CA certificate");

    let pem_data = fs::read(path).map_err(|e| TlsError::CaCertLoadFailed {
        path: path.display().to_string(),
        source: e,
    })?;

    Certificate::from_pem(&pem_data).map_err(|e| TlsError::InvalidCaCert(e.to_string()))
}
