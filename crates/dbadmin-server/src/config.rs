//! Server configuration
//!
//! Settings come from a TOML file (by default `<config dir>/dbadmin/config.toml`)
//! and are then overridden by command-line flags or `DBADMIN_*` environment
//! variables.

use anyhow::{Context, Result, bail};
use clap::Parser;
use dbadmin_driver_postgres::{TlsMode, TlsSettings};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::logging::LoggingConfig;

/// Command-line arguments
#[derive(Debug, Default, Parser)]
#[command(name = "dbadmin", version, about = "PostgreSQL table and routine administration over HTTP")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "DBADMIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// PostgreSQL connection string (URL or key=value form)
    #[arg(long, env = "DBADMIN_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to listen on
    #[arg(long, env = "DBADMIN_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Schema whose tables and routines are administered
    #[arg(long, env = "DBADMIN_SCHEMA")]
    pub schema: Option<String>,

    /// Directory for CSV uploads and exports, instead of the server's data_directory
    #[arg(long, env = "DBADMIN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// SSL mode: disable, prefer, require or verify-full
    #[arg(long, env = "DBADMIN_SSL_MODE")]
    pub ssl_mode: Option<String>,

    /// PEM root certificate to trust for TLS connections
    #[arg(long, env = "DBADMIN_SSL_ROOT_CERT")]
    pub ssl_root_cert: Option<PathBuf>,

    /// Log filter directive; RUST_LOG takes precedence
    #[arg(long, env = "DBADMIN_LOG")]
    pub log_filter: Option<String>,

    /// Directory for daily-rotated JSON log files
    #[arg(long, env = "DBADMIN_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Logging section of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub filter: String,
    pub json_dir: Option<PathBuf>,
    pub console: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info,dbadmin_server=debug".to_string(),
            json_dir: None,
            console: true,
        }
    }
}

/// Effective server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub database_url: Option<String>,
    pub listen: SocketAddr,
    pub schema: String,
    pub data_dir: Option<PathBuf>,
    pub ssl_mode: String,
    pub ssl_root_cert: Option<PathBuf>,
    pub log: LogSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            schema: "public".to_string(),
            data_dir: None,
            ssl_mode: TlsMode::Prefer.as_sslmode().to_string(),
            ssl_root_cert: None,
            log: LogSettings::default(),
        }
    }
}

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("dbadmin"))
}

pub fn default_config_file() -> Result<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

impl ServerConfig {
    /// Resolve the configuration for a command line.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(cli: &Cli) -> Result<Self> {
        let base = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => match default_config_file() {
                Ok(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        let config = base.with_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply flags and environment variables on top of file settings
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.database_url {
            self.database_url = Some(url.clone());
        }
        if let Some(listen) = cli.listen {
            self.listen = listen;
        }
        if let Some(schema) = &cli.schema {
            self.schema = schema.clone();
        }
        if let Some(dir) = &cli.data_dir {
            self.data_dir = Some(dir.clone());
        }
        if let Some(mode) = &cli.ssl_mode {
            self.ssl_mode = mode.clone();
        }
        if let Some(cert) = &cli.ssl_root_cert {
            self.ssl_root_cert = Some(cert.clone());
        }
        if let Some(filter) = &cli.log_filter {
            self.log.filter = filter.clone();
        }
        if let Some(dir) = &cli.log_dir {
            self.log.json_dir = Some(dir.clone());
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.database_url.as_deref().is_none_or(|url| url.trim().is_empty()) {
            bail!("No database connection string configured (set DBADMIN_DATABASE_URL or database_url)");
        }
        if self.schema.trim().is_empty() {
            bail!("Schema name must not be empty");
        }
        self.tls_settings()?;
        Ok(())
    }

    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("No database connection string configured")
    }

    pub fn tls_settings(&self) -> Result<TlsSettings> {
        let mode = self
            .ssl_mode
            .parse::<TlsMode>()
            .with_context(|| format!("Invalid ssl_mode: {}", self.ssl_mode))?;
        Ok(TlsSettings {
            mode,
            ca_cert: self.ssl_root_cert.clone(),
        })
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            default_filter: self.log.filter.clone(),
            json_log_dir: self.log.json_dir.clone(),
            enable_console_logs: self.log.console,
        }
    }
}
