//! PostgreSQL driver implementation

mod connection;
mod schema;
mod tls;

pub use connection::PostgresConnection;
pub use tls::{TlsError, TlsMode, TlsSettings, build_tls_connector};
