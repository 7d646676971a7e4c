//! dbadmin HTTP server
//!
//! Wires the [`dbadmin_services::DataService`] facade to JSON routes, plus the
//! configuration and logging setup used by the `dbadmin` binary.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;

pub use config::{Cli, ServerConfig};
pub use error::ApiError;
pub use routes::router;
