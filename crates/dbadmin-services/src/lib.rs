//! dbadmin Services Layer
//!
//! The facade the request layer talks to. Each operation translates a request
//! into one or more catalog lookups plus a generated statement, runs them on
//! the shared connection, and reports the outcome as a [`ServiceResult`].
//!
//! # Architecture
//!
//! ```text
//! Request layer (dbadmin-server)
//!     ↓
//! Service layer (dbadmin-services) ← This crate
//!     ↓
//! Statement builders (dbadmin-objects), CSV transfer (dbadmin-interchange)
//!     ↓
//! Connection + schema introspection (dbadmin-core, dbadmin-driver-postgres)
//! ```

mod data_service;
mod error;
mod outcome;

pub use data_service::DataService;
pub use error::{ServiceError, ServiceResult};
pub use outcome::QueryOutcome;
