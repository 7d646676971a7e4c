//! dbadmin Core - shared abstractions for the database administration service
//!
//! This crate provides the fundamental traits and types that all other
//! dbadmin crates depend on. It defines:
//!
//! - `Connection` - Trait for running a SQL batch against the database
//! - `SchemaIntrospection` - Trait for catalog lookups (primary keys, routines)
//! - `TabularResult` - Uniform row/column shape every query result is mapped into
//! - `Record` - A single row (or routine parameter list) as aligned keys and values

mod connection;
mod error;
mod schema;
mod types;

pub use connection::*;
pub use error::*;
pub use schema::*;
pub use types::*;
