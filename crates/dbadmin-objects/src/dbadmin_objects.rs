//! dbadmin Objects - SQL statement construction
//!
//! Pure text builders that turn runtime column/value lists into statements:
//! - Row writes (`INSERT`, `UPDATE`, `DELETE`)
//! - Stored routine invocation (`SELECT * FROM f(..)`, `CALL p(..)`, cursor batches)
//!
//! Values are embedded as single-quoted literals exactly as given and
//! identifiers are emitted unescaped. These builders assume a trusted schema
//! and trusted operators; nothing here sanitizes input.

pub mod dml;
pub mod routine;

pub use dml::*;
pub use routine::*;
