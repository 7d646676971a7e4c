//! Row write statements
//!
//! Builds `INSERT`, `UPDATE` and `DELETE` statements from a [`dbadmin_core::Record`].

mod builder;


pub use builder::*;
