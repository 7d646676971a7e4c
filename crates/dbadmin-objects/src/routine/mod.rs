//! Stored routine invocation
//!
//! Chooses between `SELECT`, `CALL` and the cursor-fetching batch based on the
//! routine's catalog kind, and renders named arguments.

mod invocation;


pub use invocation::*;
