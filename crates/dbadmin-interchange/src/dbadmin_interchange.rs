//! dbadmin Interchange - CSV transfer
//!
//! Moves table data between the database and CSV files in the server's data
//! directory, through the server-side `export_table`/`import_table` routines
//! or by rendering in-memory results directly.

mod csv_format;
mod csv_transfer;

pub use csv_format::render_csv;
pub use csv_transfer::{CsvTransfer, CsvTransferError};
