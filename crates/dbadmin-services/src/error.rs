use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level failures.
///
/// Each variant carries the name of the object involved (table, routine, or
/// a label for ad-hoc input), never the driver's error text; that is logged
/// where the failure happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Invalid query against {0}")]
    InvalidQuery(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Routine {0} is neither a function nor a procedure")]
    UnsupportedRoutineKind(String),

    #[error("Export of {0} failed")]
    ExportFailed(String),

    #[error("Import into {0} failed")]
    ImportFailed(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Schema introspection not supported for this database")]
    SchemaNotSupported,
}

impl ServiceError {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InvalidQuery(_) => "invalid_query",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::UnsupportedRoutineKind(_) => "unsupported_routine_kind",
            ServiceError::ExportFailed(_) => "export_failed",
            ServiceError::ImportFailed(_) => "import_failed",
            ServiceError::EmptyInput(_) => "empty_input",
            ServiceError::InvalidName(_) => "invalid_name",
            ServiceError::SchemaNotSupported => "schema_not_supported",
        }
    }
}
