use dbadmin_core::TabularResult;

/// Successful result of running a statement whose output shape is unknown
/// up front (console input, routine calls)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The statement described at least one column
    Rows(TabularResult),
    /// The statement ran but produced no result set (`CALL`, `DO`, DDL)
    Completed,
}

impl QueryOutcome {
    pub fn from_result(result: TabularResult) -> Self {
        if result.has_columns() {
            QueryOutcome::Rows(result)
        } else {
            QueryOutcome::Completed
        }
    }

    /// Label the result set, if there is one
    pub fn with_name(self, name: impl Into<String>) -> Self {
        match self {
            QueryOutcome::Rows(result) => QueryOutcome::Rows(result.with_name(name)),
            QueryOutcome::Completed => QueryOutcome::Completed,
        }
    }

    pub fn rows(&self) -> Option<&TabularResult> {
        match self {
            QueryOutcome::Rows(result) => Some(result),
            QueryOutcome::Completed => None,
        }
    }
}
