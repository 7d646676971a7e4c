//! Connection trait

use crate::{Result, SchemaIntrospection, TabularResult};
use async_trait::async_trait;

/// A handle to the database that runs SQL text.
///
/// Implementations acquire whatever session they need for the duration of a
/// single call and release it on every exit path, so a handle can be shared
/// freely (`Arc<dyn Connection>`) across request handlers.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "postgresql")
    fn driver_name(&self) -> &str;

    /// Run `sql` as one batch and map its first result set into a [`TabularResult`].
    ///
    /// A batch whose statements describe no columns yields
    /// [`TabularResult::empty`]. Any execution failure is returned as
    /// [`AdminError::InvalidQuery`](crate::AdminError::InvalidQuery).
    async fn query(&self, sql: &str) -> Result<TabularResult>;

    /// Verify that a session can be opened and a trivial statement run
    async fn ping(&self) -> Result<()> {
        tracing::debug!(driver = %self.driver_name(), "pinging database");
        self.query("SELECT 1").await.map(|_| ())
    }

    /// Get schema introspection interface if supported
    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        None
    }
}
