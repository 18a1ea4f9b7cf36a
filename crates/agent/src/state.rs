//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::abilities::{AbilityCatalog, AbilityDispatcher, AuthorizationGate, SchemaExporter};
use crate::config::AgentConfig;

/// Application state shared across all handlers.
///
/// Cheap to clone: all fields live behind one `Arc`. The catalog and gate are
/// constructed once at startup and handed by reference to every consumer, so
/// tests can build isolated instances per case.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AgentConfig,
    pool: SqlitePool,
    catalog: AbilityCatalog,
    gate: AuthorizationGate,
}

impl AppState {
    /// Assemble the shared state.
    #[must_use]
    pub fn new(
        config: AgentConfig,
        pool: SqlitePool,
        catalog: AbilityCatalog,
        gate: AuthorizationGate,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                gate,
            }),
        }
    }

    /// Agent configuration.
    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.inner.config
    }

    /// Audit store connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// The shared ability catalog.
    #[must_use]
    pub fn catalog(&self) -> &AbilityCatalog {
        &self.inner.catalog
    }

    /// The shared authorization gate.
    #[must_use]
    pub fn gate(&self) -> &AuthorizationGate {
        &self.inner.gate
    }

    /// Dispatcher over the shared catalog, gate, and audit store.
    #[must_use]
    pub fn dispatcher(&self) -> AbilityDispatcher<'_> {
        AbilityDispatcher::new(self.catalog(), self.gate(), self.pool())
    }

    /// Schema exporter over the shared catalog and gate.
    #[must_use]
    pub fn exporter(&self) -> SchemaExporter<'_> {
        SchemaExporter::new(self.catalog(), self.gate())
    }
}
