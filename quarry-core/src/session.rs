use crate::{Dialect, FromRow, MetaRegistry, Selector, SqlWriter};
use std::{fmt, sync::Arc};

/// Build configuration shared by statements: dialect printer and metadata registry.
///
/// Cloning is cheap, clones share the same writer and registry.
#[derive(Clone)]
pub struct Session {
    writer: Arc<dyn SqlWriter>,
    registry: Arc<MetaRegistry>,
}

impl Session {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_writer(dialect)
    }
    pub fn with_writer(writer: impl SqlWriter + 'static) -> Self {
        Self {
            writer: Arc::new(writer),
            registry: MetaRegistry::global(),
        }
    }
    /// Replace the process-wide registry with a private one.
    pub fn with_registry(mut self, registry: Arc<MetaRegistry>) -> Self {
        self.registry = registry;
        self
    }
    pub fn writer(&self) -> &dyn SqlWriter {
        self.writer.as_dyn()
    }
    pub fn registry(&self) -> &Arc<MetaRegistry> {
        &self.registry
    }
    pub fn select<T: FromRow>(&self) -> Selector<T> {
        Selector::new(self)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
