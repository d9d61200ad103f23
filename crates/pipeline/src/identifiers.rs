//! Newtype identifiers.

use uuid::Uuid;

/// Identifies a single pipeline run (one call to [`crate::execute`]).
///
/// Generated fresh for every run and recorded on its tracing span, so all
/// log events from one call can be correlated even when several calls are in
/// flight at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(Uuid);

impl CallId {
    /// Generates a new random call identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
