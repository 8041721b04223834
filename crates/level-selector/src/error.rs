//! Unified crate-level error types.
//!
//! This module provides a single [`SelectorError`] type used across the crate and a
//! convenient [`SelectorResult`] alias.
//!
//! None of the lookup or lifecycle categories are fatal: notification handlers
//! absorb them (falling back to placeholders or skipping the step) and never
//! surface them to the host. Only configuration parsing and explicit
//! validation hand errors back to the caller.

use crate::model::{LevelId, LevelRef};

/// Result type used by this crate.
pub type SelectorResult<T> = Result<T, SelectorError>;

/// Unified error type for the `level-selector` crate.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    /// Requested id or name is not part of the current level set.
    #[error("level not found: {0}")]
    LookupMiss(String),

    /// A playback source that is no longer bound was referenced.
    ///
    /// Unbinding never returns it: stale notifications are dropped by the
    /// delivery filter. Hosts use it to report such sources themselves.
    #[error("playback source is no longer bound")]
    StaleSource,

    /// A selection was made before any level set arrived.
    ///
    /// The selection is kept and honored once levels become available.
    #[error("level selected before any levels were available")]
    PrematureSelect,

    /// A level used the id reserved for automatic selection.
    #[error("level id {0} is reserved for automatic selection")]
    ReservedLevelId(LevelId),

    /// Two levels in the same set share an id.
    #[error("duplicate level id {0}")]
    DuplicateLevelId(LevelId),

    /// Configuration was structurally valid JSON but not a usable options bag.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Configuration could not be parsed.
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Extra context around a lower-level error.
    #[error("{context}: {source}")]
    Context {
        /// What we were doing when the error occurred.
        context: &'static str,
        /// The underlying error.
        #[source]
        source: Box<SelectorError>,
    },
}

impl SelectorError {
    /// Builds a [`SelectorError::LookupMiss`] for the given reference.
    pub fn lookup_miss(reference: LevelRef<'_>) -> Self {
        SelectorError::LookupMiss(reference.to_string())
    }

    /// Attach static context to an existing error.
    pub fn with_context(self, context: &'static str) -> Self {
        SelectorError::Context {
            context,
            source: Box::new(self),
        }
    }

    /// Whether the error should stop the caller.
    ///
    /// Lookup misses, stale sources and premature selections are part of
    /// normal operation and are resolved locally.
    pub fn is_fatal(&self) -> bool {
        match self {
            SelectorError::LookupMiss(_)
            | SelectorError::StaleSource
            | SelectorError::PrematureSelect => false,
            SelectorError::Context { source, .. } => source.is_fatal(),
            _ => true,
        }
    }
}
