//! Error types for rule-set resolution
//!
//! Only [`ResolveError`] aborts a resolution. Everything else that can go wrong
//! while merging is reported as a [`Diagnostic`](crate::Diagnostic) instead.

use crate::document::DocumentId;
use thiserror::Error;

/// Fatal resolution errors
///
/// These short-circuit the pipeline; no partial `EffectiveConfig` is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// A document is reachable from itself through `extends`
    #[error("Circular extends chain: {}", format_path(.path))]
    CycleDetected { path: Vec<DocumentId> },

    /// An `extends` reference could not be mapped to a loadable document
    #[error(
        "Unresolved reference '{reference}'{}{}",
        format_referrer(.referrer),
        format_reason(.reason)
    )]
    UnresolvedReference {
        reference: String,
        referrer: Option<DocumentId>,
        reason: Option<String>,
    },
}

/// Error kind enumeration for categorizing resolution failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Cycle,
    Unresolved,
}

impl ResolveError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::CycleDetected { .. } => ErrorKind::Cycle,
            ResolveError::UnresolvedReference { .. } => ErrorKind::Unresolved,
        }
    }

    /// Create a cycle error from the identity path that closes the loop
    pub fn cycle(path: Vec<DocumentId>) -> Self {
        Self::CycleDetected { path }
    }

    /// Create an unresolved reference error
    pub fn unresolved(reference: impl Into<String>, referrer: Option<&DocumentId>) -> Self {
        Self::UnresolvedReference {
            reference: reference.into(),
            referrer: referrer.cloned(),
            reason: None,
        }
    }

    /// Attach the underlying cause to an unresolved reference error
    pub fn with_reason(self, reason: impl Into<String>) -> Self {
        match self {
            Self::UnresolvedReference {
                reference,
                referrer,
                ..
            } => Self::UnresolvedReference {
                reference,
                referrer,
                reason: Some(reason.into()),
            },
            other => other,
        }
    }
}

fn format_path(path: &[DocumentId]) -> String {
    path.iter()
        .map(DocumentId::as_str)
        .collect::<Vec<_>>()
        .join(" → ")
}

fn format_referrer(referrer: &Option<DocumentId>) -> String {
    match referrer {
        Some(id) => format!(" extended by '{id}'"),
        None => String::new(),
    }
}

fn format_reason(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(": {reason}"),
        None => String::new(),
    }
}

/// Errors raised by a [`DocumentLoader`](crate::DocumentLoader)
///
/// `Clone` so a shared cache can hand the same failure to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Document not found: {id}")]
    NotFound { id: DocumentId },

    #[error("Failed to load '{id}': {message}")]
    Failed { id: DocumentId, message: String },
}

impl LoadError {
    pub fn not_found(id: &DocumentId) -> Self {
        Self::NotFound { id: id.clone() }
    }

    pub fn failed(id: &DocumentId, message: impl Into<String>) -> Self {
        Self::Failed {
            id: id.clone(),
            message: message.into(),
        }
    }
}

/// Malformed document value
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document '{id}' is not an object")]
    NotAnObject { id: DocumentId },

    #[error("Invalid document '{id}': {source}")]
    Invalid {
        id: DocumentId,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolver configuration parsing errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Rule schema registration errors
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid option schema for rule '{rule}': {message}")]
    InvalidSchema { rule: String, message: String },
}
