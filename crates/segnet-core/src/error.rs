// ── Core error types ──
//
// User-facing errors from segnet-core. Store implementations report
// their own `StoreError`; the `From<StoreError>` impl folds those into
// the two conditions callers act on: the topology is missing, or the
// store could not serve the request.

use thiserror::Error;

use crate::store::StoreError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Topology not found: {identifier}")]
    TopologyNotFound { identifier: String },

    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Store errors ─────────────────────────────────────────────────
    #[error("Topology store unavailable: {reason}")]
    StoreUnavailable { reason: String },
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TopologyNotFound { id } => CoreError::TopologyNotFound {
                identifier: id.to_string(),
            },
            StoreError::UnknownEntity { entity_type, id } => CoreError::NotFound {
                entity_type: entity_type.into(),
                identifier: id.to_string(),
            },
            StoreError::DuplicateId { entity_type, id } => CoreError::InvalidInput {
                field: format!("{entity_type}.id"),
                reason: format!("id {id} is already in use"),
            },
            StoreError::Unavailable { reason } => CoreError::StoreUnavailable { reason },
        }
    }
}
