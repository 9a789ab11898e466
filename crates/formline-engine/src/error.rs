use formline_spec::{FieldError, SchemaIntegrityError};
use thiserror::Error;

use crate::ports::{LoadError, TransportError};

/// Engine-level failures. Validation problems stay field-local; only
/// structurally broken documents or transport faults surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Integrity(#[from] SchemaIntegrityError),
    /// Blocked next/submit; carries the per-field messages plus the single
    /// batch notice.
    #[error("{notice}")]
    NavigationRejected {
        notice: &'static str,
        errors: Vec<FieldError>,
    },
    #[error("already at the last page; submit to finish")]
    AtLastPage,
    #[error("submit is only available from the final page")]
    NotAtLastPage,
    #[error("the form has already been submitted")]
    Completed,
    #[error("unknown field id '{0}'")]
    UnknownField(String),
    #[error("field '{0}' does not accept answers")]
    NotAnswerable(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
