#![allow(missing_docs)]

pub mod authoring;
pub mod autosave;
pub mod error;
pub mod ports;
pub mod session;

pub use authoring::AuthoringSession;
pub use autosave::{AutosaveTimer, DEFAULT_QUIET_PERIOD};
pub use error::EngineError;
pub use ports::{InMemoryStore, LoadError, SubmissionSink, TemplateStore, TransportError};
pub use session::{REQUIRED_FIELDS_NOTICE, RespondentSession, SessionState};
