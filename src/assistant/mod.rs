//! Command-interpretation core
//!
//! Listens for one utterance at a time, classifies it into an [`Intent`],
//! runs the matching action through the [`Dispatcher`] and renders the
//! response until an exit intent ends the [`Session`].

pub mod dispatch;
pub mod intent;
pub mod session;
pub mod utterance;

pub use dispatch::{DispatchResult, Dispatcher};
pub use intent::{classify, Intent, Site};
pub use session::{
    ResponseRenderer, Session, SessionPhase, SessionState, SessionTrigger, UtteranceSource,
};
pub use utterance::{CaptureFailure, Utterance};

/// Name the assistant speaks under in the transcript
pub const ASSISTANT_NAME: &str = "Medibot";
