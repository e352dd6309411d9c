use std::fmt;
use thiserror::Error;

/// One recognized spoken phrase, lower-cased and trimmed.
///
/// The empty utterance means "nothing recognized" and is never classified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Utterance(String);

impl Utterance {
    /// Normalize raw recognizer output into an utterance
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    /// The "nothing recognized" utterance
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Utterance {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Why an utterance source produced no text
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFailure {
    /// Audio was captured but nothing intelligible was in it
    #[error("speech was not recognized")]
    Unrecognized,

    /// The recognizer or the input device is not available
    #[error("speech service is unavailable")]
    ServiceUnavailable,
}

impl CaptureFailure {
    /// What the assistant says when a capture fails this way
    pub fn spoken_notice(&self) -> &'static str {
        match self {
            CaptureFailure::Unrecognized => "Sorry, I couldn't catch that.",
            CaptureFailure::ServiceUnavailable => "Speech service is down.",
        }
    }
}
