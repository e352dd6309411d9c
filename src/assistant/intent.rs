//! Intent classification
//!
//! Matching is ordered substring containment: the first rule that matches
//! wins, so "hello, what time is it" is a greeting and never a time query.

use super::utterance::Utterance;
use std::fmt;

const WIKIPEDIA: &str = "wikipedia";

/// A website the assistant knows how to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    YouTube,
    Google,
}

impl Site {
    pub fn url(&self) -> &'static str {
        match self {
            Site::YouTube => "https://youtube.com",
            Site::Google => "https://google.com",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Site::YouTube => "YouTube",
            Site::Google => "Google",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Command category derived from one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    QueryTime,
    /// Look up a two-sentence summary for the query
    WikipediaLookup(String),
    TellJoke,
    OpenSite(Site),
    /// "open" without a known site; nothing is done or said
    OpenUnknownSite,
    /// Hibernate the computer and end the session
    Shutdown,
    Exit,
    Unknown,
}

impl Intent {
    /// Progress line spoken before a slow action runs
    pub fn announcement(&self) -> Option<&'static str> {
        match self {
            Intent::WikipediaLookup(_) => Some("Searching Wikipedia..."),
            _ => None,
        }
    }
}

/// Map an utterance onto exactly one intent. Never fails.
pub fn classify(utterance: &Utterance) -> Intent {
    let has = |needle: &str| utterance.contains(needle);

    if has("hello") || has("hi") {
        Intent::Greeting
    } else if has("time") {
        Intent::QueryTime
    } else if has(WIKIPEDIA) {
        Intent::WikipediaLookup(lookup_query(utterance.as_str()))
    } else if has("joke") {
        Intent::TellJoke
    } else if has("open") {
        if has("youtube") {
            Intent::OpenSite(Site::YouTube)
        } else if has("google") {
            Intent::OpenSite(Site::Google)
        } else {
            Intent::OpenUnknownSite
        }
    } else if has("close") {
        Intent::Shutdown
    } else if has("bye") || has("exit") {
        Intent::Exit
    } else {
        Intent::Unknown
    }
}

/// Strip "wikipedia" out of the utterance, preferring the words after it
fn lookup_query(text: &str) -> String {
    let (before, after) = text.split_once(WIKIPEDIA).unwrap_or((text, ""));
    let after = after.replace(WIKIPEDIA, " ");
    let query = if after.trim().is_empty() {
        before
    } else {
        after.as_str()
    };
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}
