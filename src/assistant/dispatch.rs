//! Action dispatch
//!
//! Runs the side effect tied to an intent and decides whether the session
//! keeps going. Every call is independent of the previous one.

use super::intent::{Intent, Site};
use crate::services::{BrowserLauncher, Clock, JokeService, LookupService, PowerControl};
use tracing::{debug, info, warn};

pub const GREETING_RESPONSE: &str = "Hi there!";
pub const LOOKUP_FALLBACK: &str = "Couldn't find that on Wikipedia.";
pub const HIBERNATE_RESPONSE: &str = "Hibernating the computer.";
pub const FAREWELL_RESPONSE: &str = "Goodbye! Have a healthy day.";
pub const UNKNOWN_RESPONSE: &str = "I don't know that command yet.";

/// Default number of sentences requested from the lookup service
pub const SUMMARY_SENTENCES: usize = 2;

/// Outcome of dispatching one intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    /// Text to speak and show, if any
    pub response: Option<String>,

    /// Non-fatal failure to report on the transcript
    pub notice: Option<String>,

    /// Whether the session keeps listening
    pub continue_session: bool,
}

impl DispatchResult {
    /// Respond and keep listening
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            notice: None,
            continue_session: true,
        }
    }

    /// Respond and end the session
    pub fn finish(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            notice: None,
            continue_session: false,
        }
    }

    /// Say nothing and keep listening
    pub fn silent() -> Self {
        Self {
            response: None,
            notice: None,
            continue_session: true,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}

/// Executes intents against the configured collaborators
pub struct Dispatcher {
    lookup: Box<dyn LookupService>,
    jokes: Box<dyn JokeService>,
    browser: Box<dyn BrowserLauncher>,
    power: Box<dyn PowerControl>,
    clock: Box<dyn Clock>,
    summary_sentences: usize,
}

impl Dispatcher {
    pub fn new(
        lookup: Box<dyn LookupService>,
        jokes: Box<dyn JokeService>,
        browser: Box<dyn BrowserLauncher>,
        power: Box<dyn PowerControl>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            lookup,
            jokes,
            browser,
            power,
            clock,
            summary_sentences: SUMMARY_SENTENCES,
        }
    }

    /// Set how many sentences a lookup summary may have
    pub fn with_summary_sentences(mut self, sentences: usize) -> Self {
        self.summary_sentences = sentences.max(1);
        self
    }

    pub fn dispatch(&self, intent: &Intent) -> DispatchResult {
        debug!("Dispatching {:?}", intent);

        match intent {
            Intent::Greeting => DispatchResult::reply(GREETING_RESPONSE),
            Intent::QueryTime => {
                let now = self.clock.now();
                DispatchResult::reply(format!("The time is {}", now.format("%H:%M")))
            }
            Intent::WikipediaLookup(query) => self.lookup(query),
            Intent::TellJoke => DispatchResult::reply(self.jokes.joke()),
            Intent::OpenSite(site) => self.open_site(*site),
            Intent::OpenUnknownSite => DispatchResult::silent(),
            Intent::Shutdown => self.hibernate(),
            Intent::Exit => DispatchResult::finish(FAREWELL_RESPONSE),
            Intent::Unknown => DispatchResult::reply(UNKNOWN_RESPONSE),
        }
    }

    fn lookup(&self, query: &str) -> DispatchResult {
        match self.lookup.summarize(query, self.summary_sentences) {
            Ok(summary) => DispatchResult::reply(summary),
            Err(e) => {
                warn!("Lookup for {:?} failed: {}", query, e);
                DispatchResult::reply(LOOKUP_FALLBACK)
            }
        }
    }

    fn open_site(&self, site: Site) -> DispatchResult {
        match self.browser.open(site.url()) {
            Ok(()) => {
                info!("Opened {}", site.url());
                DispatchResult::reply(format!("Opening {}", site))
            }
            Err(e) => {
                warn!("Failed to open {}: {}", site.url(), e);
                DispatchResult::silent().with_notice(format!("Couldn't open {}: {}", site, e))
            }
        }
    }

    fn hibernate(&self) -> DispatchResult {
        let result = DispatchResult::finish(HIBERNATE_RESPONSE);
        match self.power.hibernate() {
            Ok(()) => result,
            Err(e) => {
                warn!("Hibernate request failed: {}", e);
                result.with_notice(format!("Couldn't hibernate the computer: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LookupError;
    use crate::{MedibotError, Result};
    use chrono::NaiveTime;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct FixedLookup(Option<String>);

    impl LookupService for FixedLookup {
        fn summarize(&self, query: &str, max_sentences: usize) -> std::result::Result<String, LookupError> {
            assert_eq!(max_sentences, SUMMARY_SENTENCES);
            self.0
                .clone()
                .ok_or_else(|| LookupError::NotFound(query.to_string()))
        }
    }

    struct OneJoke;

    impl JokeService for OneJoke {
        fn joke(&self) -> String {
            "A joke.".to_string()
        }
    }

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl BrowserLauncher for Recorder {
        fn open(&self, url: &str) -> Result<()> {
            self.calls.lock().push(url.to_string());
            if self.fail {
                return Err(MedibotError::LaunchError("no opener".into()));
            }
            Ok(())
        }
    }

    impl PowerControl for Recorder {
        fn hibernate(&self) -> Result<()> {
            self.calls.lock().push("hibernate".to_string());
            if self.fail {
                return Err(MedibotError::LaunchError("not permitted".into()));
            }
            Ok(())
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> NaiveTime {
            NaiveTime::from_hms_opt(9, 5, 42).unwrap()
        }
    }

    fn dispatcher(summary: Option<&str>, recorder: &Recorder) -> Dispatcher {
        Dispatcher::new(
            Box::new(FixedLookup(summary.map(String::from))),
            Box::new(OneJoke),
            Box::new(recorder.clone()),
            Box::new(recorder.clone()),
            Box::new(FixedClock),
        )
    }

    #[test]
    fn test_only_exit_and_shutdown_end_the_session() {
        let recorder = Recorder::default();
        let dispatcher = dispatcher(Some("Summary."), &recorder);

        let intents = [
            Intent::Greeting,
            Intent::QueryTime,
            Intent::WikipediaLookup("rust".into()),
            Intent::TellJoke,
            Intent::OpenSite(Site::YouTube),
            Intent::OpenSite(Site::Google),
            Intent::OpenUnknownSite,
            Intent::Unknown,
        ];
        for intent in &intents {
            assert!(dispatcher.dispatch(intent).continue_session, "{:?}", intent);
        }

        assert!(!dispatcher.dispatch(&Intent::Exit).continue_session);
        assert!(!dispatcher.dispatch(&Intent::Shutdown).continue_session);
    }

    #[test]
    fn test_unknown_response() {
        let dispatcher = dispatcher(None, &Recorder::default());
        assert_eq!(
            dispatcher.dispatch(&Intent::Unknown),
            DispatchResult::reply("I don't know that command yet.")
        );
    }

    #[test]
    fn test_greeting_is_idempotent() {
        let dispatcher = dispatcher(None, &Recorder::default());
        let first = dispatcher.dispatch(&Intent::Greeting);
        for _ in 0..3 {
            assert_eq!(dispatcher.dispatch(&Intent::Greeting), first);
        }
        assert_eq!(first.response.as_deref(), Some("Hi there!"));
    }

    #[test]
    fn test_time_is_24_hour_hh_mm() {
        let dispatcher = dispatcher(None, &Recorder::default());
        let result = dispatcher.dispatch(&Intent::QueryTime);
        assert_eq!(result.response.as_deref(), Some("The time is 09:05"));
    }

    #[test]
    fn test_lookup_success_and_failure() {
        let recorder = Recorder::default();
        let found = dispatcher(Some("Einstein was a physicist."), &recorder);
        let result = found.dispatch(&Intent::WikipediaLookup("albert einstein".into()));
        assert_eq!(result.response.as_deref(), Some("Einstein was a physicist."));

        let missing = dispatcher(None, &recorder);
        let result = missing.dispatch(&Intent::WikipediaLookup("albert einstein".into()));
        assert_eq!(result, DispatchResult::reply("Couldn't find that on Wikipedia."));
    }

    #[test]
    fn test_open_site_calls_browser() {
        let recorder = Recorder::default();
        let dispatcher = dispatcher(None, &recorder);

        let result = dispatcher.dispatch(&Intent::OpenSite(Site::YouTube));
        assert_eq!(result, DispatchResult::reply("Opening YouTube"));

        let result = dispatcher.dispatch(&Intent::OpenSite(Site::Google));
        assert_eq!(result.response.as_deref(), Some("Opening Google"));

        assert_eq!(
            *recorder.calls.lock(),
            vec!["https://youtube.com".to_string(), "https://google.com".to_string()]
        );
    }

    #[test]
    fn test_browser_failure_is_a_notice() {
        let recorder = Recorder {
            fail: true,
            ..Default::default()
        };
        let dispatcher = dispatcher(None, &recorder);

        let result = dispatcher.dispatch(&Intent::OpenSite(Site::YouTube));
        assert!(result.continue_session);
        assert!(result.response.is_none());
        assert!(result.notice.unwrap().starts_with("Couldn't open YouTube"));
    }

    #[test]
    fn test_shutdown_hibernates() {
        let recorder = Recorder::default();
        let dispatcher = dispatcher(None, &recorder);

        let result = dispatcher.dispatch(&Intent::Shutdown);
        assert_eq!(result, DispatchResult::finish("Hibernating the computer."));
        assert_eq!(*recorder.calls.lock(), vec!["hibernate".to_string()]);
    }

    #[test]
    fn test_hibernate_failure_still_ends_session() {
        let recorder = Recorder {
            fail: true,
            ..Default::default()
        };
        let result = dispatcher(None, &recorder).dispatch(&Intent::Shutdown);
        assert!(!result.continue_session);
        assert!(result.notice.is_some());
    }

    #[test]
    fn test_open_unknown_site_is_silent() {
        let recorder = Recorder::default();
        let result = dispatcher(None, &recorder).dispatch(&Intent::OpenUnknownSite);
        assert_eq!(result, DispatchResult::silent());
        assert!(recorder.calls.lock().is_empty());
    }

    #[test]
    fn test_joke() {
        let result = dispatcher(None, &Recorder::default()).dispatch(&Intent::TellJoke);
        assert_eq!(result.response.as_deref(), Some("A joke."));
    }
}
