//! Session loop
//!
//! A session runs on its own worker thread: listen, classify, dispatch,
//! render, until an intent asks to stop. The [`SessionTrigger`] owns the
//! shared running flag and makes sure only one session runs at a time.

use super::dispatch::{DispatchResult, Dispatcher, UNKNOWN_RESPONSE};
use super::intent::classify;
use super::utterance::{CaptureFailure, Utterance};
use crate::{MedibotError, Result};
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

pub const OPENING_PROMPT: &str = "How can I help you today?";
pub const LISTENING_NOTICE: &str = "Listening...";

/// Produces one utterance per call, blocking until something is heard
pub trait UtteranceSource {
    fn capture(&mut self) -> std::result::Result<Utterance, CaptureFailure>;
}

/// Presents the conversation to the user
pub trait ResponseRenderer {
    /// Speak the text and add it to the transcript as the assistant
    fn say(&self, text: &str);

    /// Add an assistant line to the transcript without speaking it
    fn show(&self, text: &str);

    /// Add recognized user speech to the transcript
    fn heard(&self, text: &str);

    /// Add an error line to the transcript
    fn error(&self, text: &str);
}

/// Whether a session is currently running
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Running => write!(f, "Running"),
        }
    }
}

/// Lifecycle of a single session instance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    Running,
    /// Absorbing: a finished session is never restarted
    Terminated,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::NotStarted => write!(f, "NotStarted"),
            SessionPhase::Running => write!(f, "Running"),
            SessionPhase::Terminated => write!(f, "Terminated"),
        }
    }
}

/// One continuous run of the command loop
pub struct Session {
    source: Box<dyn UtteranceSource>,
    dispatcher: Dispatcher,
    renderer: Box<dyn ResponseRenderer>,
    phase: SessionPhase,
    turns: usize,
}

impl Session {
    pub fn new(
        source: Box<dyn UtteranceSource>,
        dispatcher: Dispatcher,
        renderer: Box<dyn ResponseRenderer>,
    ) -> Self {
        Self {
            source,
            dispatcher,
            renderer,
            phase: SessionPhase::NotStarted,
            turns: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Number of non-empty utterances handled so far
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Run the loop until an exit intent is dispatched
    pub fn run(&mut self) {
        if self.phase != SessionPhase::NotStarted {
            warn!("Session already {}, not running it again", self.phase);
            return;
        }

        self.phase = SessionPhase::Running;
        info!("Session started");
        self.renderer.say(OPENING_PROMPT);

        while self.phase == SessionPhase::Running {
            let utterance = self.listen();
            let result = self.handle(&utterance);
            if !result.continue_session {
                self.phase = SessionPhase::Terminated;
            }
        }

        info!("Session terminated after {} turns", self.turns);
    }

    /// Acquire one utterance, turning capture failures into spoken notices
    fn listen(&mut self) -> Utterance {
        self.renderer.show(LISTENING_NOTICE);

        match self.source.capture() {
            Ok(utterance) => {
                if !utterance.is_empty() {
                    self.renderer.heard(utterance.as_str());
                }
                utterance
            }
            Err(failure) => {
                debug!("Capture failed: {}", failure);
                self.renderer.say(failure.spoken_notice());
                Utterance::empty()
            }
        }
    }

    /// Classify, dispatch and render one utterance
    pub fn handle(&mut self, utterance: &Utterance) -> DispatchResult {
        if utterance.is_empty() {
            return DispatchResult::silent();
        }

        self.turns += 1;
        let intent = classify(utterance);
        debug!("Classified {:?} as {:?}", utterance.as_str(), intent);

        if let Some(announcement) = intent.announcement() {
            self.renderer.say(announcement);
        }

        let dispatcher = &self.dispatcher;
        let result = panic::catch_unwind(AssertUnwindSafe(|| dispatcher.dispatch(&intent)))
            .unwrap_or_else(|payload| {
                let reason = panic_reason(payload.as_ref());
                error!("Action for {:?} panicked: {}", intent, reason);
                DispatchResult::reply(UNKNOWN_RESPONSE)
                    .with_notice(format!("Action failed: {}", reason))
            });

        // A collaborator may hand back blank text; there is nothing to say
        if let Some(response) = result.response.as_deref().filter(|r| !r.trim().is_empty()) {
            self.renderer.say(response);
        }
        if let Some(notice) = &result.notice {
            self.renderer.error(notice);
        }

        result
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Start control shared with the UI
///
/// Enabled while no session is running. Starting spawns a fresh worker
/// thread; the trigger becomes enabled again only after that worker has
/// dropped its session and is about to exit.
#[derive(Clone, Debug, Default)]
pub struct SessionTrigger {
    state: Arc<RwLock<SessionState>>,
}

impl SessionTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    pub fn is_enabled(&self) -> bool {
        self.state() == SessionState::Idle
    }

    /// Build and run a session on a dedicated worker thread
    ///
    /// The session is constructed on the worker so collaborators holding
    /// thread-bound audio handles never cross threads.
    pub fn start<F>(&self, build: F) -> Result<JoinHandle<()>>
    where
        F: FnOnce() -> Result<Session> + Send + 'static,
    {
        {
            let mut state = self.state.write();
            if *state == SessionState::Running {
                return Err(MedibotError::SessionError(
                    "a session is already running".to_string(),
                ));
            }
            *state = SessionState::Running;
        }

        let guard = RunningGuard {
            state: Arc::clone(&self.state),
        };

        thread::Builder::new()
            .name("medibot-session".to_string())
            .spawn(move || {
                let _guard = guard;
                match build() {
                    Ok(mut session) => session.run(),
                    Err(e) => error!("Failed to start session: {}", e),
                }
            })
            .map_err(|e| MedibotError::SessionError(format!("Failed to spawn session worker: {}", e)))
    }
}

/// Flips the shared state back to idle however the worker exits
struct RunningGuard {
    state: Arc<RwLock<SessionState>>,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        *self.state.write() = SessionState::Idle;
        debug!("Session worker exited");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        BrowserLauncher, Clock, JokeService, LookupError, LookupService, PowerControl,
    };
    use chrono::NaiveTime;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    struct Script(VecDeque<std::result::Result<Utterance, CaptureFailure>>);

    impl UtteranceSource for Script {
        fn capture(&mut self) -> std::result::Result<Utterance, CaptureFailure> {
            self.0.pop_front().unwrap_or_else(|| Ok(Utterance::new("bye")))
        }
    }

    #[derive(Clone, Default)]
    struct Lines(Arc<Mutex<Vec<String>>>);

    impl ResponseRenderer for Lines {
        fn say(&self, text: &str) {
            self.0.lock().push(format!("say:{}", text));
        }
        fn show(&self, text: &str) {
            self.0.lock().push(format!("show:{}", text));
        }
        fn heard(&self, text: &str) {
            self.0.lock().push(format!("heard:{}", text));
        }
        fn error(&self, text: &str) {
            self.0.lock().push(format!("error:{}", text));
        }
    }

    struct Nothing;

    impl LookupService for Nothing {
        fn summarize(&self, _: &str, _: usize) -> std::result::Result<String, LookupError> {
            panic!("lookup exploded")
        }
    }
    impl JokeService for Nothing {
        fn joke(&self) -> String {
            String::new()
        }
    }
    impl BrowserLauncher for Nothing {
        fn open(&self, _: &str) -> Result<()> {
            Ok(())
        }
    }
    impl PowerControl for Nothing {
        fn hibernate(&self) -> Result<()> {
            Ok(())
        }
    }
    impl Clock for Nothing {
        fn now(&self) -> NaiveTime {
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        }
    }

    fn session(script: Vec<std::result::Result<Utterance, CaptureFailure>>, lines: &Lines) -> Session {
        let dispatcher = Dispatcher::new(
            Box::new(Nothing),
            Box::new(Nothing),
            Box::new(Nothing),
            Box::new(Nothing),
            Box::new(Nothing),
        );
        Session::new(
            Box::new(Script(script.into())),
            dispatcher,
            Box::new(lines.clone()),
        )
    }

    #[test]
    fn test_run_until_exit() {
        let lines = Lines::default();
        let mut session = session(vec![Ok("hello".into()), Ok("bye".into())], &lines);
        assert_eq!(session.phase(), SessionPhase::NotStarted);

        session.run();

        assert_eq!(session.phase(), SessionPhase::Terminated);
        assert_eq!(session.turns(), 2);
        assert_eq!(
            *lines.0.lock(),
            vec![
                "say:How can I help you today?",
                "show:Listening...",
                "heard:hello",
                "say:Hi there!",
                "show:Listening...",
                "heard:bye",
                "say:Goodbye! Have a healthy day.",
            ]
        );
    }

    #[test]
    fn test_terminated_session_does_not_rerun() {
        let lines = Lines::default();
        let mut session = session(vec![Ok("exit".into())], &lines);
        session.run();
        let rendered = lines.0.lock().len();

        session.run();
        assert_eq!(session.phase(), SessionPhase::Terminated);
        assert_eq!(lines.0.lock().len(), rendered);
    }

    #[test]
    fn test_capture_failures_are_spoken_and_loop_continues() {
        let lines = Lines::default();
        let mut session = session(
            vec![
                Err(CaptureFailure::Unrecognized),
                Err(CaptureFailure::ServiceUnavailable),
                Ok("bye".into()),
            ],
            &lines,
        );
        session.run();

        let rendered = lines.0.lock();
        assert!(rendered.contains(&"say:Sorry, I couldn't catch that.".to_string()));
        assert!(rendered.contains(&"say:Speech service is down.".to_string()));
        assert_eq!(session.turns(), 1);
    }

    #[test]
    fn test_empty_utterance_is_a_no_op() {
        let lines = Lines::default();
        let mut session = session(vec![], &lines);

        let result = session.handle(&Utterance::empty());

        assert_eq!(result, DispatchResult::silent());
        assert!(lines.0.lock().is_empty());
        assert_eq!(session.turns(), 0);
    }

    #[test]
    fn test_blank_response_is_not_rendered() {
        let lines = Lines::default();
        let mut session = session(vec![Ok("tell me a joke".into()), Ok("bye".into())], &lines);

        session.run();

        assert_eq!(
            *lines.0.lock(),
            vec![
                "say:How can I help you today?",
                "show:Listening...",
                "heard:tell me a joke",
                "show:Listening...",
                "heard:bye",
                "say:Goodbye! Have a healthy day.",
            ]
        );
    }

    #[test]
    fn test_panicking_action_is_contained() {
        let lines = Lines::default();
        let mut session = session(vec![], &lines);

        let result = session.handle(&Utterance::new("wikipedia rust"));

        assert!(result.continue_session);
        assert_eq!(result.response.as_deref(), Some(UNKNOWN_RESPONSE));
        let rendered = lines.0.lock();
        assert_eq!(rendered[0], "say:Searching Wikipedia...");
        assert!(rendered.last().unwrap().starts_with("error:Action failed: lookup exploded"));
    }

    #[test]
    fn test_trigger_single_running_session() {
        let trigger = SessionTrigger::new();
        assert!(trigger.is_enabled());

        let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);
        let handle = trigger
            .start(move || {
                let _ = release_rx.recv();
                Err(MedibotError::ConfigError("test session".into()))
            })
            .unwrap();

        assert_eq!(trigger.state(), SessionState::Running);
        assert!(!trigger.is_enabled());
        assert!(trigger.start(|| unreachable!()).is_err());

        release_tx.send(()).unwrap();
        handle.join().unwrap();
        assert!(trigger.is_enabled());
    }
}
