//! Application state management
//!
//! The UI thread owns the transcript. Session workers never touch it; they
//! post [`Message`]s to the display queue, which is drained once per frame.

use crate::assistant::SessionTrigger;
use crate::integration::{MedibotConfig, SessionLauncher};
use crate::messages::{Message, Transcript};
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, warn};

/// First transcript line, shown before any session has run
pub const WELCOME_TEXT: &str =
    "Hello! I am your personal health assistant. Click 'Start Assistant' when you are ready to talk.";

/// Central application state
pub struct AppState {
    /// Conversation shown in the window
    pub transcript: Transcript,

    /// Current text input (text-only mode)
    pub input_text: String,

    /// Shared with session workers; enabled while no session runs
    pub trigger: SessionTrigger,

    launcher: SessionLauncher,

    display_tx: Sender<Message>,

    display_rx: Receiver<Message>,

    /// Feeds the typed listener when audio input is off
    typed_tx: Option<Sender<String>>,
}

impl AppState {
    pub fn new(config: MedibotConfig) -> Self {
        let (display_tx, display_rx) = unbounded();
        let mut launcher = SessionLauncher::new(config, display_tx.clone());

        let typed_tx = if launcher.is_text_only() {
            let (tx, rx) = unbounded();
            launcher = launcher.with_typed_input(rx);
            Some(tx)
        } else {
            None
        };

        let mut transcript = Transcript::new();
        transcript.push(Message::assistant(WELCOME_TEXT));

        Self {
            transcript,
            input_text: String::new(),
            trigger: SessionTrigger::new(),
            launcher,
            display_tx,
            display_rx,
            typed_tx,
        }
    }

    /// Queue a line for display as if a session had posted it
    pub fn display_sender(&self) -> Sender<Message> {
        self.display_tx.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.trigger.is_enabled()
    }

    /// Whether commands are typed into the window
    pub fn is_text_only(&self) -> bool {
        self.typed_tx.is_some()
    }

    /// Move queued display messages into the transcript, in order
    pub fn poll_events(&mut self) -> usize {
        let mut received = 0;
        while let Ok(message) = self.display_rx.try_recv() {
            self.transcript.push(message);
            received += 1;
        }
        received
    }

    /// Start a session unless one is already running
    pub fn start_session(&mut self) {
        if self.is_running() {
            debug!("Start ignored, a session is already running");
            return;
        }

        // Lines typed while idle belong to no session
        self.input_text.clear();
        let stale = self.launcher.discard_typed_input();
        if stale > 0 {
            debug!("Discarded {} typed line(s) from a previous session", stale);
        }

        if let Err(e) = self.launcher.launch(&self.trigger) {
            warn!("Failed to start session: {}", e);
            self.transcript.push(Message::system(e.user_message()));
        }
    }

    /// Hand the typed line to the running session
    pub fn submit_typed(&mut self) {
        let text = self.input_text.trim().to_string();
        if text.is_empty() || !self.is_running() {
            return;
        }

        if let Some(tx) = &self.typed_tx {
            if tx.send(text).is_err() {
                warn!("Typed listener is gone");
            }
        }
        self.input_text.clear();
    }
}
