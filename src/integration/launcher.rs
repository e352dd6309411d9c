//! Builds sessions from configuration
//!
//! Wires the real collaborators into a [`Session`] and starts it through
//! the [`SessionTrigger`]. Everything audio-related is constructed on the
//! session worker so thread-bound device handles never leave it.

use super::config::MedibotConfig;
use super::renderer::AssistantRenderer;
use crate::assistant::{Dispatcher, Session, SessionTrigger, UtteranceSource};
use crate::messages::Message;
use crate::services::{JokeBook, SystemBrowser, SystemClock, SystemPower, WikipediaClient};
use crate::speech::{spawn_speech_worker, SpeechHandle, SpeechSynthesizer, TypedListener};
use crate::{MedibotError, Result};
use crossbeam_channel::{Receiver, Sender};
use std::thread::JoinHandle;
use tracing::{error, info};

/// Everything needed to build a session on demand
#[derive(Clone)]
pub struct SessionLauncher {
    config: MedibotConfig,
    display: Sender<Message>,
    typed: Option<Receiver<String>>,
}

impl SessionLauncher {
    pub fn new(config: MedibotConfig, display: Sender<Message>) -> Self {
        Self {
            config,
            display,
            typed: None,
        }
    }

    /// Lines typed into the window; used when audio input is off
    pub fn with_typed_input(mut self, lines: Receiver<String>) -> Self {
        self.typed = Some(lines);
        self
    }

    /// Drop typed lines that arrived while no session was listening
    pub fn discard_typed_input(&self) -> usize {
        self.typed
            .as_ref()
            .map_or(0, |lines| lines.try_iter().count())
    }

    pub fn config(&self) -> &MedibotConfig {
        &self.config
    }

    /// Whether commands are typed rather than spoken
    pub fn is_text_only(&self) -> bool {
        !self.config.enable_audio_input
    }

    /// Dispatcher backed by the system services
    pub fn dispatcher(&self) -> Result<Dispatcher> {
        let services = &self.config.services;
        let lookup = WikipediaClient::new(services.wikipedia.clone())?;

        Ok(Dispatcher::new(
            Box::new(lookup),
            Box::new(JokeBook::with_jokes(services.jokes.clone())),
            Box::new(SystemBrowser::new()),
            Box::new(SystemPower::with_command(services.hibernate_command.clone())),
            Box::new(SystemClock),
        )
        .with_summary_sentences(services.summary_sentences))
    }

    fn listener(&self) -> Result<Box<dyn UtteranceSource>> {
        if self.config.enable_audio_input {
            return self.microphone();
        }

        let lines = self.typed.clone().ok_or_else(|| {
            MedibotError::ConfigError("Text-only mode needs a typed input channel".to_string())
        })?;
        Ok(Box::new(TypedListener::new(lines)))
    }

    #[cfg(feature = "audio-io")]
    fn microphone(&self) -> Result<Box<dyn UtteranceSource>> {
        let listener = crate::speech::MicrophoneListener::new(self.config.stt.clone())?;
        Ok(Box::new(listener))
    }

    #[cfg(not(feature = "audio-io"))]
    fn microphone(&self) -> Result<Box<dyn UtteranceSource>> {
        Err(MedibotError::ConfigError(
            "Audio input needs the audio-io feature".to_string(),
        ))
    }

    /// Start a speech worker, or nothing when audio output is off
    fn speech(&self) -> Result<Option<SpeechHandle>> {
        if !self.config.enable_audio_output {
            return Ok(None);
        }

        let display = self.display.clone();
        let on_error = move |e: &MedibotError| {
            let _ = display.send(Message::system(format!("Error in speaking: {}", e)));
        };

        let build = self.synthesizer_builder();
        // The worker exits on its own once the session drops its handle
        let (handle, _worker): (SpeechHandle, JoinHandle<()>) = spawn_speech_worker(build, on_error)?;
        Ok(Some(handle))
    }

    #[cfg(feature = "audio-io")]
    fn synthesizer_builder(
        &self,
    ) -> impl FnOnce() -> Result<Box<dyn SpeechSynthesizer>> + Send + 'static {
        let tts = self.config.tts.clone();
        move || {
            let speaker = crate::speech::VitsSpeaker::new(tts)?;
            Ok(Box::new(speaker) as Box<dyn SpeechSynthesizer>)
        }
    }

    #[cfg(not(feature = "audio-io"))]
    fn synthesizer_builder(
        &self,
    ) -> impl FnOnce() -> Result<Box<dyn SpeechSynthesizer>> + Send + 'static {
        || {
            Err(MedibotError::ConfigError(
                "Audio output needs the audio-io feature".to_string(),
            ))
        }
    }

    /// Build a complete session
    pub fn build(&self) -> Result<Session> {
        let source = self.listener()?;
        let dispatcher = self.dispatcher()?;
        let speech = self.speech()?;
        let renderer = AssistantRenderer::new(self.display.clone(), speech);

        info!(
            "Session built (audio input: {}, audio output: {})",
            self.config.enable_audio_input, self.config.enable_audio_output
        );
        Ok(Session::new(source, dispatcher, Box::new(renderer)))
    }

    /// Start a session on the trigger's worker
    ///
    /// A session that fails to build is reported on the transcript and the
    /// trigger becomes enabled again.
    pub fn launch(&self, trigger: &SessionTrigger) -> Result<JoinHandle<()>> {
        let launcher = self.clone();
        trigger.start(move || {
            launcher.build().map_err(|e| {
                error!("Session could not be built: {}", e);
                let _ = launcher.display.send(Message::system(e.user_message()));
                e
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Sender as Speaker;

    fn text_only() -> MedibotConfig {
        MedibotConfig::default()
            .without_audio_input()
            .without_audio_output()
    }

    #[test]
    fn test_text_only_requires_typed_input() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let launcher = SessionLauncher::new(text_only(), tx);
        assert!(launcher.is_text_only());
        assert!(matches!(launcher.build(), Err(MedibotError::ConfigError(_))));
    }

    #[test]
    fn test_typed_session_runs_to_exit() {
        let (display_tx, display_rx) = crossbeam_channel::unbounded();
        let (typed_tx, typed_rx) = crossbeam_channel::unbounded();
        let launcher = SessionLauncher::new(text_only(), display_tx).with_typed_input(typed_rx);
        let trigger = SessionTrigger::new();

        typed_tx.send("hello".to_string()).unwrap();
        typed_tx.send("bye".to_string()).unwrap();
        let worker = launcher.launch(&trigger).unwrap();
        worker.join().unwrap();

        assert!(trigger.is_enabled());
        let lines: Vec<String> = display_rx.try_iter().map(|m| m.to_string()).collect();
        assert_eq!(lines.first().map(String::as_str), Some("Medibot: How can I help you today?"));
        assert!(lines.contains(&"You: hello".to_string()));
        assert!(lines.contains(&"Medibot: Hi there!".to_string()));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Medibot: Goodbye! Have a healthy day.")
        );
    }

    #[test]
    fn test_leftover_lines_are_discarded() {
        let (display_tx, display_rx) = crossbeam_channel::unbounded();
        let (typed_tx, typed_rx) = crossbeam_channel::unbounded();
        let launcher = SessionLauncher::new(text_only(), display_tx).with_typed_input(typed_rx);
        let trigger = SessionTrigger::new();

        typed_tx.send("tell me a joke".to_string()).unwrap();
        assert_eq!(launcher.discard_typed_input(), 1);
        assert_eq!(launcher.discard_typed_input(), 0);

        typed_tx.send("bye".to_string()).unwrap();
        launcher.launch(&trigger).unwrap().join().unwrap();

        let lines: Vec<String> = display_rx.try_iter().map(|m| m.to_string()).collect();
        assert!(!lines.contains(&"You: tell me a joke".to_string()));
        assert!(lines.contains(&"You: bye".to_string()));
    }

    #[test]
    fn test_discard_without_typed_input() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        assert_eq!(SessionLauncher::new(text_only(), tx).discard_typed_input(), 0);
    }

    #[test]
    fn test_build_failure_is_reported() {
        let (display_tx, display_rx) = crossbeam_channel::unbounded();
        let launcher = SessionLauncher::new(text_only(), display_tx);
        let trigger = SessionTrigger::new();

        launcher.launch(&trigger).unwrap().join().unwrap();

        assert!(trigger.is_enabled());
        let message = display_rx.try_recv().unwrap();
        assert_eq!(message.sender, Speaker::System);
        assert_eq!(message.text, "Configuration error. Please check settings.");
    }
}
