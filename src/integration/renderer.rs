//! Renders session output into the display queue and the speech worker

use crate::assistant::ResponseRenderer;
use crate::messages::Message;
use crate::speech::SpeechHandle;
use crossbeam_channel::Sender;
use tracing::{debug, warn};

/// Sends transcript lines to the UI and queues spoken lines for speech
pub struct AssistantRenderer {
    display: Sender<Message>,
    speech: Option<SpeechHandle>,
}

impl AssistantRenderer {
    pub fn new(display: Sender<Message>, speech: Option<SpeechHandle>) -> Self {
        Self { display, speech }
    }

    fn post(&self, message: Message) {
        debug!("Display: {}", message);
        if self.display.send(message).is_err() {
            warn!("Display queue closed, dropping message");
        }
    }
}

impl ResponseRenderer for AssistantRenderer {
    fn say(&self, text: &str) {
        self.post(Message::assistant(text));
        if let Some(speech) = &self.speech {
            speech.speak(text);
        }
    }

    fn show(&self, text: &str) {
        self.post(Message::assistant(text));
    }

    fn heard(&self, text: &str) {
        self.post(Message::user(text));
    }

    fn error(&self, text: &str) {
        self.post(Message::system(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Sender as Speaker;
    use crate::speech::{spawn_speech_worker, SpeechSynthesizer};
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Recording(Arc<Mutex<Vec<String>>>);

    impl SpeechSynthesizer for Recording {
        fn speak(&mut self, text: &str) -> crate::Result<()> {
            self.0.lock().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_lines_reach_the_display() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let renderer = AssistantRenderer::new(tx, None);

        renderer.say("Hi there!");
        renderer.heard("hello");
        renderer.show("Listening...");
        renderer.error("Couldn't open YouTube");

        let messages: Vec<Message> = rx.try_iter().collect();
        let senders: Vec<Speaker> = messages.iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![
                Speaker::Assistant,
                Speaker::User,
                Speaker::Assistant,
                Speaker::System
            ]
        );
        assert_eq!(messages[0].to_string(), "Medibot: Hi there!");
        assert_eq!(messages[1].to_string(), "You: hello");
        assert_eq!(messages[3].to_string(), "Couldn't open YouTube");
    }

    #[test]
    fn test_only_say_is_spoken() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&spoken);
        let (speech, worker) = spawn_speech_worker(
            move || Ok(Box::new(Recording(sink)) as Box<dyn SpeechSynthesizer>),
            |_| {},
        )
        .unwrap();

        let (tx, _rx) = crossbeam_channel::unbounded();
        let renderer = AssistantRenderer::new(tx, Some(speech));
        renderer.say("How can I help you today?");
        renderer.show("Listening...");
        renderer.heard("hello");
        drop(renderer);
        worker.join().unwrap();

        assert_eq!(*spoken.lock(), vec!["How can I help you today?".to_string()]);
    }

    #[test]
    fn test_closed_display_is_ignored() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let renderer = AssistantRenderer::new(tx, None);
        renderer.say("nobody is watching");
    }
}
