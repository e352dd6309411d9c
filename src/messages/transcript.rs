use super::types::Message;

/// Conversation shown in the window
///
/// Owned by the UI thread; other threads reach it only through the
/// display queue.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Full transcript text, one blank-line separated entry per message
    pub fn text(&self) -> String {
        self.messages
            .iter()
            .map(|message| format!("{}\n\n", message))
            .collect()
    }
}
