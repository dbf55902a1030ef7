//! Minimal chat widget. The bot echoes every user message back.

use crate::state::{ChatMessage, ChatRole};

/// Where chat messages end up
pub trait ChatHistory {
    fn append(&mut self, message: ChatMessage);
}

impl ChatHistory for Vec<ChatMessage> {
    fn append(&mut self, message: ChatMessage) {
        self.push(message);
    }
}

#[derive(Debug, Default)]
pub struct ChatWidget<H: ChatHistory> {
    history: H,
}

impl<H: ChatHistory> ChatWidget<H> {
    pub fn new(history: H) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Send the contents of `input`. Blank input is ignored and left in place;
    /// otherwise the user message and the bot's echo are appended and the
    /// input is cleared. Returns whether anything was sent.
    pub fn send(&mut self, input: &mut String) -> bool {
        if input.trim().is_empty() {
            return false;
        }

        let message = std::mem::take(input);
        self.add_message(message.clone(), ChatRole::User);
        self.respond(message);
        true
    }

    fn respond(&mut self, user_message: String) {
        self.add_message(user_message, ChatRole::Bot);
    }

    fn add_message(&mut self, content: String, role: ChatRole) {
        self.history.append(ChatMessage { role, content });
    }
}
