//! Chat transcript and the prompt input it is fed from.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    pub prompt: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChatPanel {
    pub transcript: Vec<ChatExchange>,
    pub input: String,
    pub last_error: Option<String>,
    pub revision: u64,
}

impl ChatPanel {
    pub fn type_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// What a submission sends: the input, trimmed. Empty prompts are allowed.
    pub fn prompt(&self) -> String {
        self.input.trim().to_string()
    }

    pub fn append(&mut self, prompt: String, answer: String) {
        self.transcript.push(ChatExchange { prompt, answer });
        self.input.clear();
        self.last_error = None;
        self.revision += 1;
    }

    pub fn fail(&mut self, reason: String) {
        self.last_error = Some(reason);
    }
}
