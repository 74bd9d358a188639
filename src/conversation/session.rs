use crate::conversation::history::{ConversationHistory, UsageTotals};
use crate::models::api::PromptResponse;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Waiting,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("a prompt is already waiting for a response")]
    Busy,
}

/// Client-side state of one chat session
///
/// At most one prompt is in flight: `begin_submit` moves Idle to Waiting and
/// `finish` moves back. A failed exchange appends nothing and leaves a
/// visible error until dismissed or the next submit.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    history: ConversationHistory,
    state: LoadState,
    pending: Option<String>,
    last_error: Option<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Totals derived from the current history snapshot
    pub fn totals(&self) -> UsageTotals {
        self.history.totals()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start a submission; returns the prompt to send, unmodified
    pub fn begin_submit(&mut self, prompt: &str) -> Result<String, SubmitError> {
        if self.state == LoadState::Waiting {
            return Err(SubmitError::Busy);
        }
        if prompt.trim().is_empty() {
            return Err(SubmitError::EmptyPrompt);
        }

        self.state = LoadState::Waiting;
        self.pending = Some(prompt.to_string());
        self.last_error = None;
        Ok(prompt.to_string())
    }

    /// Complete the in-flight submission
    ///
    /// Returns false when nothing was waiting.
    pub fn finish<E: Display>(&mut self, result: Result<PromptResponse, E>) -> bool {
        let Some(prompt) = self.pending.take() else {
            return false;
        };
        self.state = LoadState::Idle;

        match result {
            Ok(reply) => {
                let history = std::mem::take(&mut self.history);
                self.history = history.with_exchange(prompt, reply);
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Drop the whole transcript
    pub fn clear(&mut self) {
        self.history = ConversationHistory::default();
    }
}
