use crate::{
    models::api::PromptResponse,
    pricing::{CostBreakdown, UsdAmount},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the transcript
///
/// Token counts and cost are only present on assistant messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostBreakdown>,
}

impl ExchangeMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            input_tokens: None,
            output_tokens: None,
            cost: None,
        }
    }

    pub fn assistant(reply: PromptResponse) -> Self {
        Self {
            role: Role::Assistant,
            content: reply.response,
            input_tokens: Some(reply.input_tokens),
            output_tokens: Some(reply.output_tokens),
            cost: Some(reply.cost),
        }
    }
}

/// Cumulative usage across a history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_cost: UsdAmount,
}

impl UsageTotals {
    fn add_message(mut self, message: &ExchangeMessage) -> Self {
        if message.role == Role::Assistant {
            self.input_tokens += message.input_tokens.unwrap_or(0);
            self.output_tokens += message.output_tokens.unwrap_or(0);
            self.total_cost = self.total_cost
                + message
                    .cost
                    .as_ref()
                    .map(|c| c.total_cost)
                    .unwrap_or(UsdAmount::ZERO);
        }
        self
    }
}

/// Ordered, append-only transcript of one session
///
/// Values are never edited in place: appending yields a new history, and
/// clearing is replacing it with `ConversationHistory::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    messages: Vec<ExchangeMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the user prompt (verbatim) followed by the assistant reply
    pub fn with_exchange(mut self, prompt: impl Into<String>, reply: PromptResponse) -> Self {
        self.messages.push(ExchangeMessage::user(prompt));
        self.messages.push(ExchangeMessage::assistant(reply));
        self
    }

    /// Messages in append order
    pub fn messages(&self) -> &[ExchangeMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Fold usage over every assistant message
    pub fn totals(&self) -> UsageTotals {
        self.messages
            .iter()
            .fold(UsageTotals::default(), UsageTotals::add_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(text: &str, input: u64, output: u64, total_micros: u64) -> PromptResponse {
        PromptResponse {
            response: text.to_string(),
            input_tokens: input,
            output_tokens: output,
            total_tokens: input + output,
            cost: CostBreakdown::new(UsdAmount::from_micros(total_micros), UsdAmount::ZERO),
        }
    }

    #[test]
    fn test_empty_history_totals_are_zero() {
        let totals = ConversationHistory::new().totals();
        assert_eq!(totals, UsageTotals::default());
        assert_eq!(totals.total_cost.to_string(), "0.000000");
    }

    #[test]
    fn test_exchange_appends_user_then_assistant() {
        let history = ConversationHistory::new().with_exchange("Hello", reply("Hi there", 2, 3, 0));

        let messages = history.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Hello");
        assert!(messages[0].cost.is_none());
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "Hi there");
        assert_eq!(messages[1].input_tokens, Some(2));
        assert_eq!(messages[1].output_tokens, Some(3));
    }

    #[test]
    fn test_totals_fold_assistant_messages() {
        let history = ConversationHistory::new()
            .with_exchange("a", reply("1", 10, 20, 180))
            .with_exchange("b", reply("2", 5, 7, 360));

        let totals = history.totals();
        assert_eq!(totals.input_tokens, 15);
        assert_eq!(totals.output_tokens, 27);
        assert_eq!(totals.total_cost.to_string(), "0.000540");
    }

    #[test]
    fn test_totals_are_order_independent() {
        let first = reply("1", 10, 20, 180);
        let second = reply("2", 5, 7, 360);

        let forward = ConversationHistory::new()
            .with_exchange("a", first.clone())
            .with_exchange("b", second.clone());
        let reverse = ConversationHistory::new()
            .with_exchange("b", second)
            .with_exchange("a", first);

        assert_eq!(forward.totals(), reverse.totals());
        assert_ne!(forward.messages(), reverse.messages());
    }

    #[test]
    fn test_message_wire_format() {
        let user = serde_json::to_value(ExchangeMessage::user("Hello")).unwrap();
        assert_eq!(user, serde_json::json!({"role": "user", "content": "Hello"}));

        let assistant = serde_json::to_value(ExchangeMessage::assistant(reply("Hi", 2, 3, 0))).unwrap();
        assert_eq!(assistant["role"], "assistant");
        assert_eq!(assistant["inputTokens"], 2);
        assert_eq!(assistant["cost"]["totalCost"], "0.000000");
    }
}
