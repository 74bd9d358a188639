//! Client-side conversation state
//!
//! The same reducer backs the terminal client (`token-counter chat`) and is
//! mirrored by the embedded browser page.

pub mod history;
pub mod session;

pub use history::{ConversationHistory, ExchangeMessage, Role, UsageTotals};
pub use session::{ChatSession, LoadState, SubmitError};
