//! Command implementations for the CLI
//!
//! - start: Start the server
//! - test: Test configuration validity
//! - config: Configuration display
//! - pricing: Print the rate card
//! - chat: Terminal conversation client

pub mod chat;
pub mod config;
pub mod pricing;
pub mod start;
pub mod test;
