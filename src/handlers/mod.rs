pub mod health;
pub mod metrics_handler;
pub mod pricing;
pub mod prompt;

pub use prompt::AppState;
