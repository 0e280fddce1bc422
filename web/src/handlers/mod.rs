//! HTTP request handlers.
//!
//! Handlers for the demonstration server.

pub mod echo;
pub mod health;

// Re-export common handler utilities
pub use echo::echo;
pub use health::health_check;
