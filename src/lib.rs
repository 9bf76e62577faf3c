//! Financial Research Agent
//!
//! An autonomous research assistant that answers questions about public
//! companies' financials:
//! - Decomposes a query into an ordered task list
//! - Lets the model pick tool calls for each task against financialdatasets.ai
//! - Validates task completion after every batch of calls
//! - Stops on global / per-task step budgets or a repeating action
//! - Synthesizes a figure-first answer from everything collected
//!
//! LOOP:
//! PLAN → SELECT TASK → ACT → VALIDATE → (SELECT TASK | ANSWER)

pub mod agent;
pub mod answer;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod planner;
pub mod presentation;
pub mod progress;
pub mod prompts;
pub mod selector;
pub mod tools;
pub mod transcript;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{AgentError, Result};

// Re-export common types
pub use agent::{Agent, RunReport};
pub use config::AgentConfig;
pub use models::*;
