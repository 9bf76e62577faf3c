//! Error types for the research agent

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Error, Debug)]
pub enum AgentError {

    // =============================
    // Core Loop Errors
    // =============================

    #[error("Planning error: {0}")]
    PlanningError(String),

    #[error("Action selection error: {0}")]
    ActionSelectionError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Answer synthesis error: {0}")]
    AnswerSynthesisError(String),

    // =============================
    // Model Gateway Errors
    // =============================

    #[error("Model provider error: {0}")]
    LlmError(String),

    #[error("Schema validation error: {0}")]
    SchemaError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // Tool Errors
    // =============================

    #[error("Tool error: {0}")]
    ToolError(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}
