//! Model gateway: the single entry point for language-model calls.
//!
//! Three invocation modes are supported, and they are mutually exclusive:
//! free text, schema-constrained structured output, and tool-augmented
//! completion where the model proposes (but never executes) tool calls.

use crate::error::AgentError;
use crate::models::{Answer, IsDone, TaskList, ToolCall};
use crate::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

pub mod gateway;
pub mod openai;

pub use gateway::{GatewaySettings, ModelGateway};
pub use openai::ChatClient;

/// JSON schema a structured response must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: &'static str,
    pub schema: Value,
}

impl OutputSchema {
    pub fn required_fields(&self) -> Vec<&str> {
        self.schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Structural check: the value is an object carrying every required field.
    pub fn validate(&self, value: &Value) -> Result<()> {
        let object = value.as_object().ok_or_else(|| {
            AgentError::SchemaError(format!("{}: expected a JSON object, got {}", self.name, value))
        })?;

        let missing: Vec<&str> = self
            .required_fields()
            .into_iter()
            .filter(|field| !object.contains_key(*field))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AgentError::SchemaError(format!(
                "{}: missing required field(s) {:?}",
                self.name, missing
            )))
        }
    }
}

/// Types the gateway can produce in structured mode.
pub trait StructuredOutput: DeserializeOwned {
    fn output_schema() -> OutputSchema;
}

impl StructuredOutput for TaskList {
    fn output_schema() -> OutputSchema {
        OutputSchema {
            name: "task_list",
            schema: json!({
                "type": "object",
                "description": "Represents a list of tasks.",
                "properties": {
                    "tasks": {
                        "type": "array",
                        "description": "The list of tasks.",
                        "items": {
                            "type": "object",
                            "properties": {
                                "id": { "type": "integer", "description": "Unique identifier for the task." },
                                "description": { "type": "string", "description": "The description of the task." },
                                "done": { "type": "boolean", "description": "Whether the task is completed." }
                            },
                            "required": ["id", "description", "done"],
                            "additionalProperties": false
                        }
                    }
                },
                "required": ["tasks"],
                "additionalProperties": false
            }),
        }
    }
}

impl StructuredOutput for IsDone {
    fn output_schema() -> OutputSchema {
        OutputSchema {
            name: "is_done",
            schema: json!({
                "type": "object",
                "description": "Represents the boolean status of a task.",
                "properties": {
                    "done": { "type": "boolean", "description": "Whether the task is done or not." }
                },
                "required": ["done"],
                "additionalProperties": false
            }),
        }
    }
}

impl StructuredOutput for Answer {
    fn output_schema() -> OutputSchema {
        OutputSchema {
            name: "answer",
            schema: json!({
                "type": "object",
                "description": "Represents an answer to the user's query.",
                "properties": {
                    "answer": {
                        "type": "string",
                        "description": "A comprehensive answer to the user's query, including relevant numbers, data, reasoning, and insights."
                    }
                },
                "required": ["answer"],
                "additionalProperties": false
            }),
        }
    }
}

/// A callable tool as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvocationMode {
    Text,
    Structured(OutputSchema),
    Tools(Vec<ToolSpec>),
}

#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub prompt: String,
    /// `None` selects the default research-agent system prompt.
    pub system_prompt: Option<String>,
    pub mode: InvocationMode,
    pub model_name: Option<String>,
}

impl ModelRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            mode: InvocationMode::Text,
            model_name: None,
        }
    }

    pub fn structured(prompt: impl Into<String>, schema: OutputSchema) -> Self {
        Self {
            mode: InvocationMode::Structured(schema),
            ..Self::text(prompt)
        }
    }

    pub fn with_tools(prompt: impl Into<String>, tools: Vec<ToolSpec>) -> Self {
        Self {
            mode: InvocationMode::Tools(tools),
            ..Self::text(prompt)
        }
    }

    pub fn system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn model(mut self, model_name: Option<String>) -> Self {
        self.model_name = model_name;
        self
    }

    pub fn schema_name(&self) -> Option<&'static str> {
        match &self.mode {
            InvocationMode::Structured(schema) => Some(schema.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelResponse {
    Text(String),
    Structured(Value),
    ToolCalls {
        content: Option<String>,
        calls: Vec<ToolCall>,
    },
}

impl ModelResponse {
    /// Tool calls carried by the response; empty for text and structured replies.
    pub fn into_tool_calls(self) -> Vec<ToolCall> {
        match self {
            ModelResponse::ToolCalls { calls, .. } => calls,
            _ => Vec::new(),
        }
    }
}

/// Anything that can answer a [`ModelRequest`]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn invoke(&self, request: ModelRequest) -> Result<ModelResponse>;
}

/// Structured-mode call decoded into `T`.
///
/// The payload is checked against `T`'s schema before it is deserialized, so a
/// reply missing a required field surfaces as [`AgentError::SchemaError`].
pub async fn invoke_structured<T: StructuredOutput>(
    model: &dyn LanguageModel,
    prompt: String,
    system_prompt: &str,
    model_name: Option<String>,
) -> Result<T> {
    let schema = T::output_schema();
    let request = ModelRequest::structured(prompt, schema.clone())
        .system(system_prompt)
        .model(model_name);

    let value = match model.invoke(request).await? {
        ModelResponse::Structured(value) => value,
        ModelResponse::Text(text) => parse_json_payload(&text)?,
        ModelResponse::ToolCalls { .. } => {
            return Err(AgentError::SchemaError(format!(
                "{}: expected structured output, got tool calls",
                schema.name
            )))
        }
    };

    schema.validate(&value)?;

    serde_json::from_value(value)
        .map_err(|e| AgentError::SchemaError(format!("{}: {}", schema.name, e)))
}

/// Parse a JSON object out of model text, tolerating a markdown code fence.
pub fn parse_json_payload(raw: &str) -> Result<Value> {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(cleaned).map_err(|e| {
        AgentError::SchemaError(format!("Failed to parse structured response: {} | raw={}", e, raw))
    })
}
