//! Test-only doubles for the model gateway and tools.

use crate::error::AgentError;
use crate::llm::{InvocationMode, LanguageModel, ModelRequest, ModelResponse};
use crate::models::ToolCall;
use crate::tools::Tool;
use crate::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

type SchemaHandler = Box<dyn Fn(&ModelRequest) -> Result<Value> + Send + Sync>;
type ToolHandler = Box<dyn Fn(&ModelRequest) -> Result<Vec<ToolCall>> + Send + Sync>;

/// Language model answering from per-mode scripts and recording every request.
///
/// Structured calls are routed by schema name (`task_list`, `is_done`,
/// `answer`); tool-augmented calls go to the tool handler, which defaults to
/// "no tool calls".
#[derive(Default)]
pub struct ScriptedModel {
    schema_handlers: HashMap<&'static str, SchemaHandler>,
    tool_handler: Option<ToolHandler>,
    forced_tool_calls: Option<Vec<ToolCall>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_schema<F>(mut self, name: &'static str, handler: F) -> Self
    where
        F: Fn(&ModelRequest) -> Result<Value> + Send + Sync + 'static,
    {
        self.schema_handlers.insert(name, Box::new(handler));
        self
    }

    pub fn on_tools<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ModelRequest) -> Result<Vec<ToolCall>> + Send + Sync + 'static,
    {
        self.tool_handler = Some(Box::new(handler));
        self
    }

    /// Reply with these tool calls to every request, whatever its mode.
    pub fn force_tool_calls(mut self, calls: Vec<ToolCall>) -> Self {
        self.forced_tool_calls = Some(calls);
        self
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count_schema(&self, name: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.schema_name() == Some(name))
            .count()
    }

    pub fn count_tool_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| matches!(r.mode, InvocationMode::Tools(_)))
            .count()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn invoke(&self, request: ModelRequest) -> Result<ModelResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(calls) = &self.forced_tool_calls {
            return Ok(ModelResponse::ToolCalls {
                content: None,
                calls: calls.clone(),
            });
        }

        match &request.mode {
            InvocationMode::Text => Ok(ModelResponse::Text(String::new())),
            InvocationMode::Structured(schema) => {
                let handler = self.schema_handlers.get(schema.name).ok_or_else(|| {
                    AgentError::LlmError(format!("no script for schema {}", schema.name))
                })?;
                handler(&request).map(ModelResponse::Structured)
            }
            InvocationMode::Tools(_) => {
                let calls = match &self.tool_handler {
                    Some(handler) => handler(&request)?,
                    None => Vec::new(),
                };
                Ok(ModelResponse::ToolCalls {
                    content: None,
                    calls,
                })
            }
        }
    }
}

/// Tool returning a fixed value (or a fixed failure) and counting invocations.
pub struct StaticTool {
    name: &'static str,
    outcome: std::result::Result<Value, String>,
    calls: AtomicUsize,
    seen_args: Mutex<Vec<Value>>,
}

impl StaticTool {
    pub fn new(name: &'static str, output: Value) -> Self {
        Self {
            name,
            outcome: Ok(output),
            calls: AtomicUsize::new(0),
            seen_args: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(name: &'static str, message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            ..Self::new(name, Value::Null)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_args(&self) -> Vec<Value> {
        self.seen_args.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tool for StaticTool {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "Static test tool"
    }

    fn parameters(&self) -> Value {
        json!({"type": "object"})
    }

    async fn execute(&self, args: &Value) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_args.lock().unwrap().push(args.clone());
        self.outcome.clone().map_err(AgentError::ToolError)
    }
}
