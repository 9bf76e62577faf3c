//! OpenAI-compatible chat completions client
//!
//! Uses a long-lived reqwest::Client for connection pooling. The client is
//! bound to one `(api_key, model)` pair; the gateway rebuilds it when either
//! changes.

use crate::error::AgentError;
use crate::llm::{parse_json_payload, InvocationMode, ModelRequest, ModelResponse, ToolSpec};
use crate::models::ToolCall;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Reusable chat client (connection-pooled)
pub struct ChatClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ChatClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| AgentError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one completion request. No retries.
    pub async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request(request);

        debug!(model = %self.model, mode = ?mode_label(&request.mode), "Calling chat completions");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Model API request failed: {}", e);
                AgentError::LlmError(format!("Model API request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "Model API error response: {}", error_text);
            return Err(AgentError::LlmError(format!(
                "Model API returned {}: {}",
                status, error_text
            )));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            error!("Failed to parse model response: {}", e);
            AgentError::LlmError(format!("Model response parse error: {}", e))
        })?;

        let message = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AgentError::LlmError("No choices in model response".to_string()))?;

        match &request.mode {
            InvocationMode::Text => Ok(ModelResponse::Text(message.content.unwrap_or_default())),
            InvocationMode::Structured(schema) => {
                let content = message.content.ok_or_else(|| {
                    AgentError::SchemaError(format!("{}: empty structured response", schema.name))
                })?;
                let value = parse_json_payload(&content)?;
                schema.validate(&value)?;
                Ok(ModelResponse::Structured(value))
            }
            InvocationMode::Tools(_) => {
                let calls = message
                    .tool_calls
                    .unwrap_or_default()
                    .into_iter()
                    .map(decode_tool_call)
                    .collect::<Result<Vec<_>>>()?;

                Ok(ModelResponse::ToolCalls {
                    content: message.content,
                    calls,
                })
            }
        }
    }

    fn build_request(&self, request: &ModelRequest) -> CompletionRequest {
        let system = request
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let mut body = CompletionRequest {
            model: self.model.clone(),
            temperature: 0.0,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: request.prompt.clone(),
                },
            ],
            response_format: None,
            tools: None,
        };

        match &request.mode {
            InvocationMode::Text => {}
            InvocationMode::Structured(schema) => {
                body.response_format = Some(json!({
                    "type": "json_schema",
                    "json_schema": {
                        "name": schema.name,
                        "schema": schema.schema,
                    }
                }));
            }
            InvocationMode::Tools(tools) => {
                body.tools = Some(tools.iter().map(FunctionTool::from).collect());
            }
        }

        body
    }
}

fn mode_label(mode: &InvocationMode) -> &'static str {
    match mode {
        InvocationMode::Text => "text",
        InvocationMode::Structured(_) => "structured",
        InvocationMode::Tools(_) => "tools",
    }
}

/// Arguments arrive as a JSON-encoded string and must decode to an object.
fn decode_tool_call(raw: RawToolCall) -> Result<ToolCall> {
    let arguments = raw.function.arguments.trim();
    let args: Value = if arguments.is_empty() {
        json!({})
    } else {
        serde_json::from_str(arguments).map_err(|e| {
            AgentError::LlmError(format!(
                "Invalid arguments for tool call {}: {}",
                raw.function.name, e
            ))
        })?
    };

    if !args.is_object() {
        return Err(AgentError::LlmError(format!(
            "Tool call {} arguments must be a JSON object, got {}",
            raw.function.name, args
        )));
    }

    Ok(ToolCall::new(raw.function.name, args))
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    temperature: f32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<FunctionTool>>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct FunctionTool {
    r#type: &'static str,
    function: FunctionDefinition,
}

#[derive(Debug, Serialize)]
struct FunctionDefinition {
    name: String,
    description: String,
    parameters: Value,
}

impl From<&ToolSpec> for FunctionTool {
    fn from(spec: &ToolSpec) -> Self {
        Self {
            r#type: "function",
            function: FunctionDefinition {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: spec.parameters.clone(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<RawToolCall>>,
}

#[derive(Debug, Deserialize)]
struct RawToolCall {
    function: RawFunction,
}

#[derive(Debug, Deserialize)]
struct RawFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}
