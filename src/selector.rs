//! Action selection: ask the model which tool call(s) move the current task forward

use crate::llm::{LanguageModel, ModelRequest, ToolSpec};
use crate::models::ToolCall;
use crate::prompts::Prompts;
use crate::Result;
use std::sync::Arc;

pub struct ActionSelector {
    model: Arc<dyn LanguageModel>,
    tools: Vec<ToolSpec>,
    prompts: Prompts,
    model_name: Option<String>,
}

impl ActionSelector {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        tools: Vec<ToolSpec>,
        prompts: Prompts,
        model_name: Option<String>,
    ) -> Self {
        Self {
            model,
            tools,
            prompts,
            model_name,
        }
    }

    /// Next batch of tool calls. An empty batch means the model sees nothing
    /// left to do with the available tools.
    pub async fn select_actions(&self, task: &str, transcript: &str) -> Result<Vec<ToolCall>> {
        let request = ModelRequest::with_tools(self.prompts.action(task, transcript), self.tools.clone())
            .system(self.prompts.action_system())
            .model(self.model_name.clone());

        Ok(self.model.invoke(request).await?.into_tool_calls())
    }
}
