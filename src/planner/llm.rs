//! Model-backed planner

use crate::llm::{invoke_structured, LanguageModel};
use crate::models::{Task, TaskList};
use crate::planner::{normalize_tasks, Planner};
use crate::prompts::Prompts;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub struct LlmPlanner {
    model: Arc<dyn LanguageModel>,
    /// Rendered once from the registry
    tool_catalog: String,
    prompts: Prompts,
    model_name: Option<String>,
}

impl LlmPlanner {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        tool_catalog: String,
        prompts: Prompts,
        model_name: Option<String>,
    ) -> Self {
        Self {
            model,
            tool_catalog,
            prompts,
            model_name,
        }
    }
}

#[async_trait]
impl Planner for LlmPlanner {
    async fn plan(&self, query: &str) -> Result<Vec<Task>> {
        let system_prompt = self.prompts.planning_system(&self.tool_catalog);
        let prompt = self.prompts.planning(query);

        let list: TaskList = invoke_structured(
            self.model.as_ref(),
            prompt,
            &system_prompt,
            self.model_name.clone(),
        )
        .await?;

        debug!(task_count = list.tasks.len(), "Plan received");

        Ok(normalize_tasks(list.tasks))
    }
}
