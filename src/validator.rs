//! Task validation: has the transcript satisfied the task's objective?

use crate::llm::{invoke_structured, LanguageModel};
use crate::models::IsDone;
use crate::prompts::Prompts;
use crate::Result;
use std::sync::Arc;

pub struct TaskValidator {
    model: Arc<dyn LanguageModel>,
    prompts: Prompts,
    model_name: Option<String>,
}

impl TaskValidator {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Prompts, model_name: Option<String>) -> Self {
        Self {
            model,
            prompts,
            model_name,
        }
    }

    pub async fn is_done(&self, task: &str, transcript: &str) -> Result<bool> {
        let verdict: IsDone = invoke_structured(
            self.model.as_ref(),
            self.prompts.validation(task, transcript),
            self.prompts.validation_system(),
            self.model_name.clone(),
        )
        .await?;

        Ok(verdict.done)
    }
}
