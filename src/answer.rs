//! Answer synthesis from the query and everything the tools returned

use crate::error::AgentError;
use crate::llm::{invoke_structured, LanguageModel};
use crate::models::Answer;
use crate::prompts::Prompts;
use crate::Result;
use std::sync::Arc;

pub struct AnswerSynthesizer {
    model: Arc<dyn LanguageModel>,
    prompts: Prompts,
    model_name: Option<String>,
}

impl AnswerSynthesizer {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Prompts, model_name: Option<String>) -> Self {
        Self {
            model,
            prompts,
            model_name,
        }
    }

    /// `results` is the transcript joined with blank lines; an empty string
    /// is replaced by the "no data" placeholder so the model answers from
    /// general knowledge.
    pub async fn synthesize(&self, query: &str, results: &str) -> Result<String> {
        let results = if results.trim().is_empty() {
            self.prompts.no_data()
        } else {
            results
        };

        let answer: Answer = invoke_structured(
            self.model.as_ref(),
            self.prompts.answer(query, results),
            self.prompts.answer_system(),
            self.model_name.clone(),
        )
        .await
        .map_err(|e| AgentError::AnswerSynthesisError(e.to_string()))?;

        Ok(answer.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::Locale;
    use crate::test_support::ScriptedModel;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_results_use_placeholder() {
        let model = Arc::new(ScriptedModel::new().on_schema("answer", |_| Ok(json!({"answer": "Paris."}))));
        let synthesizer = AnswerSynthesizer::new(model.clone(), Prompts::default(), None);

        let answer = synthesizer.synthesize("Capital of France?", "").await.unwrap();
        assert_eq!(answer, "Paris.");

        let request = &model.requests()[0];
        assert!(request.prompt.contains("No data was collected."));
        assert!(request
            .system_prompt
            .as_deref()
            .unwrap()
            .contains("general knowledge"));
    }

    #[tokio::test]
    async fn test_localized_placeholder() {
        let model = Arc::new(ScriptedModel::new().on_schema("answer", |_| Ok(json!({"answer": "x"}))));
        let synthesizer =
            AnswerSynthesizer::new(model.clone(), Prompts::new(Locale::TraditionalChinese), None);
        synthesizer.synthesize("q", "  ").await.unwrap();
        assert!(model.requests()[0].prompt.contains("沒有收集到數據。"));
    }

    #[tokio::test]
    async fn test_failure_maps_to_answer_synthesis_error() {
        let model = Arc::new(
            ScriptedModel::new().on_schema("answer", |_| Err(AgentError::LlmError("down".into()))),
        );
        let synthesizer = AnswerSynthesizer::new(model, Prompts::default(), None);
        assert!(matches!(
            synthesizer.synthesize("q", "data").await,
            Err(AgentError::AnswerSynthesisError(_))
        ));
    }
}
