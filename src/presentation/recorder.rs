//! Event recorder backing the web API
//!
//! Collects lifecycle notifications in order so an HTTP client can render
//! the same progress the terminal shows.

use crate::models::{RunOutcome, Task};
use crate::presentation::AgentObserver;
use serde::Serialize;
use serde_json::Value;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    PlanningStarted,
    PlanningCompleted { task_count: usize },
    TasksListed { tasks: Vec<Task> },
    NoTasks,
    TaskStarted { task_id: u32, description: String },
    ToolExecuting { tool_name: String, args: Value },
    ToolResult { tool_name: String, result: Value },
    TaskCompleted { task_id: u32, description: String },
    ValidationChecked { description: String },
    StepProgress { step: u32, max_steps: u32 },
    AnswerGenerating,
    Answer { answer: String },
    Error { message: String },
    RunFinished { outcome: String },
}

#[derive(Default)]
pub struct EventRecorder {
    events: Mutex<Vec<AgentEvent>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: AgentEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }

    pub fn events(&self) -> Vec<AgentEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl AgentObserver for EventRecorder {
    fn planning_started(&self) {
        self.push(AgentEvent::PlanningStarted);
    }

    fn planning_completed(&self, task_count: usize) {
        self.push(AgentEvent::PlanningCompleted { task_count });
    }

    fn tasks_listed(&self, tasks: &[Task]) {
        self.push(AgentEvent::TasksListed {
            tasks: tasks.to_vec(),
        });
    }

    fn no_tasks(&self) {
        self.push(AgentEvent::NoTasks);
    }

    fn task_started(&self, task: &Task) {
        self.push(AgentEvent::TaskStarted {
            task_id: task.id,
            description: task.description.clone(),
        });
    }

    fn tool_executing(&self, tool_name: &str, args: &Value) {
        self.push(AgentEvent::ToolExecuting {
            tool_name: tool_name.to_string(),
            args: args.clone(),
        });
    }

    fn tool_result(&self, tool_name: &str, result: &Value) {
        self.push(AgentEvent::ToolResult {
            tool_name: tool_name.to_string(),
            result: result.clone(),
        });
    }

    fn task_completed(&self, task: &Task) {
        self.push(AgentEvent::TaskCompleted {
            task_id: task.id,
            description: task.description.clone(),
        });
    }

    fn validation_checked(&self, task_description: &str) {
        self.push(AgentEvent::ValidationChecked {
            description: task_description.to_string(),
        });
    }

    fn step_progress(&self, step: u32, max_steps: u32) {
        self.push(AgentEvent::StepProgress { step, max_steps });
    }

    fn answer_generating(&self) {
        self.push(AgentEvent::AnswerGenerating);
    }

    fn answer(&self, answer: &str) {
        self.push(AgentEvent::Answer {
            answer: answer.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.push(AgentEvent::Error {
            message: message.to_string(),
        });
    }

    fn run_finished(&self, outcome: &RunOutcome) {
        self.push(AgentEvent::RunFinished {
            outcome: outcome.kind().to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_events_serialize_with_type_tag() {
        let recorder = EventRecorder::new();
        recorder.planning_started();
        recorder.tool_executing("get_income_statements", &json!({"ticker": "AAPL"}));

        let events = serde_json::to_value(recorder.events()).unwrap();
        assert_eq!(events[0], json!({"type": "planning_started"}));
        assert_eq!(events[1]["type"], "tool_executing");
        assert_eq!(events[1]["args"]["ticker"], "AAPL");
    }

    #[test]
    fn test_answer_event_carries_text() {
        let recorder = EventRecorder::new();
        recorder.answer("Revenue was 94800000000.");

        let events = serde_json::to_value(recorder.events()).unwrap();
        assert_eq!(
            events[0],
            json!({"type": "answer", "answer": "Revenue was 94800000000."})
        );
    }
}
