//! Lifecycle notifications emitted by the agent loop.
//!
//! Every hook is fire-and-forget with a no-op default. The loop behaves the
//! same whichever adapter is attached, or with [`NoopObserver`].

use crate::models::{RunOutcome, Task};
use crate::progress::ProgressGuard;
use serde_json::Value;

pub mod console;
pub mod recorder;

pub use console::ConsoleObserver;
pub use recorder::{AgentEvent, EventRecorder};

pub trait AgentObserver: Send + Sync {
    fn planning_started(&self) {}
    fn planning_completed(&self, _task_count: usize) {}
    fn tasks_listed(&self, _tasks: &[Task]) {}
    /// Planner returned no tasks; the query is answered directly.
    fn no_tasks(&self) {}
    fn task_started(&self, _task: &Task) {}
    fn tool_executing(&self, _tool_name: &str, _args: &Value) {}
    fn tool_result(&self, _tool_name: &str, _result: &Value) {}
    fn task_completed(&self, _task: &Task) {}
    fn validation_checked(&self, _task_description: &str) {}
    fn step_progress(&self, _step: u32, _max_steps: u32) {}
    fn answer_generating(&self) {}
    /// The synthesized answer, before the run is reported finished.
    fn answer(&self, _answer: &str) {}
    /// A recovered failure; the run continues.
    fn error(&self, _message: &str) {}
    fn run_finished(&self, _outcome: &RunOutcome) {}

    /// Scoped progress indicator around a single tool execution.
    fn progress(&self, _message: &str) -> Option<ProgressGuard> {
        None
    }
}

/// Default adapter: ignores everything
pub struct NoopObserver;

impl AgentObserver for NoopObserver {}
