//! Agent control loop
//!
//! PLAN → SELECT TASK → ACT → VALIDATE → (SELECT TASK | ANSWER)
//!
//! Every model and tool call is awaited in order. Component failures are
//! recovered here (fallback plan, empty batch, "not done", transcript error
//! line) and reported to the observer; only answer synthesis can fail a run.

use crate::answer::AnswerSynthesizer;
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::llm::LanguageModel;
use crate::models::{RunOutcome, Task, ToolCall};
use crate::planner::{fallback_plan, LlmPlanner, Planner};
use crate::presentation::{AgentObserver, NoopObserver};
use crate::progress;
use crate::prompts::Prompts;
use crate::selector::ActionSelector;
use crate::tools::ToolRegistry;
use crate::transcript::{ActionWindow, Transcript};
use crate::validator::TaskValidator;
use crate::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Everything a run produced, for callers that need more than the outcome.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub outcome: RunOutcome,
    pub tasks: Vec<Task>,
    pub steps: u32,
    pub transcript: Vec<String>,
}

/// Per-run mutable state; never shared between runs.
struct RunState {
    tasks: Vec<Task>,
    transcript: Transcript,
    window: ActionWindow,
    steps: u32,
}

/// How a task's action loop ended.
enum TaskExit {
    /// Task done, or its per-task budget spent; back to task selection.
    Continue,
    /// The run stops without answer synthesis.
    Terminal(RunOutcome),
}

pub struct Agent {
    planner: Box<dyn Planner>,
    selector: ActionSelector,
    validator: TaskValidator,
    synthesizer: AnswerSynthesizer,
    tools: Arc<ToolRegistry>,
    observer: Arc<dyn AgentObserver>,
    prompts: Prompts,
    config: AgentConfig,
}

impl Agent {
    pub fn new(model: Arc<dyn LanguageModel>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        let prompts = Prompts::new(config.locale);
        let model_name = config.model_name.clone();
        if tools.is_empty() {
            warn!("Agent built without tools; every task will be answered directly");
        }

        let planner = LlmPlanner::new(
            model.clone(),
            tools.render_catalog(),
            prompts,
            model_name.clone(),
        );
        let selector = ActionSelector::new(model.clone(), tools.specs(), prompts, model_name.clone());
        let validator = TaskValidator::new(model.clone(), prompts, model_name.clone());
        let synthesizer = AnswerSynthesizer::new(model, prompts, model_name);

        Self {
            planner: Box::new(planner),
            selector,
            validator,
            synthesizer,
            tools,
            observer: Arc::new(NoopObserver),
            prompts,
            config,
        }
    }

    pub fn with_planner(mut self, planner: Box<dyn Planner>) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn AgentObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Answer `query`, or report why the run stopped early.
    pub async fn run(&self, query: &str) -> Result<RunOutcome> {
        Ok(self.run_with_report(query).await?.outcome)
    }

    pub async fn run_with_report(&self, query: &str) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("agent_run", run_id = %run_id);

        async move {
            info!(
                query = %query,
                max_steps = self.config.max_steps,
                max_steps_per_task = self.config.max_steps_per_task,
                "Agent: starting run"
            );

            let mut state = RunState {
                tasks: self.plan(query).await,
                transcript: Transcript::new(),
                window: ActionWindow::new(),
                steps: 0,
            };

            let outcome = match self.work_tasks(&mut state).await {
                Some(terminal) => terminal,
                None => {
                    let answer = self.answer(query, &state.transcript).await?;
                    self.observer.answer(&answer);
                    RunOutcome::Answered { answer }
                }
            };

            info!(
                outcome = outcome.kind(),
                steps = state.steps,
                transcript_entries = state.transcript.len(),
                "Agent: run finished"
            );
            self.observer.run_finished(&outcome);

            Ok(RunReport {
                run_id,
                outcome,
                tasks: state.tasks,
                steps: state.steps,
                transcript: state.transcript.entries().to_vec(),
            })
        }
        .instrument(span)
        .await
    }

    // ===== Planning =====

    async fn plan(&self, query: &str) -> Vec<Task> {
        self.observer.planning_started();

        let tasks = match self.planner.plan(query).await {
            Ok(tasks) => tasks,
            Err(e) => {
                let error = AgentError::PlanningError(e.to_string());
                warn!(error = %error, "Falling back to single task");
                self.observer.error(&self.prompts.planning_failed(&e));
                fallback_plan(query)
            }
        };

        if tasks.is_empty() {
            debug!("No tasks planned");
            self.observer.no_tasks();
        } else {
            debug!(task_count = tasks.len(), "Plan ready");
            self.observer.planning_completed(tasks.len());
            self.observer.tasks_listed(&tasks);
        }

        tasks
    }

    // ===== Task loop =====

    /// Work tasks in order until all are done or a cap is hit.
    /// `Some` is a terminal outcome that skips answer synthesis.
    async fn work_tasks(&self, state: &mut RunState) -> Option<RunOutcome> {
        while let Some(index) = state.tasks.iter().position(|t| !t.done) {
            if state.steps >= self.config.max_steps {
                warn!(steps = state.steps, "Global max steps reached, answering with what we have");
                break;
            }

            let task = state.tasks[index].clone();
            debug!(task_id = task.id, description = %task.description, "Working on task");
            self.observer.task_started(&task);

            if let TaskExit::Terminal(outcome) = self.work_task(state, index).await {
                return Some(outcome);
            }
        }

        None
    }

    /// Per-task step budget; never below one so every visit makes progress.
    fn task_budget(&self) -> u32 {
        self.config.max_steps_per_task.max(1)
    }

    async fn work_task(&self, state: &mut RunState, index: usize) -> TaskExit {
        let description = state.tasks[index].description.clone();
        let budget = self.task_budget();
        let mut task_steps = 0;

        while task_steps < budget {
            if state.steps >= self.config.max_steps {
                warn!(steps = state.steps, "Global max steps reached, stopping");
                return TaskExit::Terminal(RunOutcome::BudgetExhausted { steps: state.steps });
            }

            let batch = self.select_actions(&description, &state.transcript).await;
            if batch.is_empty() {
                self.complete_task(state, index);
                return TaskExit::Continue;
            }

            for call in batch {
                if state.steps >= self.config.max_steps || task_steps >= budget {
                    break;
                }

                let signature = call.signature();
                if state.window.push(signature.clone()) {
                    warn!(signature = %signature, "Repeating action detected, aborting");
                    return TaskExit::Terminal(RunOutcome::StuckLoop {
                        signature,
                        steps: state.steps,
                    });
                }

                self.execute(&call, &mut state.transcript).await;

                state.steps += 1;
                task_steps += 1;
                self.observer.step_progress(state.steps, self.config.max_steps);
            }

            if self.check_done(&description, &state.transcript).await {
                self.complete_task(state, index);
                return TaskExit::Continue;
            }
        }

        debug!(task_steps, "Per-task budget spent, returning to task selection");
        TaskExit::Continue
    }

    fn complete_task(&self, state: &mut RunState, index: usize) {
        let task = &mut state.tasks[index];
        task.done = true;
        info!(task_id = task.id, "Task completed");
        self.observer.task_completed(task);
    }

    async fn select_actions(&self, description: &str, transcript: &Transcript) -> Vec<ToolCall> {
        match self.selector.select_actions(description, &transcript.joined()).await {
            Ok(calls) => calls,
            Err(e) => {
                let error = AgentError::ActionSelectionError(e.to_string());
                warn!(error = %error, "Action selection failed");
                self.observer.error(&error.to_string());
                Vec::new()
            }
        }
    }

    async fn check_done(&self, description: &str, transcript: &Transcript) -> bool {
        self.observer.validation_checked(description);

        match self.validator.is_done(description, &transcript.joined()).await {
            Ok(done) => done,
            Err(e) => {
                let error = AgentError::ValidationError(e.to_string());
                debug!(error = %error, "Treating task as not done");
                false
            }
        }
    }

    // ===== Tool execution =====

    /// Run one call. Failures become transcript error lines; an unknown tool
    /// is reported but leaves no transcript entry.
    async fn execute(&self, call: &ToolCall, transcript: &mut Transcript) {
        let tool = match self.tools.resolve(&call.tool_name) {
            Ok(tool) => tool,
            Err(e) => {
                warn!(tool_name = %call.tool_name, "Invalid tool requested");
                self.observer.error(&e.to_string());
                return;
            }
        };

        self.observer.tool_executing(&call.tool_name, &call.args);
        let guard = self
            .observer
            .progress(&format!("Executing {}...", call.tool_name));

        match progress::tracked(guard, tool.execute(&call.args)).await {
            Ok(result) => {
                debug!(tool_name = %call.tool_name, "Tool succeeded");
                self.observer.tool_result(&call.tool_name, &result);
                transcript.record_output(&call.tool_name, &call.args, &result);
            }
            Err(e) => {
                warn!(tool_name = %call.tool_name, error = %e, "Tool failed");
                self.observer
                    .error(&format!("Tool {} failed: {}", call.tool_name, e));
                transcript.record_error(&call.tool_name, &call.args, &e);
            }
        }
    }

    // ===== Answer =====

    async fn answer(&self, query: &str, transcript: &Transcript) -> Result<String> {
        self.observer.answer_generating();
        if transcript.is_empty() {
            debug!("No tool output collected, answering from general knowledge");
        }
        self.synthesizer
            .synthesize(query, &transcript.joined_for_answer())
            .await
    }
}
