//! Core data models for the research agent

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

//
// ================= Tasks =================
//

/// One planned unit of work toward answering the user query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub description: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn new(id: u32, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            done: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

/// Validator verdict for a single task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IsDone {
    pub done: bool,
}

/// Final answer to the user query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
}

//
// ================= Tool Calls =================
//

/// A tool invocation proposed by the model. The gateway never executes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub tool_name: String,
    pub args: Value,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>, args: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            args,
        }
    }

    /// `"{tool_name}:{args}"`, used for repetition detection.
    pub fn signature(&self) -> String {
        format!("{}:{}", self.tool_name, self.args)
    }
}

//
// ================= Financial Statements =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportingPeriod {
    Annual,
    Quarterly,
    Ttm,
}

impl ReportingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportingPeriod::Annual => "annual",
            ReportingPeriod::Quarterly => "quarterly",
            ReportingPeriod::Ttm => "ttm",
        }
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_limit() -> u32 {
    10
}

/// Input contract shared by every financial statement tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementQuery {
    pub ticker: String,
    pub period: ReportingPeriod,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_period_gt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_period_gte: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_period_lt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_period_lte: Option<String>,
}

impl StatementQuery {
    /// Query-string pairs; unset filters are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("ticker", self.ticker.clone()),
            ("period", self.period.as_str().to_string()),
            ("limit", self.limit.to_string()),
        ];

        let filters = [
            ("report_period_gt", &self.report_period_gt),
            ("report_period_gte", &self.report_period_gte),
            ("report_period_lt", &self.report_period_lt),
            ("report_period_lte", &self.report_period_lte),
        ];

        for (key, value) in filters {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }

        pairs
    }
}

//
// ================= Run Outcome =================
//

/// Terminal state of one agent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Answered { answer: String },
    /// Four identical consecutive actions; the run stops without an answer.
    StuckLoop { signature: String, steps: u32 },
    /// Global step cap hit inside a task; the run stops without an answer.
    BudgetExhausted { steps: u32 },
}

impl RunOutcome {
    pub fn answer(&self) -> Option<&str> {
        match self {
            RunOutcome::Answered { answer } => Some(answer),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RunOutcome::Answered { .. } => "answered",
            RunOutcome::StuckLoop { .. } => "stuck_loop",
            RunOutcome::BudgetExhausted { .. } => "budget_exhausted",
        }
    }
}
