//! Planner trait and implementations
//!
//! The planner turns a user query into an ordered task list. An empty list
//! means the query is outside what the tools can help with.

use crate::models::Task;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashSet;

pub mod llm;
pub use llm::LlmPlanner;

/// Trait for task planning
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, query: &str) -> Result<Vec<Task>>;
}

/// Single task carrying the raw query, used when planning fails.
pub fn fallback_plan(query: &str) -> Vec<Task> {
    vec![Task::new(1, query)]
}

/// Reset `done` and renumber duplicate ids, keeping list order.
///
/// A repeated id takes the smallest positive id not used anywhere in the list.
pub fn normalize_tasks(tasks: Vec<Task>) -> Vec<Task> {
    let mut taken: HashSet<u32> = tasks.iter().map(|t| t.id).collect();
    let mut seen = HashSet::with_capacity(tasks.len());
    let mut candidate = 1u32;

    tasks
        .into_iter()
        .map(|mut task| {
            task.done = false;
            if !seen.insert(task.id) {
                while taken.contains(&candidate) {
                    candidate += 1;
                }
                task.id = candidate;
                taken.insert(candidate);
                seen.insert(candidate);
            }
            task
        })
        .collect()
}

/// Planner returning a fixed task list
/// Keeps the loop testable without an LLM
pub struct StaticPlanner {
    tasks: Vec<Task>,
}

impl StaticPlanner {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

#[async_trait]
impl Planner for StaticPlanner {
    async fn plan(&self, _query: &str) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_plan_uses_query() {
        let tasks = fallback_plan("How is AAPL doing?");
        assert_eq!(tasks, vec![Task::new(1, "How is AAPL doing?")]);
    }

    #[test]
    fn test_normalize_tasks() {
        let tasks = vec![
            Task { id: 1, description: "a".into(), done: true },
            Task { id: 1, description: "b".into(), done: false },
            Task { id: 4, description: "c".into(), done: false },
        ];

        let normalized = normalize_tasks(tasks);
        let ids: Vec<u32> = normalized.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        assert!(normalized.iter().all(|t| !t.done));
        assert_eq!(normalized[1].description, "b");
    }

    #[test]
    fn test_normalize_tasks_with_maximal_ids() {
        let tasks = vec![
            Task::new(u32::MAX, "a"),
            Task::new(u32::MAX, "b"),
            Task::new(1, "c"),
            Task::new(u32::MAX, "d"),
        ];

        let ids: Vec<u32> = normalize_tasks(tasks).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![u32::MAX, 2, 1, 3]);
    }

    #[test]
    fn test_static_planner_returns_given_tasks() {
        let planner = StaticPlanner::new(vec![Task::new(3, "fetch MSFT balance sheet")]);
        let tasks = tokio_test::block_on(planner.plan("anything")).unwrap();
        assert_eq!(tasks, vec![Task::new(3, "fetch MSFT balance sheet")]);
    }
}
