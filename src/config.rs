//! Runtime configuration read from the environment (`.env` is loaded by the binaries)

use crate::prompts::Locale;
use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_MAX_STEPS: u32 = 20;
pub const DEFAULT_MAX_STEPS_PER_TASK: u32 = 5;

/// Knobs consumed by the control loop
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Global cap on tool-call steps across the whole run
    pub max_steps: u32,
    pub max_steps_per_task: u32,
    /// Explicit per-agent override of the gateway's model; `None` follows the gateway
    pub model_name: Option<String>,
    pub locale: Locale,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            max_steps_per_task: DEFAULT_MAX_STEPS_PER_TASK,
            model_name: None,
            locale: Locale::English,
        }
    }
}

impl AgentConfig {
    /// The model is not read here: the gateway owns the default model, so a
    /// switch through the gateway reaches every agent built from this config.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let per_task = parse_var("AGENT_MAX_STEPS_PER_TASK", defaults.max_steps_per_task);

        Self {
            max_steps: parse_var("AGENT_MAX_STEPS", defaults.max_steps),
            max_steps_per_task: if per_task == 0 {
                warn!(
                    key = "AGENT_MAX_STEPS_PER_TASK",
                    fallback = defaults.max_steps_per_task,
                    "Per-task budget must be at least 1"
                );
                defaults.max_steps_per_task
            } else {
                per_task
            },
            model_name: None,
            locale: env::var("AGENT_LOCALE")
                .map(|value| Locale::from_tag(&value))
                .unwrap_or(defaults.locale),
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Clamped to 1: a zero budget would never let a task consume a step.
    pub fn with_max_steps_per_task(mut self, max_steps_per_task: u32) -> Self {
        self.max_steps_per_task = max_steps_per_task.max(1);
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

/// Read and parse an env var, falling back to `default` when unset or malformed.
pub(crate) fn parse_var<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, fallback = %default, "Ignoring unparseable setting");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.max_steps, 20);
        assert_eq!(config.max_steps_per_task, 5);
        assert_eq!(config.locale, Locale::English);
        assert!(config.model_name.is_none());
    }

    #[test]
    fn test_parse_var_falls_back_on_garbage() {
        env::set_var("RESEARCH_AGENT_TEST_STEPS", "many");
        assert_eq!(parse_var("RESEARCH_AGENT_TEST_STEPS", 7u32), 7);

        env::set_var("RESEARCH_AGENT_TEST_STEPS", " 12 ");
        assert_eq!(parse_var("RESEARCH_AGENT_TEST_STEPS", 7u32), 12);

        env::remove_var("RESEARCH_AGENT_TEST_STEPS");
        assert_eq!(parse_var("RESEARCH_AGENT_TEST_STEPS", 7u32), 7);
    }

    #[test]
    fn test_zero_per_task_budget_is_clamped() {
        let config = AgentConfig::default().with_max_steps_per_task(0);
        assert_eq!(config.max_steps_per_task, 1);

        let config = AgentConfig::default().with_max_steps(0);
        assert_eq!(config.max_steps, 0);
    }

    #[test]
    fn test_from_env_leaves_model_to_gateway() {
        env::set_var("AGENT_MAX_STEPS_PER_TASK", "0");
        env::set_var("OPENAI_MODEL", "gpt-4o");
        env::set_var("AGENT_LOCALE", "zh-TW");

        let config = AgentConfig::from_env();

        env::remove_var("AGENT_MAX_STEPS_PER_TASK");
        env::remove_var("OPENAI_MODEL");
        env::remove_var("AGENT_LOCALE");

        assert_eq!(config.max_steps_per_task, DEFAULT_MAX_STEPS_PER_TASK);
        assert!(config.model_name.is_none());
        assert_eq!(config.locale, Locale::TraditionalChinese);
    }
}
