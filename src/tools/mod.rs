//! Tool trait and registry
//!
//! The registry is built once at startup. Declaration order is preserved so
//! the catalog shown to the planner is stable.

use crate::error::AgentError;
use crate::llm::ToolSpec;
use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub mod financials;

pub use financials::{FinancialDatasetsClient, FinancialStatementTool, StatementKind};

/// Trait for a single data-fetch tool
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON schema of the accepted arguments
    fn parameters(&self) -> Value;
    async fn execute(&self, args: &Value) -> Result<Value>;
}

/// Tool registry for looking up and executing tools
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Registering a name twice replaces the earlier tool in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.index.get(tool.name()) {
            Some(&slot) => self.tools[slot] = tool,
            None => {
                self.index.insert(tool.name(), self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&slot| self.tools[slot].clone())
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>> {
        self.get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// `- name: description` per tool, in declaration order.
    pub fn render_catalog(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("- {}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|t| ToolSpec {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters(),
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with the three financial statement tools backed by one API client.
pub fn create_default_registry(api: FinancialDatasetsClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    let api = Arc::new(api);

    for kind in StatementKind::ALL {
        registry.register(Arc::new(FinancialStatementTool::new(kind, api.clone())));
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StaticTool;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        create_default_registry(FinancialDatasetsClient::new(
            "key".into(),
            "http://localhost:9".into(),
        ))
    }

    #[test]
    fn test_default_registry_contents() {
        let registry = registry();
        assert_eq!(
            registry.list(),
            vec![
                "get_income_statements",
                "get_balance_sheets",
                "get_cash_flow_statements"
            ]
        );
        assert_eq!(registry.specs().len(), 3);
        assert_eq!(registry.specs()[0].parameters["required"], json!(["ticker", "period"]));
    }

    #[test]
    fn test_catalog_rendering_is_stable() {
        let first = registry().render_catalog();
        let second = registry().render_catalog();
        assert_eq!(first, second);

        let lines: Vec<&str> = first.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("- get_income_statements: "));
        assert!(lines[2].starts_with("- get_cash_flow_statements: "));

        // rendering twice from the same registry gives the same block
        let registry = registry();
        assert_eq!(registry.render_catalog(), registry.render_catalog());
    }

    #[test]
    fn test_resolve_unknown_tool() {
        let registry = registry();
        assert!(registry.resolve("get_income_statements").is_ok());
        let err = registry.resolve("get_stock_prices").err().unwrap();
        assert!(matches!(err, AgentError::ToolNotFound(name) if name == "get_stock_prices"));
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StaticTool::new("a", json!(1))));
        registry.register(Arc::new(StaticTool::new("b", json!(2))));
        registry.register(Arc::new(StaticTool::new("a", json!(3))));

        assert_eq!(registry.list(), vec!["a", "b"]);
        assert_eq!(registry.len(), 2);
    }
}
