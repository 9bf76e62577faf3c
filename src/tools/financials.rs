//! Financial statement tools backed by the Financial Datasets REST API

use crate::error::AgentError;
use crate::models::StatementQuery;
use crate::tools::Tool;
use crate::Result;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::env;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.financialdatasets.ai";

#[derive(Clone)]
pub struct FinancialDatasetsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FinancialDatasetsClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: build_http_client(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// A missing key is not fatal here; the API rejects the request instead and
    /// that failure lands in the transcript like any other tool error.
    pub fn from_env() -> Self {
        let api_key = env::var("FINANCIAL_DATASETS_API_KEY").unwrap_or_default();
        let base_url = env::var("FINANCIAL_DATASETS_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self::new(api_key, base_url)
    }

    /// GET `{base}{path}` with the API-key header; non-2xx is an error.
    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(url)
            .header("x-api-key", &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::ToolError(format!(
                "Financial API returned {} for {}: {}",
                status, path, body
            )));
        }

        Ok(response.json::<Value>().await?)
    }
}

fn build_http_client() -> Client {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(60))
        .pool_max_idle_per_host(8)
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    IncomeStatements,
    BalanceSheets,
    CashFlowStatements,
}

impl StatementKind {
    pub const ALL: [StatementKind; 3] = [
        StatementKind::IncomeStatements,
        StatementKind::BalanceSheets,
        StatementKind::CashFlowStatements,
    ];

    pub fn tool_name(&self) -> &'static str {
        match self {
            StatementKind::IncomeStatements => "get_income_statements",
            StatementKind::BalanceSheets => "get_balance_sheets",
            StatementKind::CashFlowStatements => "get_cash_flow_statements",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StatementKind::IncomeStatements => "Fetches a company's income statement, detailing its revenues, expenses, and net income over a reporting period. Useful for evaluating a company's profitability and operational efficiency.",
            StatementKind::BalanceSheets => "Retrieves a company's balance sheet, which provides a snapshot of its assets, liabilities, and shareholders' equity at a specific point in time. Essential for assessing a company's financial position.",
            StatementKind::CashFlowStatements => "Provides a company's cash flow statement, showing how cash is generated and used across operating, investing, and financing activities. Key for understanding a company's liquidity and solvency.",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            StatementKind::IncomeStatements => "/financials/income-statements/",
            StatementKind::BalanceSheets => "/financials/balance-sheets/",
            StatementKind::CashFlowStatements => "/financials/cash-flow-statements/",
        }
    }

    /// Key of the sub-object the tool returns from the response body.
    pub fn response_key(&self) -> &'static str {
        match self {
            StatementKind::IncomeStatements => "income_statements",
            StatementKind::BalanceSheets => "balance_sheets",
            StatementKind::CashFlowStatements => "cash_flow_statements",
        }
    }
}

fn statement_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "ticker": {
                "type": "string",
                "description": "The stock ticker symbol to fetch financial statements for. For example, 'AAPL' for Apple."
            },
            "period": {
                "type": "string",
                "enum": ["annual", "quarterly", "ttm"],
                "description": "The reporting period for the financial statements. 'annual' for yearly, 'quarterly' for quarterly, and 'ttm' for trailing twelve months."
            },
            "limit": {
                "type": "integer",
                "default": 10,
                "description": "The number of past financial statements to retrieve."
            },
            "report_period_gt": {
                "type": "string",
                "description": "Optional filter to retrieve financial statements greater than the specified report period."
            },
            "report_period_gte": {
                "type": "string",
                "description": "Optional filter to retrieve financial statements greater than or equal to the specified report period."
            },
            "report_period_lt": {
                "type": "string",
                "description": "Optional filter to retrieve financial statements less than the specified report period."
            },
            "report_period_lte": {
                "type": "string",
                "description": "Optional filter to retrieve financial statements less than or equal to the specified report period."
            }
        },
        "required": ["ticker", "period"]
    })
}

pub struct FinancialStatementTool {
    kind: StatementKind,
    api: std::sync::Arc<FinancialDatasetsClient>,
}

impl FinancialStatementTool {
    pub fn new(kind: StatementKind, api: std::sync::Arc<FinancialDatasetsClient>) -> Self {
        Self { kind, api }
    }
}

#[async_trait::async_trait]
impl Tool for FinancialStatementTool {
    fn name(&self) -> &'static str {
        self.kind.tool_name()
    }

    fn description(&self) -> &'static str {
        self.kind.description()
    }

    fn parameters(&self) -> Value {
        statement_parameters()
    }

    async fn execute(&self, args: &Value) -> Result<Value> {
        let query: StatementQuery = serde_json::from_value(args.clone()).map_err(|e| {
            AgentError::InvalidToolInput(format!("{}: {}", self.kind.tool_name(), e))
        })?;

        debug!(tool_name = self.kind.tool_name(), ticker = %query.ticker, period = %query.period, "Fetching statements");

        let body = self
            .api
            .get_json(self.kind.endpoint(), &query.query_pairs())
            .await?;

        Ok(body
            .get(self.kind.response_key())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool(kind: StatementKind, server: &MockServer) -> FinancialStatementTool {
        let api = FinancialDatasetsClient::new("fd-key".into(), server.uri());
        FinancialStatementTool::new(kind, Arc::new(api))
    }

    #[tokio::test]
    async fn test_income_statements_returns_named_sub_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/financials/income-statements/"))
            .and(header("x-api-key", "fd-key"))
            .and(query_param("ticker", "AAPL"))
            .and(query_param("period", "quarterly"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "income_statements": [{ "ticker": "AAPL", "revenue": 94800000000u64 }]
            })))
            .mount(&server)
            .await;

        let output = tool(StatementKind::IncomeStatements, &server)
            .execute(&json!({"ticker": "AAPL", "period": "quarterly", "limit": 1}))
            .await
            .unwrap();

        assert_eq!(output[0]["revenue"], json!(94800000000u64));
    }

    #[tokio::test]
    async fn test_missing_key_yields_empty_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/financials/balance-sheets/"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"other": []})))
            .mount(&server)
            .await;

        let output = tool(StatementKind::BalanceSheets, &server)
            .execute(&json!({"ticker": "MSFT", "period": "annual"}))
            .await
            .unwrap();

        assert_eq!(output, json!({}));
    }

    #[tokio::test]
    async fn test_http_failure_is_tool_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let result = tool(StatementKind::CashFlowStatements, &server)
            .execute(&json!({"ticker": "AAPL", "period": "ttm"}))
            .await;

        match result {
            Err(AgentError::ToolError(message)) => assert!(message.contains("401")),
            other => panic!("expected tool error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = tool(StatementKind::IncomeStatements, &server)
            .execute(&json!({"ticker": "AAPL", "period": "annual"}))
            .await;

        assert!(matches!(result, Err(AgentError::HttpError(_))));
    }

    #[tokio::test]
    async fn test_invalid_args_rejected_before_request() {
        let server = MockServer::start().await;
        let result = tool(StatementKind::IncomeStatements, &server)
            .execute(&json!({"ticker": "AAPL", "period": "weekly"}))
            .await;

        assert!(matches!(result, Err(AgentError::InvalidToolInput(_))));
    }
}
