use financial_research_agent::{
    api::{start_server, ApiState},
    config::AgentConfig,
    llm::ModelGateway,
    tools::{create_default_registry, FinancialDatasetsClient},
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if std::env::var("OPENAI_API_KEY").is_err() {
        warn!("OPENAI_API_KEY not set; configure it through POST /api/settings");
    }
    if std::env::var("FINANCIAL_DATASETS_API_KEY").is_err() {
        warn!("FINANCIAL_DATASETS_API_KEY not set; financial tools will be rejected upstream");
    }

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    let state = ApiState {
        gateway: Arc::new(ModelGateway::from_env()),
        tools: Arc::new(create_default_registry(FinancialDatasetsClient::from_env())),
        config: AgentConfig::from_env(),
    };

    info!(
        port = api_port,
        model = %state.gateway.active_model().await,
        tools = state.tools.len(),
        "Financial research agent API starting"
    );

    start_server(state, api_port).await?;

    Ok(())
}
