use financial_research_agent::{
    agent::Agent,
    config::AgentConfig,
    llm::ModelGateway,
    presentation::{AgentObserver, ConsoleObserver},
    tools::{create_default_registry, FinancialDatasetsClient},
    RunOutcome,
};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Keep logs quiet so the rendered session stays readable; RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = AgentConfig::from_env();
    let gateway = Arc::new(ModelGateway::from_env());
    let tools = Arc::new(create_default_registry(FinancialDatasetsClient::from_env()));
    let console = Arc::new(ConsoleObserver::new());

    info!(model = %gateway.active_model().await, tools = tools.len(), "Research agent starting");

    let agent = Agent::new(gateway, tools, config).with_observer(console.clone());

    console.intro();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!(">> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query.to_lowercase().as_str(), "exit" | "quit") {
            println!("Goodbye!");
            break;
        }

        // The console observer already rendered answers and early stops.
        match agent.run(query).await {
            Ok(RunOutcome::Answered { .. }) => {}
            Ok(outcome) => info!(outcome = outcome.kind(), "Run stopped without an answer"),
            Err(e) => {
                error!(error = %e, "Run failed");
                console.error(&e.to_string());
            }
        }
    }

    Ok(())
}
