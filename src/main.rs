use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::error;

use order_agent::app::QueryUseCase;
use order_agent::config::Config;
use order_agent::constants::DEFAULT_SERVER_PORT;
use order_agent::infra::{OpenRouterNormalizer, ReqwestOrderSource};
use order_agent::logging;
use order_agent::server::{self, AppState};

#[derive(Parser)]
#[command(name = "order-agent")]
#[command(about = "Normalize free-text orders and answer keyword queries over them")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query and print the result as JSON
    Query {
        /// The query text; prompted for on stdin when omitted
        query: Option<String>,
    },
    /// Serve the pipeline over HTTP
    Serve {
        #[arg(long, default_value_t = DEFAULT_SERVER_PORT)]
        port: u16,
    },
    /// Print the raw text of a single order
    Order {
        order_id: String,
    },
}

fn build_use_case(config: &Config) -> QueryUseCase {
    let source = Arc::new(ReqwestOrderSource::new(&config.order_api));
    let primary = Arc::new(OpenRouterNormalizer::new(&config.llm));
    QueryUseCase::new(source, primary, config)
}

fn prompt_for_query() -> io::Result<String> {
    print!("Enter your query: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before logging so RUST_LOG can live there too
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    // Missing credentials stop the process here, before any request is served
    let config = Config::load()?;
    let use_case = build_use_case(&config);

    match cli.command {
        Commands::Query { query } => {
            let query = match query {
                Some(q) => q,
                None => prompt_for_query()?,
            };
            match use_case.run(Some(&query)).await {
                Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                Err(e) => {
                    error!("Query failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Serve { port } => {
            let state = AppState {
                use_case: Arc::new(use_case),
            };
            server::start_server(state, port).await?;
        }
        Commands::Order { order_id } => match use_case.find_raw_order(&order_id).await {
            Some(line) => println!("{}", line),
            None => println!("Order {} not found", order_id),
        },
    }

    Ok(())
}
