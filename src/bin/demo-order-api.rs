use clap::Parser;
use hyper::Server;
use std::net::SocketAddr;
use tracing::info;

use order_agent::constants::DEFAULT_DEMO_API_PORT;
use order_agent::demo_api::demo_router;
use order_agent::logging;

#[derive(Parser)]
#[command(name = "demo-order-api")]
#[command(about = "Serve sample free-text orders for local runs")]
struct Cli {
    #[arg(long, default_value_t = DEFAULT_DEMO_API_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    info!("Demo order API listening on http://localhost:{}/api/orders", cli.port);

    Server::bind(&addr)
        .serve(demo_router().into_make_service())
        .await?;
    Ok(())
}
