use clap::Parser;
use mcp_server::{ServerArgs, transport};
use weather::{Config, Result, SERVER_NAME, WeatherServer};

#[derive(Parser)]
#[command(name = "weather-mcp")]
#[command(about = "MCP server reporting current weather for a location", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,
}

#[tokio::main]
async fn main() {
    mcp_server::logging::init();

    if let Err(e) = run().await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config: Config = cli.server.load_config()?;
    cli.server.apply(&mut config.server);

    let client = config.client();
    transport::log_registered_tools(SERVER_NAME, &WeatherServer::new(client.clone()).tools());

    transport::listen("Weather", config.addr(), move || {
        Ok(WeatherServer::new(client.clone()))
    })
    .await?;
    Ok(())
}
