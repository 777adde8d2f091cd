use clap::Parser;
use gemini::{Config, GeminiServer, Result, SERVER_NAME};
use mcp_server::{ServerArgs, transport};

#[derive(Parser)]
#[command(name = "gemini-mcp")]
#[command(about = "MCP server proxying prompts to the gemini CLI", long_about = None)]
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

    let gemini = config.cli();
    transport::log_registered_tools(SERVER_NAME, &GeminiServer::new(gemini.clone()).tools());

    transport::listen("Gemini", config.addr(), move || {
        Ok(GeminiServer::new(gemini.clone()))
    })
    .await?;
    Ok(())
}
