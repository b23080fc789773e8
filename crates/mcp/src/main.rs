use anyhow::Result;
use clap::Parser;
use std::io;
use std::process;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crucible_client::HttpClient;
use crucible_mcp::config::Config;
use crucible_mcp::dispatch::Dispatcher;
use crucible_mcp::server::McpServer;

/// Serve the Crucible API as MCP tools over stdio
#[derive(Parser)]
#[command(name = "crucible-mcp")]
#[command(version)]
struct Cli {
    #[arg(long, env = "CRUCIBLE_API_URL", help = "Base URL of the Crucible API")]
    api_url: Option<String>,
    #[arg(long, env = "CRUCIBLE_API_KEY", hide_env_values = true, help = "Crucible API key")]
    api_key: Option<String>,
    #[arg(
        long,
        env = "CRUCIBLE_MCP_LOG",
        default_value = "warn",
        help = "Log filter written to stderr, e.g. debug or crucible_mcp=trace"
    )]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries protocol frames, so logs go to stderr.
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = match Config::resolve(cli.api_url, cli.api_key) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    info!(api_url = %config.api_url, "starting crucible MCP server");
    let client = HttpClient::new(config.api_url, config.api_key);
    let mut server = McpServer::new(Dispatcher::new(Arc::new(client)));

    let stdin = io::stdin();
    let stdout = io::stdout();
    server.serve(stdin.lock(), stdout.lock())?;

    Ok(())
}
