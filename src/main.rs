//! Nutrilog
//!
//! An MCP server for food and calorie logging.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nutrilog::build_info;
use nutrilog::config::Config;
use nutrilog::mcp::NutrilogService;
use nutrilog::session::{lock_session, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the MCP stream
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrilog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    eprintln!("Data directory: {}", config.data_dir().display());
    eprintln!("Calorie method: {}", config.calorie_method.display_name());

    let session = Session::load(config);
    let service = NutrilogService::new(session);
    let session = service.session_handle();

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    let outcome = server.waiting().await;

    // Flush everything before exit, even if the transport failed
    for result in lock_session(&session).save_all() {
        match result.error {
            Some(e) => error!(path = %result.path, error = %e, "could not save on shutdown"),
            None => info!(path = %result.path, "saved on shutdown"),
        }
    }

    outcome?;
    Ok(())
}
