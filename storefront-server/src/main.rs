use storefront_server::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, config, logging)
    let config = setup_environment();

    if !config.is_production() {
        print_banner();
    }
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        "🖨️ Storefront server starting..."
    );

    // 2. State (redb, uploads dir)
    let state = ServerState::initialize(&config)?;

    // 3. HTTP server until Ctrl+C / SIGTERM
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
