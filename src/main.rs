use std::sync::Arc;

use tracing::{error, info};

use chatrelay::{ChatRelay, ChatServer, Config};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    // Load configuration
    let mut config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    if let Err(e) = config.apply_env_overrides() {
        eprintln!("{e}; keeping port {}", config.server.port);
    }

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = chatrelay::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        chatrelay::logging::init_console_only(&config.logging.level);
    }

    info!("chatrelay - room-based chat relay");

    let relay = Arc::new(ChatRelay::from_config(&config.chat));
    let server = match ChatServer::new(&config.server, &config.web, relay) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
