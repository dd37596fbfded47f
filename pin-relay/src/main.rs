/// Flower Pin Relay
///
/// Standalone upload endpoint for the flower claim page.

use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;

use pin_relay::pinata::DEFAULT_PINATA_API_URL;
use pin_relay::{run_server, PinataClient, RegistryStore, RelayState};

struct Config {
    // Pinata
    pinata_jwt: String,
    pinata_api_url: String,

    // Registry
    registry_path: String,
    upload_token: Option<String>,

    // Server
    server_host: String,
    server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("pinata_jwt", &"<redacted>")
            .field("pinata_api_url", &self.pinata_api_url)
            .field("registry_path", &self.registry_path)
            .field("upload_token", &self.upload_token.as_ref().map(|_| "<redacted>"))
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let pinata_jwt = env::var("PINATA_JWT")
            .context("PINATA_JWT environment variable not set")?;

        let pinata_api_url = env::var("PINATA_API_URL")
            .unwrap_or_else(|_| DEFAULT_PINATA_API_URL.to_string());

        let registry_path = env::var("REGISTRY_PATH")
            .unwrap_or_else(|_| "./flower-cids.json".to_string());

        let upload_token = env::var("UPLOAD_TOKEN").ok().filter(|t| !t.is_empty());

        let server_host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()
            .context("Invalid SERVER_PORT")?;

        Ok(Self {
            pinata_jwt,
            pinata_api_url,
            registry_path,
            upload_token,
            server_host,
            server_port,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    log::info!("Starting flower pin relay...");

    // Load configuration
    let config = Config::from_env()
        .context("Failed to load configuration")?;
    log::debug!("{:?}", config);

    if config.upload_token.is_none() {
        log::warn!("⚠️  UPLOAD_TOKEN not set: any client can upload");
    }
    log::info!("Server will listen on {}:{}", config.server_host, config.server_port);

    let store = RegistryStore::open(&config.registry_path)
        .await
        .context("Failed to open registry")?;

    let state = Arc::new(RelayState {
        pinner: PinataClient::new(
            reqwest::Client::new(),
            config.pinata_api_url,
            config.pinata_jwt,
        ),
        store,
        upload_token: config.upload_token,
    });

    // Run server
    run_server(state, config.server_host, config.server_port)
        .await
        .context("Server error")?;

    Ok(())
}
