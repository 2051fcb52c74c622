use std::net::TcpListener;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use tabular_serve::api::server;
use tabular_serve::config::ServeConfig;
use tabular_serve::ModelRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServeConfig::parse();
    env_logger::init_from_env(Env::default().default_filter_or(config.log_level.as_str()));

    let registry = ModelRegistry::load_default(&config.models_dir);
    if registry.is_empty() {
        warn!(
            "No models loaded from {}; /predict will answer 500",
            config.models_dir.display()
        );
    } else {
        info!("Serving models: {}", registry.loaded_names().join(", "));
    }

    let address = config.bind_address();
    let listener =
        TcpListener::bind(&address).with_context(|| format!("cannot bind {address}"))?;
    info!("Listening on http://{}", address);

    server::run(listener, registry, &config)?.await?;
    Ok(())
}
