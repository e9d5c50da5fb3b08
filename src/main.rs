#![allow(non_snake_case)]

use eventBot::cli;
use eventBot::config::AppConfig;
use eventBot::telemetry;
use tracing::error;

#[tokio::main]
async fn main() {
    telemetry::init_telemetry();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::cli(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
