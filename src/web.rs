#![cfg(not(tarpaulin_include))]

use safari_serials::app::{self, ServerConfig};
use std::env;

/// Main entry point for the report web front
///
/// Serves the order form and the report download endpoint.
///
/// # Arguments
/// * `[addr]` - Address to listen on (default `127.0.0.1:3000`)
/// * `[logo_path]` - Image shown in the report's branding block
/// * `[config_json]` - Report config overriding the default texts and widths
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = ServerConfig::from_args(&args)?;

    app::run(config).await
}
