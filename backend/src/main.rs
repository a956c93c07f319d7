//! # Backend Service
//!
//! Thin entry point that delegates to lib-web for server setup.

use lib_web::{init_tracing, start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing()?;

    start_server(ServerConfig::from_env()?).await
}
