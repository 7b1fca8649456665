/*
 * Responsibility
 * - tokio runtime bootstrap
 * - app::run() call (no logic here)
 */
use anyhow::Result;

mod api;
mod app;
mod config;
mod error;
mod middleware;
mod services;
mod state;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await?;
    Ok(())
}
