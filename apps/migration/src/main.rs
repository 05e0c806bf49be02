//! Migration CLI tool. Reads `DATABASE_URL` from the environment or `.env`.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    tracing::info!("Running Quill schema migrations");
    cli::run_cli(migration::Migrator).await;
}
