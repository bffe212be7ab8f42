mod config;
mod http;

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, connect};
use platform_obs::{ObsConfig, init_tracing};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "retail-admin", version, about = "Multi-store retail admin server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
    /// Drop all tables and types, then re-apply every migration.
    Fresh,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(cmd) => run_server(cmd).await,
        Command::Migrate(action) => run_migrate(action).await,
    }
}

async fn setup_pool() -> Result<DbPool> {
    let settings = DatabaseSettings::from_env()?;
    connect(&settings).await.map_err(Into::into)
}

async fn run_server(cmd: ServeCommand) -> Result<()> {
    let pool = setup_pool().await?;
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    let config = Arc::new(AppConfig::load()?);
    let cookie_key = config.cookie_key.clone();
    let state = AppState {
        pool,
        config,
        cookie_key,
    };
    http::serve((&cmd).into(), state).await
}

/// Schema bootstrap is awaited here, before the listener binds, so no request
/// can race table creation.
async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if pending.is_empty() {
        return Ok(());
    }
    if allow_dirty {
        warn!(count = pending.len(), "starting with pending migrations");
        return Ok(());
    }
    info!(count = pending.len(), "applying pending migrations");
    Migrator::up(pool, None).await?;
    Ok(())
}

async fn run_migrate(action: MigrateCommand) -> Result<()> {
    let pool = setup_pool().await?;
    match action {
        MigrateCommand::Up => Migrator::up(&pool, None).await?,
        MigrateCommand::Down => Migrator::down(&pool, Some(1)).await?,
        MigrateCommand::Fresh => Migrator::fresh(&pool).await?,
    }
    info!("migration command completed");
    Ok(())
}
