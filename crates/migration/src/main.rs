//! Apply or roll back the finance tracker schema of a `daily_apps` SQLite
//! database, outside of the server start-up.

use clap::{Parser, Subcommand};
use sea_orm::Database;
use sea_orm_migration::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "daily_apps_migrate")]
#[command(about = "Manage the schema of the daily_apps ledger database")]
struct Cli {
    /// SQLite file of the ledgers, the same path as `[server.database] sqlite`
    /// in the app settings.
    #[arg(
        long,
        env = "DAILY_APPS__SERVER__DATABASE__SQLITE",
        default_value = "daily_apps.db"
    )]
    sqlite: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Apply every pending migration
    Up,
    /// Roll back every applied migration
    Down,
    /// Drop all tables and migrate again
    Fresh,
    /// List applied and pending migrations
    Status,
}

impl Cli {
    fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.sqlite)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = Database::connect(cli.database_url()).await?;

    match cli.command.unwrap_or(Command::Up) {
        Command::Up => migration::Migrator::up(&db, None).await?,
        Command::Down => migration::Migrator::down(&db, None).await?,
        Command::Fresh => migration::Migrator::fresh(&db).await?,
        Command::Status => migration::Migrator::status(&db).await?,
    }

    Ok(())
}
