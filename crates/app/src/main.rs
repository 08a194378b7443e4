use engine::{Engine, MemoryStore};
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "daily_apps={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let Some(server) = settings.server else {
        tracing::warn!("no [server] settings found, nothing to run");
        return Ok(());
    };

    tracing::info!("Found server settings...");
    let bind = server.bind.as_deref().unwrap_or("127.0.0.1");
    let addr = format!("{}:{}", bind, server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    match &server.database {
        Database::Memory => {
            tracing::info!("ledgers are kept in memory and lost on exit");
            let engine = Engine::builder()
                .store(MemoryStore::new())
                .store_timeout(server.store_timeout())
                .build()?;
            server::run_with_listener(engine, listener).await?;
        }
        Database::Sqlite(path) => {
            let db = connect_sqlite(path).await?;
            let engine = Engine::builder()
                .database(db)
                .store_timeout(server.store_timeout())
                .build()?;
            server::run_with_listener(engine, listener).await?;
        }
    }

    Ok(())
}

async fn connect_sqlite(path: &str) -> Result<sea_orm::DatabaseConnection, BoxError> {
    let database = sea_orm::Database::connect(format!("sqlite:{}?mode=rwc", path)).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
