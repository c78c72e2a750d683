use engine::CharityRegistry;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "prizecash={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let min_cash_donation = settings.min_cash_donation()?;
    let charities = CharityRegistry::new(settings.charities)?;
    if charities.is_empty() {
        tracing::warn!("no charities configured: every donation will be rejected");
    }

    let db = parse_database(&settings.server.database).await?;

    let mut builder = engine::Engine::builder()
        .database(db.clone())
        .charities(charities);
    if let Some(amount) = min_cash_donation {
        builder = builder.min_cash_donation(amount);
    }
    let engine = builder.build().await?;
    tracing::info!(
        charities = engine.charities().len(),
        min_cash_donation = %engine.min_cash_donation(),
        "engine ready"
    );

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, db, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
