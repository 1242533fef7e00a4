use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use server::{RsaTokenVerifier, TokenVerifier};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budgetbuddy={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = sea_orm::Database::connect(settings.server.database_url()).await?;
    Migrator::up(&db, None).await?;

    let engine = engine::Engine::builder().database(db).build().await?;
    let verifier: Arc<dyn TokenVerifier> = Arc::new(RsaTokenVerifier::from_rsa_pem(
        settings.server.provider_public_key.as_bytes(),
    )?);

    let bind = settings
        .server
        .bind
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    server::run_with_listener(engine, verifier, listener).await?;

    Ok(())
}
