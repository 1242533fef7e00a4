//! Standalone migration runner.
//!
//! `DATABASE_URL` selects the target database; the first argument picks the
//! action and defaults to `up`.

use sea_orm::Database;
use sea_orm_migration::prelude::*;

use migration::Migrator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cmd = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());

    let db_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:./finance.db?mode=rwc".to_string());
    let db = Database::connect(&db_url).await?;

    match cmd.as_str() {
        "up" => Migrator::up(&db, None).await?,
        "down" => Migrator::down(&db, None).await?,
        "fresh" => Migrator::fresh(&db).await?,
        "status" => Migrator::status(&db).await?,
        other => {
            eprintln!("unknown command '{other}'; expected up, down, fresh or status");
            std::process::exit(2);
        }
    }

    Ok(())
}
