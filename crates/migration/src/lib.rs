pub use sea_orm_migration::prelude::*;

mod m20260115_000001_users;
mod m20260115_000002_accounts;
mod m20260115_000003_categories;
mod m20260115_000004_transactions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260115_000001_users::Migration),
            Box::new(m20260115_000002_accounts::Migration),
            Box::new(m20260115_000003_categories::Migration),
            Box::new(m20260115_000004_transactions::Migration),
        ]
    }
}
