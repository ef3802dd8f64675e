pub use sea_orm_migration::prelude::*;

mod m20250902_000001_create_coin_transactions;
mod m20250902_000002_create_entitlement_packs;
mod m20250902_000003_create_store_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250902_000001_create_coin_transactions::Migration),
            Box::new(m20250902_000002_create_entitlement_packs::Migration),
            Box::new(m20250902_000003_create_store_tables::Migration),
        ]
    }
}
