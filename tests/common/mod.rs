#![allow(dead_code)]

use coinwheel_backend::config::{EconomyConfig, StoreConfig};
use coinwheel_backend::services::{
    BalanceService, EntitlementService, LedgerService, PurchaseService, RewardService,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// In-memory SQLite with the real migrations applied. A single pooled
/// connection keeps every task on the same database file.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub struct TestStack {
    pub db: DatabaseConnection,
    pub ledger: LedgerService,
    pub balance: BalanceService,
    pub entitlements: EntitlementService,
    pub rewards: RewardService,
    pub purchases: PurchaseService,
}

pub async fn stack() -> TestStack {
    stack_with(EconomyConfig::default(), StoreConfig::default()).await
}

pub async fn stack_with(economy: EconomyConfig, store: StoreConfig) -> TestStack {
    let db = setup_db().await;
    let ledger = LedgerService::new(db.clone());
    let balance = BalanceService::new(db.clone(), ledger.clone());
    let entitlements = EntitlementService::new(db.clone());
    let rewards = RewardService::new(
        db.clone(),
        balance.clone(),
        entitlements.clone(),
        &economy,
    )
    .expect("valid prize table");
    let purchases = PurchaseService::new(
        db.clone(),
        balance.clone(),
        entitlements.clone(),
        economy,
        store,
    );
    TestStack {
        db,
        ledger,
        balance,
        entitlements,
        rewards,
        purchases,
    }
}
