use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// One-time unlocks won on the prize wheel (cosmetic items).
/// (user_id, unlock_key) is unique; granting twice is a no-op.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "unlocks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub unlock_key: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
