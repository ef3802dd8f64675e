use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 交易类型。正负号约定:
/// - earning / bonus / refund 存正数
/// - spending 存负数
/// 余额 = SUM(amount)，不允许更新或删除任何一行。
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    #[sea_orm(string_value = "earning")]
    Earning,
    #[sea_orm(string_value = "spending")]
    Spending,
    #[sea_orm(string_value = "refund")]
    Refund,
    #[sea_orm(string_value = "bonus")]
    Bonus,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Earning => write!(f, "earning"),
            TransactionKind::Spending => write!(f, "spending"),
            TransactionKind::Refund => write!(f, "refund"),
            TransactionKind::Bonus => write!(f, "bonus"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "coin_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub kind: TransactionKind,
    /// 业务活动标签, 如 "spinning" / "voting" / "qr_store_purchase"
    pub category: String,
    pub amount: i64,
    pub description: Option<String>,
    /// 审计展示用的不透明键值属性
    pub metadata: Option<Json>,
    pub reference_id: Option<i64>,
    pub reference_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
