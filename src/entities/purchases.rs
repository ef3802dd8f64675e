use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 购买流程状态机:
/// debited -> recorded -> artifact_generated -> completed
/// 任一中间步骤不可恢复地失败时转为 failed, 并对扣款做一笔 refund 冲正。
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(24))")]
#[serde(rename_all = "snake_case")]
pub enum PurchaseState {
    #[sea_orm(string_value = "debited")]
    Debited,
    #[sea_orm(string_value = "recorded")]
    Recorded,
    #[sea_orm(string_value = "artifact_generated")]
    ArtifactGenerated,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl std::fmt::Display for PurchaseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseState::Debited => write!(f, "debited"),
            PurchaseState::Recorded => write!(f, "recorded"),
            PurchaseState::ArtifactGenerated => write!(f, "artifact_generated"),
            PurchaseState::Completed => write!(f, "completed"),
            PurchaseState::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub item_key: String,
    /// 扣款金额（金币, 正数）
    pub amount: i64,
    pub state: PurchaseState,
    /// 对外展示与日志关联用的购买编号
    pub reference_code: String,
    pub artifact_code: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
