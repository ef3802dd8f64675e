use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{TransactionKind, coin_transaction_entity as txn_entity};

use super::PaginatedResponse;

/// 钱包余额响应（余额由账本求和推导, 不做缓存）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub user_id: i64,
    pub balance: i64,
}

/// 账本明细查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TransactionHistoryQuery {
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20)
    pub per_page: Option<u32>,
    /// 按交易类型过滤 (earning/spending/refund/bonus)
    pub kind: Option<TransactionKind>,
    /// 按活动标签过滤 (如 "spinning")
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i64,
    pub kind: TransactionKind,
    pub category: String,
    /// 有符号金额（支出为负）
    pub amount: i64,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
    pub reference_id: Option<i64>,
    pub reference_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<txn_entity::Model> for TransactionResponse {
    fn from(m: txn_entity::Model) -> Self {
        TransactionResponse {
            id: m.id,
            kind: m.kind,
            category: m.category,
            amount: m.amount,
            description: m.description,
            metadata: m.metadata,
            reference_id: m.reference_id,
            reference_type: m.reference_type,
            created_at: m.created_at,
        }
    }
}

/// 账本明细分页响应
pub type TransactionPageResponse = PaginatedResponse<TransactionResponse>;
