use crate::entities::{TransactionKind, coin_transaction_entity as txns};
use crate::error::AppResult;
use crate::models::{
    PaginatedResponse, PaginationParams, TransactionHistoryQuery, TransactionPageResponse,
    TransactionResponse,
};
use chrono::Utc;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// 只追加的金币账本。余额永远是 SUM(amount) 的推导值；
/// 任何冲正都以新行 (refund) 表达, 不改写历史。
#[derive(Clone)]
pub struct LedgerService {
    pool: DatabaseConnection,
}

impl LedgerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 追加一条交易。金额符号由调用方按 kind 约定给定, 这里不做推断。
    pub async fn append(
        &self,
        user_id: i64,
        kind: TransactionKind,
        category: &str,
        amount: i64,
        description: Option<String>,
        metadata: Option<serde_json::Value>,
        reference: Option<(i64, &str)>,
    ) -> AppResult<txns::Model> {
        self.append_with(
            &self.pool,
            user_id,
            kind,
            category,
            amount,
            description,
            metadata,
            reference,
        )
        .await
    }

    /// 同 `append`, 但在调用方提供的事务/连接上执行,
    /// 供需要把多笔写入放进同一个工作单元的服务使用。
    #[allow(clippy::too_many_arguments)]
    pub async fn append_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        kind: TransactionKind,
        category: &str,
        amount: i64,
        description: Option<String>,
        metadata: Option<serde_json::Value>,
        reference: Option<(i64, &str)>,
    ) -> AppResult<txns::Model> {
        let (reference_id, reference_type) = match reference {
            Some((id, kind)) => (Some(id), Some(kind.to_string())),
            None => (None, None),
        };

        let model = txns::ActiveModel {
            user_id: Set(user_id),
            kind: Set(kind),
            category: Set(category.to_string()),
            amount: Set(amount),
            description: Set(description),
            metadata: Set(metadata),
            reference_id: Set(reference_id),
            reference_type: Set(reference_type),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        Ok(model)
    }

    /// 当前余额 = 该用户全部交易金额之和（单条 SQL, 一次一致读取）
    pub async fn balance(&self, user_id: i64) -> AppResult<i64> {
        self.balance_with(&self.pool, user_id).await
    }

    pub async fn balance_with<C: ConnectionTrait>(&self, conn: &C, user_id: i64) -> AppResult<i64> {
        // SUM 在 Postgres 下返回 NUMERIC, 显式转回 BIGINT
        let sum: Option<Option<i64>> = txns::Entity::find()
            .select_only()
            .column_as(
                Expr::col(txns::Column::Amount)
                    .sum()
                    .cast_as(Alias::new("BIGINT")),
                "balance",
            )
            .filter(txns::Column::UserId.eq(user_id))
            .into_tuple()
            .one(conn)
            .await?;

        Ok(sum.flatten().unwrap_or(0))
    }

    /// 账本明细（新的在前, 按主键倒序保证分页可重入）
    pub async fn history(
        &self,
        user_id: i64,
        query: &TransactionHistoryQuery,
    ) -> AppResult<TransactionPageResponse> {
        let params = PaginationParams::new(query.page, query.per_page);
        let offset = params.get_offset();
        let limit = params.get_limit();

        let mut base = txns::Entity::find().filter(txns::Column::UserId.eq(user_id));
        if let Some(kind) = &query.kind {
            base = base.filter(txns::Column::Kind.eq(kind.clone()));
        }
        if let Some(category) = &query.category {
            base = base.filter(txns::Column::Category.eq(category.clone()));
        }

        let total = base.clone().count(&self.pool).await? as i64;

        let items_models = base
            .order_by_desc(txns::Column::Id)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<TransactionResponse> = items_models.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_page_size(),
            total,
        ))
    }
}
