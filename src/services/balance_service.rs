use crate::entities::{TransactionKind, coin_transaction_entity as txns};
use crate::error::{AppError, AppResult};
use crate::services::LedgerService;
use crate::utils::UserLocks;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

/// 账本之上的原子记账操作。
///
/// 扣款的 "算余额 -> 校验 -> 追加" 序列必须对同一用户的并发请求
/// 串行执行（双击 spin、重复提交购买是主要的竞态来源）, 这里用
/// 进程内按用户的互斥锁 + 数据库事务实现；不同用户完全并行。
#[derive(Clone)]
pub struct BalanceService {
    pool: DatabaseConnection,
    ledger: LedgerService,
    locks: UserLocks,
}

impl BalanceService {
    pub fn new(pool: DatabaseConnection, ledger: LedgerService) -> Self {
        Self {
            pool,
            ledger,
            locks: UserLocks::new(),
        }
    }

    pub fn ledger(&self) -> &LedgerService {
        &self.ledger
    }

    /// 只读余额（给仪表盘/排行榜等展示方用）
    pub async fn get_balance(&self, user_id: i64) -> AppResult<i64> {
        self.ledger.balance(user_id).await
    }

    /// 入账 (kind = earning)。amount 必须为正。
    pub async fn credit(
        &self,
        user_id: i64,
        amount: i64,
        category: &str,
        description: Option<String>,
        metadata: Option<serde_json::Value>,
        reference: Option<(i64, &str)>,
    ) -> AppResult<txns::Model> {
        self.credit_with(
            &self.pool,
            user_id,
            amount,
            category,
            description,
            metadata,
            reference,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn credit_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        amount: i64,
        category: &str,
        description: Option<String>,
        metadata: Option<serde_json::Value>,
        reference: Option<(i64, &str)>,
    ) -> AppResult<txns::Model> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(format!(
                "credit amount must be positive, got {amount}"
            )));
        }
        self.ledger
            .append_with(
                conn,
                user_id,
                TransactionKind::Earning,
                category,
                amount,
                description,
                metadata,
                reference,
            )
            .await
    }

    /// 系统赠送 (kind = bonus)。保底转盘奖励、当日首次加成走这里。
    #[allow(clippy::too_many_arguments)]
    pub async fn bonus_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        amount: i64,
        category: &str,
        description: Option<String>,
        metadata: Option<serde_json::Value>,
        reference: Option<(i64, &str)>,
    ) -> AppResult<txns::Model> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(format!(
                "bonus amount must be positive, got {amount}"
            )));
        }
        self.ledger
            .append_with(
                conn,
                user_id,
                TransactionKind::Bonus,
                category,
                amount,
                description,
                metadata,
                reference,
            )
            .await
    }

    pub async fn bonus(
        &self,
        user_id: i64,
        amount: i64,
        category: &str,
        description: Option<String>,
        metadata: Option<serde_json::Value>,
        reference: Option<(i64, &str)>,
    ) -> AppResult<txns::Model> {
        self.bonus_with(
            &self.pool,
            user_id,
            amount,
            category,
            description,
            metadata,
            reference,
        )
        .await
    }

    /// 用户主动消费。余额不足返回 InsufficientFunds, 不产生任何写入。
    pub async fn debit(
        &self,
        user_id: i64,
        amount: i64,
        category: &str,
        description: Option<String>,
        metadata: Option<serde_json::Value>,
        reference: Option<(i64, &str)>,
    ) -> AppResult<txns::Model> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(format!(
                "debit amount must be positive, got {amount}"
            )));
        }

        let lock = self.locks.lock_for(user_id).await;
        let _guard = lock.lock().await;

        let txn = self.pool.begin().await?;

        let balance = self.ledger.balance_with(&txn, user_id).await?;
        if balance < amount {
            return Err(AppError::InsufficientFunds {
                balance,
                requested: amount,
            });
        }

        let model = self
            .ledger
            .append_with(
                &txn,
                user_id,
                TransactionKind::Spending,
                category,
                -amount,
                description,
                metadata,
                reference,
            )
            .await?;

        txn.commit().await?;
        Ok(model)
    }

    /// 冲正 (kind = refund)。只要存储可用就一定成功；
    /// 专供购买补偿流程使用。
    pub async fn refund(
        &self,
        user_id: i64,
        amount: i64,
        category: &str,
        description: Option<String>,
        metadata: Option<serde_json::Value>,
        reference: Option<(i64, &str)>,
    ) -> AppResult<txns::Model> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(format!(
                "refund amount must be positive, got {amount}"
            )));
        }
        self.ledger
            .append(
                user_id,
                TransactionKind::Refund,
                category,
                amount,
                description,
                metadata,
                reference,
            )
            .await
    }

    /// 既定游戏结果的有符号调整。负数直接按 spending 入账,
    /// 不做余额充足性校验（不是用户主动消费）；0 不落账。
    #[allow(clippy::too_many_arguments)]
    pub async fn adjust_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        delta: i64,
        category: &str,
        description: Option<String>,
        metadata: Option<serde_json::Value>,
        reference: Option<(i64, &str)>,
    ) -> AppResult<Option<txns::Model>> {
        if delta == 0 {
            return Ok(None);
        }
        let kind = if delta > 0 {
            TransactionKind::Earning
        } else {
            TransactionKind::Spending
        };
        let model = self
            .ledger
            .append_with(
                conn, user_id, kind, category, delta, description, metadata, reference,
            )
            .await?;
        Ok(Some(model))
    }
}
