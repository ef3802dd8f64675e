use crate::entities::{
    ActivityAction, PackStatus, PackType, activity_event_entity as events,
    entitlement_pack_entity as packs,
};
use crate::error::{AppError, AppResult};
use crate::models::{PackResponse, QuotaResponse};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

/// 每个动作每天的基础免费次数
pub const BASE_DAILY_ALLOWANCE: i64 = 1;

/// 加次卡的发放、过期与当日配额计算。
///
/// 规则:
/// - 配额 = 1 (基础) + 最早一张仍有效卡的 units_per_day（先进先出, 不叠加）
/// - units_per_day 以自然日为口径；当日已用 = 当日 0 点以来的动作记录数
/// - 卡过了有效期惰性转为 expired；最后一天额度用尽且窗口结束则转 used
#[derive(Clone)]
pub struct EntitlementService {
    pool: DatabaseConnection,
}

impl EntitlementService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    fn action_for(pack_type: PackType) -> ActivityAction {
        match pack_type {
            PackType::Spin => ActivityAction::Spin,
            PackType::Vote => ActivityAction::Vote,
        }
    }

    fn day_start(now: DateTime<Utc>) -> DateTime<Utc> {
        now.date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time")
            .and_utc()
    }

    /// 发一张卡。购买路径由 PurchaseService 负责先扣款再调用这里。
    pub async fn grant(
        &self,
        user_id: i64,
        pack_type: PackType,
        units_per_day: i64,
        duration_days: i64,
    ) -> AppResult<packs::Model> {
        self.grant_with(&self.pool, user_id, pack_type, units_per_day, duration_days)
            .await
    }

    pub async fn grant_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        pack_type: PackType,
        units_per_day: i64,
        duration_days: i64,
    ) -> AppResult<packs::Model> {
        if units_per_day <= 0 {
            return Err(AppError::ValidationError(
                "units_per_day must be positive".into(),
            ));
        }
        if duration_days <= 0 {
            return Err(AppError::ValidationError(
                "duration_days must be positive".into(),
            ));
        }

        let now = Utc::now();
        let model = packs::ActiveModel {
            user_id: Set(user_id),
            pack_type: Set(pack_type),
            units_per_day: Set(units_per_day),
            duration_days: Set(duration_days),
            granted_at: Set(now),
            expires_at: Set(now + Duration::days(duration_days)),
            status: Set(PackStatus::Active),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        Ok(model)
    }

    /// 最早一张仍有效的卡；顺带把已过期的卡惰性标记为 expired。
    async fn oldest_active_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        pack_type: PackType,
        now: DateTime<Utc>,
    ) -> AppResult<Option<packs::Model>> {
        let candidates = packs::Entity::find()
            .filter(packs::Column::UserId.eq(user_id))
            .filter(packs::Column::PackType.eq(pack_type))
            .filter(packs::Column::Status.eq(PackStatus::Active))
            .order_by_asc(packs::Column::GrantedAt)
            .order_by_asc(packs::Column::Id)
            .all(conn)
            .await?;

        for pack in candidates {
            if pack.is_expired(now) {
                self.transition(conn, pack, PackStatus::Expired).await?;
                continue;
            }
            return Ok(Some(pack));
        }
        Ok(None)
    }

    async fn transition<C: ConnectionTrait>(
        &self,
        conn: &C,
        pack: packs::Model,
        status: PackStatus,
    ) -> AppResult<()> {
        let mut am = pack.into_active_model();
        am.status = Set(status);
        am.updated_at = Set(Some(Utc::now()));
        am.update(conn).await?;
        Ok(())
    }

    /// 当日总配额（每次现算, 无缓存状态）
    pub async fn current_quota(&self, user_id: i64, pack_type: PackType) -> AppResult<i64> {
        let now = Utc::now();
        let pack = self
            .oldest_active_with(&self.pool, user_id, pack_type, now)
            .await?;
        Ok(BASE_DAILY_ALLOWANCE + pack.map(|p| p.units_per_day).unwrap_or(0))
    }

    /// 当日已用次数 = 自然日 0 点以来的动作记录数
    pub async fn used_today(&self, user_id: i64, action: ActivityAction) -> AppResult<i64> {
        self.used_today_with(&self.pool, user_id, action).await
    }

    pub async fn used_today_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        action: ActivityAction,
    ) -> AppResult<i64> {
        let since = Self::day_start(Utc::now());
        let count = events::Entity::find()
            .filter(events::Column::UserId.eq(user_id))
            .filter(events::Column::Action.eq(action))
            .filter(events::Column::CreatedAt.gte(since))
            .count(conn)
            .await?;
        Ok(count as i64)
    }

    /// 当日剩余次数。额度用尽且卡的窗口就在今天结束时,
    /// 把卡转成 used, 下次查询自然落到下一张最早的卡。
    pub async fn remaining_today(&self, user_id: i64, pack_type: PackType) -> AppResult<i64> {
        let now = Utc::now();
        let pack = self
            .oldest_active_with(&self.pool, user_id, pack_type, now)
            .await?;
        let quota = BASE_DAILY_ALLOWANCE + pack.as_ref().map(|p| p.units_per_day).unwrap_or(0);
        let used = self
            .used_today(user_id, Self::action_for(pack_type))
            .await?;
        let remaining = (quota - used).max(0);

        if remaining == 0
            && let Some(p) = pack
        {
            let day_end = Self::day_start(now) + Duration::days(1);
            if p.expires_at <= day_end {
                self.transition(&self.pool, p, PackStatus::Used).await?;
            }
        }

        Ok(remaining)
    }

    pub async fn quota_overview(&self, user_id: i64, pack_type: PackType) -> AppResult<QuotaResponse> {
        let quota = self.current_quota(user_id, pack_type).await?;
        let used = self
            .used_today(user_id, Self::action_for(pack_type))
            .await?;
        Ok(QuotaResponse {
            pack_type,
            quota,
            used_today: used,
            remaining: (quota - used).max(0),
        })
    }

    /// 记录一次消耗配额的动作（vote 处理器直接调用；
    /// spin 由 RewardService 在自己的事务里写入）。
    pub async fn record_action(
        &self,
        user_id: i64,
        action: ActivityAction,
        detail: Option<String>,
    ) -> AppResult<events::Model> {
        self.record_action_with(&self.pool, user_id, action, detail)
            .await
    }

    pub async fn record_action_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        action: ActivityAction,
        detail: Option<String>,
    ) -> AppResult<events::Model> {
        let model = events::ActiveModel {
            user_id: Set(user_id),
            action: Set(action),
            detail: Set(detail),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        Ok(model)
    }

    /// 用户的全部卡（含已用完/过期的, 审计展示用）
    pub async fn list_packs(&self, user_id: i64) -> AppResult<Vec<PackResponse>> {
        let list = packs::Entity::find()
            .filter(packs::Column::UserId.eq(user_id))
            .order_by_asc(packs::Column::GrantedAt)
            .order_by_asc(packs::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }
}
