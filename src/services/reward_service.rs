use crate::config::EconomyConfig;
use crate::entities::{ActivityAction, unlock_entity as unlocks};
use crate::error::{AppError, AppResult};
use crate::models::{PrizeEntry, SpecialKind, SpinResponse};
use crate::services::{BalanceService, EntitlementService};
use chrono::Utc;
use rand::Rng;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde_json::json;

/// 连续 respin 的上限。病态权重表（respin 占比过高）下避免无限循环,
/// 走满上限后返回一个不消耗配额、不发奖的空结果。
pub const MAX_RESPINS: usize = 50;

const FALLBACK_PRIZE_NAME: &str = "Nothing";

/// 启动时校验过的奖品表。选中概率严格等于 weight / total_weight,
/// 并列/取整由声明顺序决定, 不引入额外随机性。
#[derive(Clone, Debug)]
pub struct RewardTable {
    entries: Vec<PrizeEntry>,
    total_weight: u64,
}

impl RewardTable {
    pub fn new(entries: Vec<PrizeEntry>) -> AppResult<Self> {
        if entries.is_empty() {
            return Err(AppError::MisconfiguredRewardTable(
                "prize table is empty".into(),
            ));
        }
        let total_weight: u64 = entries.iter().map(|p| p.weight as u64).sum();
        if total_weight == 0 {
            return Err(AppError::MisconfiguredRewardTable(
                "total prize weight must be positive".into(),
            ));
        }
        Ok(Self {
            entries,
            total_weight,
        })
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// roll 取值 [1, total_weight]；按声明顺序累加权重,
    /// 第一个累计值 >= roll 的条目即选中。
    pub fn pick(&self, roll: u64) -> &PrizeEntry {
        let mut acc = 0u64;
        for entry in &self.entries {
            acc += entry.weight as u64;
            if acc >= roll {
                return entry;
            }
        }
        self.entries.last().expect("non-empty prize table")
    }

    pub fn draw(&self) -> &PrizeEntry {
        let roll = rand::thread_rng().gen_range(1..=self.total_weight);
        self.pick(roll)
    }
}

/// 转盘引擎: 资格校验 -> 加权抽取 -> 结果分发。
///
/// 消耗配额的 spin 一律发保底奖励（当日首转另有加成）, 与抽中的
/// point_delta 相互独立叠加；respin/unlock 不消耗配额。
#[derive(Clone)]
pub struct RewardService {
    pool: DatabaseConnection,
    balance: BalanceService,
    entitlements: EntitlementService,
    table: RewardTable,
    base_reward: i64,
    first_spin_bonus: i64,
}

impl RewardService {
    pub fn new(
        pool: DatabaseConnection,
        balance: BalanceService,
        entitlements: EntitlementService,
        economy: &EconomyConfig,
    ) -> AppResult<Self> {
        let table = RewardTable::new(economy.prizes.clone())?;
        Ok(Self {
            pool,
            balance,
            entitlements,
            table,
            base_reward: economy.base_spin_reward,
            first_spin_bonus: economy.first_spin_bonus,
        })
    }

    pub fn table(&self) -> &RewardTable {
        &self.table
    }

    /// 进行一次抽奖。quota_remaining 由调用方从 EntitlementService 取得。
    pub async fn spin(&self, user_id: i64, quota_remaining: i64) -> AppResult<SpinResponse> {
        if quota_remaining <= 0 {
            return Err(AppError::QuotaExhausted);
        }

        let mut unlocked: Vec<String> = Vec::new();
        let mut respins = 0usize;

        // respin/unlock 在这里消化, 循环出口要么是普通奖品, 要么是走满上限
        let won = loop {
            let entry = self.table.draw();
            match entry.special {
                None => break Some(entry.clone()),
                Some(SpecialKind::Unlock) => {
                    self.apply_unlock(user_id, &entry.name).await?;
                    if !unlocked.contains(&entry.name) {
                        unlocked.push(entry.name.clone());
                    }
                }
                Some(SpecialKind::Respin) => {}
            }
            respins += 1;
            if respins >= MAX_RESPINS {
                break None;
            }
        };

        let special = if unlocked.is_empty() {
            None
        } else {
            Some(SpecialKind::Unlock)
        };

        let Some(prize) = won else {
            log::warn!(
                "Spin for user {user_id} hit the respin cap ({MAX_RESPINS}), returning no-op"
            );
            return Ok(SpinResponse {
                prize_name: FALLBACK_PRIZE_NAME.to_string(),
                point_delta: 0,
                special,
                quota_consumed: false,
                base_reward: 0,
                unlocked,
                quota_remaining,
            });
        };

        // 记账与动作记录放进同一个事务, 避免半套结果
        let txn = self.pool.begin().await?;

        let first_today = self
            .entitlements
            .used_today_with(&txn, user_id, ActivityAction::Spin)
            .await?
            == 0;

        let event = self
            .entitlements
            .record_action_with(&txn, user_id, ActivityAction::Spin, Some(prize.name.clone()))
            .await?;

        let base_reward = self.base_reward + if first_today { self.first_spin_bonus } else { 0 };
        if base_reward > 0 {
            let description = if first_today {
                "Spin base reward (first spin of the day)"
            } else {
                "Spin base reward"
            };
            self.balance
                .bonus_with(
                    &txn,
                    user_id,
                    base_reward,
                    "spinning",
                    Some(description.to_string()),
                    None,
                    Some((event.id, "spin_event")),
                )
                .await?;
        }

        if prize.point_delta != 0 {
            self.balance
                .adjust_with(
                    &txn,
                    user_id,
                    prize.point_delta,
                    "spinning",
                    Some(format!("Prize: {}", prize.name)),
                    Some(json!({ "prize": prize.name, "rarity": prize.rarity_level })),
                    Some((event.id, "spin_event")),
                )
                .await?;
        }

        txn.commit().await?;

        Ok(SpinResponse {
            prize_name: prize.name,
            point_delta: prize.point_delta,
            special,
            quota_consumed: true,
            base_reward,
            unlocked,
            quota_remaining: quota_remaining - 1,
        })
    }

    /// 一次性解锁, 幂等: (user_id, unlock_key) 冲突时忽略。
    async fn apply_unlock(&self, user_id: i64, unlock_key: &str) -> AppResult<()> {
        let am = unlocks::ActiveModel {
            user_id: Set(user_id),
            unlock_key: Set(unlock_key.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        unlocks::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([unlocks::Column::UserId, unlocks::Column::UnlockKey])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.pool)
            .await?;
        Ok(())
    }
}
