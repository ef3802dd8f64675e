use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 特殊转盘结果
/// - respin: 免费重抽, 不消耗当日配额
/// - unlock: 发放一次性解锁（幂等）, 然后按 respin 处理
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    Respin,
    Unlock,
}

/// 转盘奖品配置项。weight 为相对概率质量；point_delta 可为负
/// （转盘结果属于既定游戏结果, 扣分不做余额校验）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PrizeEntry {
    pub name: String,
    #[serde(default)]
    pub rarity_level: i32,
    pub weight: u32,
    #[serde(default)]
    pub point_delta: i64,
    #[serde(default)]
    pub special: Option<SpecialKind>,
}

impl PrizeEntry {
    pub fn new(
        name: &str,
        rarity_level: i32,
        weight: u32,
        point_delta: i64,
        special: Option<SpecialKind>,
    ) -> Self {
        Self {
            name: name.to_string(),
            rarity_level,
            weight,
            point_delta,
            special,
        }
    }
}

/// 一次 spin 的结果
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinResponse {
    pub prize_name: String,
    pub point_delta: i64,
    /// 本次 spin 过程中触发过 unlock 时为 Some(unlock)
    pub special: Option<SpecialKind>,
    /// false 表示本次未消耗配额（纯 respin 链走满上限后的空结果）
    pub quota_consumed: bool,
    /// 保底奖励 + 当日首次加成（未消耗配额时为 0）
    pub base_reward: i64,
    /// 本次发放的解锁项
    pub unlocked: Vec<String>,
    pub quota_remaining: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinQuotaResponse {
    pub quota: i64,
    pub used_today: i64,
    pub remaining: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VoteResponse {
    /// 本次投票获得的金币
    pub reward: i64,
    pub balance: i64,
    pub quota_remaining: i64,
}
