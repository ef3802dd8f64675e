mod common;

use coinwheel_backend::config::{EconomyConfig, StoreConfig};
use coinwheel_backend::entities::{ActivityAction, unlock_entity as unlocks};
use coinwheel_backend::error::AppError;
use coinwheel_backend::models::{PrizeEntry, SpecialKind};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

const USER: i64 = 7;

fn economy_with(prizes: Vec<PrizeEntry>) -> EconomyConfig {
    EconomyConfig {
        base_spin_reward: 1,
        first_spin_bonus: 2,
        prizes,
        ..EconomyConfig::default()
    }
}

/// 单一普通奖品: 结果确定, 校验保底+首转加成与 point_delta 的叠加记账
#[tokio::test]
async fn ordinary_prize_credits_delta_and_base_reward() {
    let economy = economy_with(vec![PrizeEntry::new("7 Coins", 1, 1, 7, None)]);
    let stack = common::stack_with(economy, StoreConfig::default()).await;

    let result = stack.rewards.spin(USER, 1).await.expect("spin");

    assert_eq!(result.prize_name, "7 Coins");
    assert_eq!(result.point_delta, 7);
    assert!(result.quota_consumed);
    assert_eq!(result.base_reward, 3, "base 1 + first-of-day 2");
    assert_eq!(result.quota_remaining, 0);

    let balance = stack.balance.get_balance(USER).await.expect("balance");
    assert_eq!(balance, 10);

    let used = stack
        .entitlements
        .used_today(USER, ActivityAction::Spin)
        .await
        .expect("used today");
    assert_eq!(used, 1);
}

/// 当日第二次 spin 不再有首转加成
#[tokio::test]
async fn first_of_day_bonus_applies_once() {
    let economy = economy_with(vec![PrizeEntry::new("7 Coins", 1, 1, 7, None)]);
    let stack = common::stack_with(economy, StoreConfig::default()).await;

    let first = stack.rewards.spin(USER, 2).await.expect("first spin");
    let second = stack.rewards.spin(USER, 1).await.expect("second spin");

    assert_eq!(first.base_reward, 3);
    assert_eq!(second.base_reward, 1);
}

/// 负 point_delta 是既定游戏结果, 不做余额校验, 余额可为负
#[tokio::test]
async fn negative_prize_delta_skips_funds_check() {
    let economy = economy_with(vec![PrizeEntry::new("Coin Leak", 1, 1, -5, None)]);
    let stack = common::stack_with(economy, StoreConfig::default()).await;

    let result = stack.rewards.spin(USER, 1).await.expect("spin");
    assert_eq!(result.point_delta, -5);

    // base 3 - 5 = -2
    let balance = stack.balance.get_balance(USER).await.expect("balance");
    assert_eq!(balance, -2);
}

/// 配额用尽直接拒绝
#[tokio::test]
async fn spin_with_no_quota_is_rejected() {
    let stack = common::stack().await;
    let err = stack.rewards.spin(USER, 0).await.unwrap_err();
    assert!(matches!(err, AppError::QuotaExhausted));
}

/// respin 是免费的: 纯 respin 表走满上限后, 次数与余额都不变
#[tokio::test]
async fn respin_consumes_no_quota() {
    let economy = economy_with(vec![PrizeEntry::new(
        "Free Respin",
        2,
        1,
        0,
        Some(SpecialKind::Respin),
    )]);
    let stack = common::stack_with(economy, StoreConfig::default()).await;

    let before = stack
        .entitlements
        .remaining_today(USER, coinwheel_backend::entities::PackType::Spin)
        .await
        .expect("remaining");

    let result = stack.rewards.spin(USER, before).await.expect("spin");

    assert!(!result.quota_consumed);
    assert_eq!(result.base_reward, 0);
    assert_eq!(result.point_delta, 0);
    assert_eq!(result.quota_remaining, before);

    let after = stack
        .entitlements
        .remaining_today(USER, coinwheel_backend::entities::PackType::Spin)
        .await
        .expect("remaining");
    assert_eq!(after, before, "quota unchanged by respins");

    let used = stack
        .entitlements
        .used_today(USER, ActivityAction::Spin)
        .await
        .expect("used today");
    assert_eq!(used, 0, "no spin event recorded");

    let balance = stack.balance.get_balance(USER).await.expect("balance");
    assert_eq!(balance, 0, "no coins moved");
}

/// unlock 幂等: 同一解锁触发两次也只存在一条记录
#[tokio::test]
async fn unlock_is_idempotent() {
    let economy = economy_with(vec![PrizeEntry::new(
        "Avatar Unlock",
        4,
        1,
        0,
        Some(SpecialKind::Unlock),
    )]);
    let stack = common::stack_with(economy, StoreConfig::default()).await;

    let first = stack.rewards.spin(USER, 5).await.expect("first spin");
    let second = stack.rewards.spin(USER, 5).await.expect("second spin");

    assert_eq!(first.special, Some(SpecialKind::Unlock));
    assert_eq!(first.unlocked, vec!["Avatar Unlock".to_string()]);
    assert_eq!(second.special, Some(SpecialKind::Unlock));

    let count = unlocks::Entity::find()
        .filter(unlocks::Column::UserId.eq(USER))
        .filter(unlocks::Column::UnlockKey.eq("Avatar Unlock"))
        .count(&stack.db)
        .await
        .expect("count unlocks");
    assert_eq!(count, 1);
}

/// unlock 发放后按 respin 处理（纯 unlock 表同样不消耗配额）
#[tokio::test]
async fn unlock_behaves_like_respin_for_quota() {
    let economy = economy_with(vec![PrizeEntry::new(
        "Avatar Unlock",
        4,
        1,
        0,
        Some(SpecialKind::Unlock),
    )]);
    let stack = common::stack_with(economy, StoreConfig::default()).await;

    let result = stack.rewards.spin(USER, 1).await.expect("spin");
    assert!(!result.quota_consumed);

    let used = stack
        .entitlements
        .used_today(USER, ActivityAction::Spin)
        .await
        .expect("used today");
    assert_eq!(used, 0);
}
