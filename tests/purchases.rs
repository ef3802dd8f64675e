mod common;

use std::sync::Arc;

use coinwheel_backend::config::{EconomyConfig, StoreConfig};
use coinwheel_backend::entities::{
    PackStatus, PackType, PurchaseState, TransactionKind, purchase_entity as purchases,
};
use coinwheel_backend::error::{AppError, AppResult};
use coinwheel_backend::models::TransactionHistoryQuery;
use coinwheel_backend::services::ArtifactGenerator;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

const USER: i64 = 21;
const PARTNER: i64 = 900;

struct BrokenArtifacts;

impl ArtifactGenerator for BrokenArtifacts {
    fn generate(&self, _user_id: i64, _item_key: &str) -> AppResult<String> {
        Err(AppError::ValidationError("artifact backend down".into()))
    }
}

fn refund_query() -> TransactionHistoryQuery {
    TransactionHistoryQuery {
        page: None,
        per_page: None,
        kind: Some(TransactionKind::Refund),
        category: None,
    }
}

/// 加次卡购买: 扣款 + 发卡
#[tokio::test]
async fn pack_purchase_debits_and_grants() {
    let stack = common::stack().await;
    stack
        .balance
        .credit(USER, 1000, "voting", None, None, None)
        .await
        .expect("credit");

    let receipt = stack
        .purchases
        .purchase_pack(USER, PackType::Spin)
        .await
        .expect("purchase pack");

    assert_eq!(receipt.price, 300);
    assert_eq!(receipt.balance_after, 700);
    assert_eq!(receipt.pack.status, PackStatus::Active);
    assert_eq!(receipt.pack.units_per_day, 3);

    let quota = stack
        .entitlements
        .current_quota(USER, PackType::Spin)
        .await
        .expect("quota");
    assert_eq!(quota, 4);
}

/// 余额不足: 拒绝且无任何状态变化
#[tokio::test]
async fn pack_purchase_with_insufficient_funds_changes_nothing() {
    let stack = common::stack().await;

    let err = stack
        .purchases
        .purchase_pack(USER, PackType::Spin)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientFunds { .. }));

    let quota = stack
        .entitlements
        .current_quota(USER, PackType::Spin)
        .await
        .expect("quota");
    assert_eq!(quota, 1, "no pack granted");
    assert_eq!(stack.balance.get_balance(USER).await.expect("balance"), 0);
}

/// 商品购买完整流程: 状态机走到 completed, 兑换码已生成
#[tokio::test]
async fn item_purchase_completes_with_artifact() {
    let stack = common::stack().await;
    stack
        .balance
        .credit(USER, 1000, "voting", None, None, None)
        .await
        .expect("credit");

    let receipt = stack
        .purchases
        .purchase_item(USER, "discount_qr_5")
        .await
        .expect("purchase item");

    assert_eq!(receipt.state, PurchaseState::Completed);
    assert_eq!(receipt.amount, 500);
    assert_eq!(receipt.balance_after, 500);
    let code = receipt.artifact_code.expect("artifact code");
    assert_eq!(code.len(), 9);
}

/// 合作方分成: 按 basis points 入合作方钱包, 与买家余额无关
#[tokio::test]
async fn partner_receives_revenue_share() {
    let economy = EconomyConfig {
        partner_user_id: Some(PARTNER),
        partner_share_bp: 2000,
        ..EconomyConfig::default()
    };
    let stack = common::stack_with(economy, StoreConfig::default()).await;
    stack
        .balance
        .credit(USER, 1000, "voting", None, None, None)
        .await
        .expect("credit");

    stack
        .purchases
        .purchase_item(USER, "discount_qr_5")
        .await
        .expect("purchase item");

    let partner_balance = stack.balance.get_balance(PARTNER).await.expect("balance");
    assert_eq!(partner_balance, 100, "20% of 500");
    assert_eq!(stack.balance.get_balance(USER).await.expect("balance"), 500);
}

/// 补偿正确性: 兑换码生成失败 -> 恰好一笔等额 refund, 余额回到购买前
#[tokio::test]
async fn failed_artifact_step_triggers_exactly_one_refund() {
    let stack = common::stack().await;
    let purchases_svc = stack
        .purchases
        .clone()
        .with_artifact_generator(Arc::new(BrokenArtifacts));

    stack
        .balance
        .credit(USER, 1000, "voting", None, None, None)
        .await
        .expect("credit");

    let err = purchases_svc
        .purchase_item(USER, "discount_qr_5")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    // 余额回到购买前
    assert_eq!(stack.balance.get_balance(USER).await.expect("balance"), 1000);

    // 恰好一笔 +500 的 refund, 关联到购买记录
    let refunds = stack.ledger.history(USER, &refund_query()).await.expect("history");
    assert_eq!(refunds.total, 1);
    assert_eq!(refunds.data[0].amount, 500);
    assert_eq!(refunds.data[0].reference_type.as_deref(), Some("purchase"));

    // 购买记录标记 failed 并带原因
    let row = purchases::Entity::find()
        .filter(purchases::Column::UserId.eq(USER))
        .one(&stack.db)
        .await
        .expect("load purchase")
        .expect("purchase exists");
    assert_eq!(row.state, PurchaseState::Failed);
    assert!(row.failure_reason.is_some());
    assert!(row.artifact_code.is_none());
}

/// 未知商品: 直接 NotFound, 不碰余额
#[tokio::test]
async fn unknown_item_is_rejected_before_debit() {
    let stack = common::stack().await;
    stack
        .balance
        .credit(USER, 1000, "voting", None, None, None)
        .await
        .expect("credit");

    let err = stack
        .purchases
        .purchase_item(USER, "no_such_item")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(stack.balance.get_balance(USER).await.expect("balance"), 1000);

    let count = purchases::Entity::find()
        .filter(purchases::Column::UserId.eq(USER))
        .count(&stack.db)
        .await
        .expect("count purchases");
    assert_eq!(count, 0);
}
