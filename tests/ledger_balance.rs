mod common;

use coinwheel_backend::entities::TransactionKind;
use coinwheel_backend::error::AppError;
use coinwheel_backend::models::TransactionHistoryQuery;
use futures_util::future::join_all;

const USER: i64 = 42;

fn history_query() -> TransactionHistoryQuery {
    TransactionHistoryQuery {
        page: Some(1),
        per_page: Some(100),
        kind: None,
        category: None,
    }
}

/// 任意 credit/debit/refund 序列后, 余额都等于账本明细金额之和
#[tokio::test]
async fn balance_equals_history_sum_at_every_step() {
    let stack = common::stack().await;

    stack
        .balance
        .credit(USER, 100, "voting", None, None, None)
        .await
        .expect("credit");
    stack
        .balance
        .debit(USER, 30, "qr_store_purchase", None, None, None)
        .await
        .expect("debit");
    stack
        .balance
        .refund(USER, 30, "purchase_refund", None, None, None)
        .await
        .expect("refund");
    stack
        .balance
        .credit(USER, 7, "spinning", None, None, None)
        .await
        .expect("credit");

    let page = stack.ledger.history(USER, &history_query()).await.expect("history");
    let sum: i64 = page.data.iter().map(|t| t.amount).sum();
    let balance = stack.balance.get_balance(USER).await.expect("balance");

    assert_eq!(page.total, 4);
    assert_eq!(balance, sum);
    assert_eq!(balance, 107);
}

/// spending 行以负数入账, earning/refund 为正
#[tokio::test]
async fn amount_signs_follow_kind() {
    let stack = common::stack().await;

    stack
        .balance
        .credit(USER, 50, "voting", None, None, None)
        .await
        .expect("credit");
    stack
        .balance
        .debit(USER, 20, "pack_purchase", None, None, None)
        .await
        .expect("debit");

    let page = stack.ledger.history(USER, &history_query()).await.expect("history");
    for t in &page.data {
        match t.kind {
            TransactionKind::Spending => assert!(t.amount < 0),
            _ => assert!(t.amount > 0),
        }
    }
}

/// 同一用户 N 个并发扣款, 成功次数必须恰好是 floor(B/A), 余额不透支
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_debits_never_overdraw() {
    let stack = common::stack().await;

    stack
        .balance
        .credit(USER, 100, "voting", None, None, None)
        .await
        .expect("credit");

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let balance = stack.balance.clone();
            tokio::spawn(async move {
                balance
                    .debit(USER, 30, "qr_store_purchase", None, None, None)
                    .await
            })
        })
        .collect();

    let results = join_all(tasks).await;
    let mut ok = 0;
    let mut rejected = 0;
    for r in results {
        match r.expect("task panicked") {
            Ok(_) => ok += 1,
            Err(AppError::InsufficientFunds { .. }) => rejected += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(ok, 3, "exactly floor(100/30) debits may succeed");
    assert_eq!(rejected, 7);

    let final_balance = stack.balance.get_balance(USER).await.expect("balance");
    assert_eq!(final_balance, 10);
    assert!(final_balance >= 0);
}

/// 余额不足的扣款不产生任何状态变化
#[tokio::test]
async fn rejected_debit_leaves_no_rows() {
    let stack = common::stack().await;

    let err = stack
        .balance
        .debit(USER, 10, "pack_purchase", None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientFunds { .. }));

    let page = stack.ledger.history(USER, &history_query()).await.expect("history");
    assert_eq!(page.total, 0);
}

/// 非正金额属于编程错误
#[tokio::test]
async fn non_positive_amounts_are_invalid() {
    let stack = common::stack().await;

    assert!(matches!(
        stack.balance.credit(USER, 0, "voting", None, None, None).await,
        Err(AppError::InvalidAmount(_))
    ));
    assert!(matches!(
        stack.balance.debit(USER, -5, "voting", None, None, None).await,
        Err(AppError::InvalidAmount(_))
    ));
    assert!(matches!(
        stack.balance.refund(USER, 0, "voting", None, None, None).await,
        Err(AppError::InvalidAmount(_))
    ));
}

/// 明细过滤与倒序分页
#[tokio::test]
async fn history_filters_and_orders_newest_first() {
    let stack = common::stack().await;

    stack
        .balance
        .credit(USER, 10, "voting", None, None, None)
        .await
        .expect("credit");
    stack
        .balance
        .credit(USER, 20, "spinning", None, None, None)
        .await
        .expect("credit");
    stack
        .balance
        .debit(USER, 5, "pack_purchase", None, None, None)
        .await
        .expect("debit");

    let all = stack.ledger.history(USER, &history_query()).await.expect("history");
    let ids: Vec<i64> = all.data.iter().map(|t| t.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted, "newest first");

    let spending_only = stack
        .ledger
        .history(
            USER,
            &TransactionHistoryQuery {
                page: None,
                per_page: None,
                kind: Some(TransactionKind::Spending),
                category: None,
            },
        )
        .await
        .expect("history");
    assert_eq!(spending_only.total, 1);
    assert_eq!(spending_only.data[0].amount, -5);

    let by_category = stack
        .ledger
        .history(
            USER,
            &TransactionHistoryQuery {
                page: None,
                per_page: None,
                kind: None,
                category: Some("spinning".to_string()),
            },
        )
        .await
        .expect("history");
    assert_eq!(by_category.total, 1);
    assert_eq!(by_category.data[0].amount, 20);
}
