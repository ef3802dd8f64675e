use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 按用户串行化余额 "读取-校验-追加" 序列的进程内锁表。
/// 不同用户的操作互不阻塞；同一用户的并发扣款在此排队。
#[derive(Clone, Default)]
pub struct UserLocks {
    inner: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取（必要时创建）某个用户的锁。调用方持有返回的 Arc 后再 lock。
    pub async fn lock_for(&self, user_id: i64) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().await;
        map.entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_user_same_lock() {
        let locks = UserLocks::new();
        let a = locks.lock_for(7).await;
        let b = locks.lock_for(7).await;
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_different_users_different_locks() {
        let locks = UserLocks::new();
        let a = locks.lock_for(1).await;
        let b = locks.lock_for(2).await;
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
