use crate::config::{EconomyConfig, ItemOffer, PackOffer, StoreConfig};
use crate::entities::{PackType, PurchaseState, purchase_entity as purchases};
use crate::error::{AppError, AppResult};
use crate::models::{PackPurchaseResponse, PurchaseReceiptResponse};
use crate::services::{BalanceService, EntitlementService};
use crate::utils::generate_artifact_code;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// 生成购买附属物（兑换码）的接缝。默认实现走本地码生成器；
/// 测试里用失败实现演练补偿路径。
pub trait ArtifactGenerator: Send + Sync {
    fn generate(&self, user_id: i64, item_key: &str) -> AppResult<String>;
}

pub struct DiscountCodeGenerator;

impl ArtifactGenerator for DiscountCodeGenerator {
    fn generate(&self, _user_id: i64, _item_key: &str) -> AppResult<String> {
        Ok(generate_artifact_code())
    }
}

/// 多步购买的编排与补偿。
///
/// 流程: 扣款 -> 写购买记录 -> 生成兑换码 -> 合作方分成。
/// 扣款之后的每一步独立包裹；记录/兑换码步骤不可恢复地失败时,
/// 以一笔等额 refund 冲正扣款并把购买标记为 failed。分成是有意
/// 解耦的最后一步, 它失败只记日志, 绝不回滚用户已完成的购买。
#[derive(Clone)]
pub struct PurchaseService {
    pool: DatabaseConnection,
    balance: BalanceService,
    entitlements: EntitlementService,
    economy: EconomyConfig,
    store: StoreConfig,
    artifacts: Arc<dyn ArtifactGenerator>,
}

impl PurchaseService {
    pub fn new(
        pool: DatabaseConnection,
        balance: BalanceService,
        entitlements: EntitlementService,
        economy: EconomyConfig,
        store: StoreConfig,
    ) -> Self {
        Self {
            pool,
            balance,
            entitlements,
            economy,
            store,
            artifacts: Arc::new(DiscountCodeGenerator),
        }
    }

    pub fn with_artifact_generator(mut self, artifacts: Arc<dyn ArtifactGenerator>) -> Self {
        self.artifacts = artifacts;
        self
    }

    pub fn pack_offer(&self, pack_type: PackType) -> Option<&PackOffer> {
        self.store.packs.iter().find(|p| p.pack_type == pack_type)
    }

    pub fn item_offer(&self, item_key: &str) -> Option<&ItemOffer> {
        self.store.items.iter().find(|i| i.key == item_key)
    }

    /// 购买加次卡: 扣款 + 发卡作为一个失败原子的组合,
    /// 发卡失败立即等额退款。
    pub async fn purchase_pack(
        &self,
        user_id: i64,
        pack_type: PackType,
    ) -> AppResult<PackPurchaseResponse> {
        let offer = self
            .pack_offer(pack_type)
            .ok_or_else(|| AppError::NotFound(format!("No pack offer for type {pack_type}")))?
            .clone();

        let debit = self
            .balance
            .debit(
                user_id,
                offer.price,
                "pack_purchase",
                Some(format!(
                    "{} pack: +{}/day for {} days",
                    offer.pack_type, offer.units_per_day, offer.duration_days
                )),
                None,
                None,
            )
            .await?;

        match self
            .entitlements
            .grant(user_id, pack_type, offer.units_per_day, offer.duration_days)
            .await
        {
            Ok(pack) => {
                let balance_after = self.balance.get_balance(user_id).await?;
                Ok(PackPurchaseResponse {
                    pack: pack.into(),
                    price: offer.price,
                    balance_after,
                })
            }
            Err(e) => {
                log::error!(
                    "Pack grant failed after debit (user {user_id}, amount {}, debit tx {}): {e}",
                    offer.price,
                    debit.id
                );
                self.compensate(
                    user_id,
                    offer.price,
                    (debit.id, "coin_transaction"),
                    "pack grant",
                )
                .await?;
                Err(AppError::PackGrantFailed(format!(
                    "{pack_type} pack for user {user_id}: {e}"
                )))
            }
        }
    }

    /// 购买需要生成兑换码的商品（完整 saga）。
    pub async fn purchase_item(
        &self,
        user_id: i64,
        item_key: &str,
    ) -> AppResult<PurchaseReceiptResponse> {
        let item = self
            .item_offer(item_key)
            .ok_or_else(|| AppError::NotFound(format!("No store item '{item_key}'")))?
            .clone();

        // 1. 扣款（余额不足在这里拒绝, 无任何状态变化）
        let debit = self
            .balance
            .debit(
                user_id,
                item.price,
                "qr_store_purchase",
                Some(format!("Store purchase: {}", item.title)),
                None,
                None,
            )
            .await?;

        // 2. 写购买记录
        let reference_code = Uuid::new_v4().to_string();
        let now = Utc::now();
        let inserted = purchases::ActiveModel {
            user_id: Set(user_id),
            item_key: Set(item.key.clone()),
            amount: Set(item.price),
            state: Set(PurchaseState::Debited),
            reference_code: Set(reference_code.clone()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        let purchase = match inserted {
            Ok(p) => p,
            Err(e) => {
                log::error!(
                    "Purchase record insert failed after debit (user {user_id}, item {item_key}): {e}"
                );
                self.compensate(
                    user_id,
                    item.price,
                    (debit.id, "coin_transaction"),
                    "purchase record",
                )
                .await?;
                return Err(e.into());
            }
        };

        let purchase_id = purchase.id;
        let purchase = match self
            .set_state(purchase, PurchaseState::Recorded, None, None)
            .await
        {
            Ok(p) => p,
            Err(e) => {
                log::error!(
                    "Purchase state update failed after debit (user {user_id}, purchase {reference_code}): {e}"
                );
                self.compensate(
                    user_id,
                    item.price,
                    (purchase_id, "purchase"),
                    "purchase record",
                )
                .await?;
                return Err(e);
            }
        };

        // 3. 生成兑换码（失败则标记 failed 并冲正扣款）
        let purchase = match self.artifacts.generate(user_id, &item.key) {
            Ok(code) => {
                match self
                    .set_state(purchase, PurchaseState::ArtifactGenerated, Some(code), None)
                    .await
                {
                    Ok(p) => p,
                    Err(e) => {
                        log::error!(
                            "Artifact persist failed after debit (user {user_id}, purchase {reference_code}): {e}"
                        );
                        self.compensate(
                            user_id,
                            item.price,
                            (purchase_id, "purchase"),
                            "artifact generation",
                        )
                        .await?;
                        return Err(e);
                    }
                }
            }
            Err(e) => {
                log::error!(
                    "Artifact generation failed (user {user_id}, purchase {reference_code}): {e}"
                );
                self.mark_failed(purchase, &e).await?;
                self.compensate(
                    user_id,
                    item.price,
                    (purchase_id, "purchase"),
                    "artifact generation",
                )
                .await?;
                return Err(e);
            }
        };

        // 4. 合作方分成 —— 独立资源, 失败只告警, 不影响用户购买
        self.credit_partner_share(user_id, &item, &purchase).await;

        let purchase = self
            .set_state(purchase, PurchaseState::Completed, None, None)
            .await?;

        let balance_after = self.balance.get_balance(user_id).await?;
        Ok(PurchaseReceiptResponse::from_purchase(
            purchase,
            balance_after,
        ))
    }

    /// 用户的购买历史（审计展示）
    pub async fn list_purchases(&self, user_id: i64) -> AppResult<Vec<purchases::Model>> {
        Ok(purchases::Entity::find()
            .filter(purchases::Column::UserId.eq(user_id))
            .all(&self.pool)
            .await?)
    }

    async fn credit_partner_share(
        &self,
        user_id: i64,
        item: &ItemOffer,
        purchase: &purchases::Model,
    ) {
        let Some(partner_id) = self.economy.partner_user_id else {
            return;
        };
        let share = item.price * self.economy.partner_share_bp / 10_000;
        if share <= 0 {
            return;
        }
        if let Err(e) = self
            .balance
            .bonus(
                partner_id,
                share,
                "revenue_share",
                Some(format!(
                    "Revenue share for purchase {}",
                    purchase.reference_code
                )),
                Some(json!({ "buyer": user_id, "item": item.key })),
                Some((purchase.id, "purchase")),
            )
            .await
        {
            log::error!(
                "Partner share credit failed (partner {partner_id}, purchase {}): {e}",
                purchase.reference_code
            );
        }
    }

    async fn set_state(
        &self,
        purchase: purchases::Model,
        state: PurchaseState,
        artifact_code: Option<String>,
        failure_reason: Option<String>,
    ) -> AppResult<purchases::Model> {
        let mut am = purchase.into_active_model();
        am.state = Set(state);
        if let Some(code) = artifact_code {
            am.artifact_code = Set(Some(code));
        }
        if let Some(reason) = failure_reason {
            am.failure_reason = Set(Some(reason));
        }
        am.updated_at = Set(Some(Utc::now()));
        Ok(am.update(&self.pool).await?)
    }

    async fn mark_failed(&self, purchase: purchases::Model, cause: &AppError) -> AppResult<()> {
        self.set_state(
            purchase,
            PurchaseState::Failed,
            None,
            Some(cause.to_string()),
        )
        .await?;
        Ok(())
    }

    /// 等额冲正。refund 本身失败是最危险的状态（钱卡住）,
    /// 升级为 RefundFailed 并带全部上下文写错误日志。
    async fn compensate(
        &self,
        user_id: i64,
        amount: i64,
        reference: (i64, &str),
        reason: &str,
    ) -> AppResult<()> {
        match self
            .balance
            .refund(
                user_id,
                amount,
                "purchase_refund",
                Some(format!("Refund for failed {reason}")),
                None,
                Some(reference),
            )
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("Refund of {amount} coins for user {user_id} failed ({reason}): {e}");
                Err(AppError::RefundFailed(format!(
                    "user {user_id}, amount {amount}, cause: {reason}"
                )))
            }
        }
    }
}
