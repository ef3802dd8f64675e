use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ItemOffer, PackOffer};
use crate::entities::{PackType, PurchaseState, purchase_entity};

use super::PackResponse;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PurchasePackRequest {
    pub pack_type: PackType,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PurchaseItemRequest {
    pub item_key: String,
}

/// 加次卡购买回执
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PackPurchaseResponse {
    pub pack: PackResponse,
    pub price: i64,
    pub balance_after: i64,
}

/// 商品购买回执
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PurchaseReceiptResponse {
    pub purchase_id: i64,
    pub reference_code: String,
    pub item_key: String,
    pub amount: i64,
    pub state: PurchaseState,
    /// 生成的兑换码（由展示层渲染成 QR 图片）
    pub artifact_code: Option<String>,
    pub balance_after: i64,
}

impl PurchaseReceiptResponse {
    pub fn from_purchase(m: purchase_entity::Model, balance_after: i64) -> Self {
        Self {
            purchase_id: m.id,
            reference_code: m.reference_code,
            item_key: m.item_key,
            amount: m.amount,
            state: m.state,
            artifact_code: m.artifact_code,
            balance_after,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PackOfferResponse {
    pub pack_type: PackType,
    pub units_per_day: i64,
    pub duration_days: i64,
    pub price: i64,
}

impl From<&PackOffer> for PackOfferResponse {
    fn from(o: &PackOffer) -> Self {
        Self {
            pack_type: o.pack_type,
            units_per_day: o.units_per_day,
            duration_days: o.duration_days,
            price: o.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemOfferResponse {
    pub key: String,
    pub title: String,
    pub price: i64,
}

impl From<&ItemOffer> for ItemOfferResponse {
    fn from(o: &ItemOffer) -> Self {
        Self {
            key: o.key.clone(),
            title: o.title.clone(),
            price: o.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoreCatalogResponse {
    pub packs: Vec<PackOfferResponse>,
    pub items: Vec<ItemOfferResponse>,
}
