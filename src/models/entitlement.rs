use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{PackStatus, PackType, entitlement_pack_entity as pack_entity};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PackResponse {
    pub id: i64,
    pub pack_type: PackType,
    pub units_per_day: i64,
    pub duration_days: i64,
    pub granted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: PackStatus,
}

impl From<pack_entity::Model> for PackResponse {
    fn from(m: pack_entity::Model) -> Self {
        PackResponse {
            id: m.id,
            pack_type: m.pack_type,
            units_per_day: m.units_per_day,
            duration_days: m.duration_days,
            granted_at: m.granted_at,
            expires_at: m.expires_at,
            status: m.status,
        }
    }
}

/// 直接发卡请求（运营补偿 / 活动发放用, 不扣金币）
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GrantPackRequest {
    pub pack_type: PackType,
    pub units_per_day: i64,
    pub duration_days: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuotaResponse {
    pub pack_type: PackType,
    pub quota: i64,
    pub used_today: i64,
    pub remaining: i64,
}
