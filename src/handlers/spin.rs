use crate::entities::{ActivityAction, PackType};
use crate::models::*;
use crate::services::{EntitlementService, RewardService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/users/{user_id}/spin/quota",
    tag = "spin",
    params(
        ("user_id" = i64, Path, description = "用户ID")
    ),
    responses(
        (status = 200, description = "获取当日转盘配额成功", body = SpinQuotaResponse)
    )
)]
/// 当日转盘配额: 基础 1 次 + 最早一张有效加次卡的每日次数
pub async fn get_spin_quota(
    entitlements: web::Data<EntitlementService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let quota = match entitlements.current_quota(user_id, PackType::Spin).await {
        Ok(v) => v,
        Err(e) => return Ok(e.error_response()),
    };
    let used = match entitlements.used_today(user_id, ActivityAction::Spin).await {
        Ok(v) => v,
        Err(e) => return Ok(e.error_response()),
    };
    let data = SpinQuotaResponse {
        quota,
        used_today: used,
        remaining: (quota - used).max(0),
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/spin",
    tag = "spin",
    params(
        ("user_id" = i64, Path, description = "用户ID")
    ),
    responses(
        (status = 200, description = "抽奖成功", body = SpinResponse),
        (status = 400, description = "当日次数已用完")
    )
)]
/// 进行一次抽奖:
/// 1. 读取今日剩余次数
/// 2. 按权重选择奖品（respin/unlock 在引擎内消化）
/// 3. 记账并返回结果
pub async fn spin(
    rewards: web::Data<RewardService>,
    entitlements: web::Data<EntitlementService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let remaining = match entitlements.remaining_today(user_id, PackType::Spin).await {
        Ok(v) => v,
        Err(e) => return Ok(e.error_response()),
    };
    match rewards.spin(user_id, remaining).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn spin_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/{user_id}/spin/quota", web::get().to(get_spin_quota))
        .route("/users/{user_id}/spin", web::post().to(spin));
}
