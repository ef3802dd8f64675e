use crate::entities::PackType;
use crate::error::AppError;
use crate::models::*;
use crate::services::EntitlementService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn parse_pack_type(raw: &str) -> Result<PackType, AppError> {
    match raw {
        "spin" => Ok(PackType::Spin),
        "vote" => Ok(PackType::Vote),
        other => Err(AppError::ValidationError(format!(
            "unknown pack type '{other}'"
        ))),
    }
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/packs",
    tag = "packs",
    params(
        ("user_id" = i64, Path, description = "用户ID")
    ),
    responses(
        (status = 200, description = "获取加次卡列表成功", body = [PackResponse])
    )
)]
/// 用户全部加次卡（含已用完/过期, 审计展示）
pub async fn list_packs(
    service: web::Data<EntitlementService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match service.list_packs(user_id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/packs/{pack_type}/quota",
    tag = "packs",
    params(
        ("user_id" = i64, Path, description = "用户ID"),
        ("pack_type" = String, Path, description = "spin 或 vote")
    ),
    responses(
        (status = 200, description = "获取配额成功", body = QuotaResponse),
        (status = 400, description = "未知的 pack 类型")
    )
)]
/// 指定动作的当日配额概览
pub async fn get_quota(
    service: web::Data<EntitlementService>,
    path: web::Path<(i64, String)>,
) -> Result<HttpResponse> {
    let (user_id, raw) = path.into_inner();
    let pack_type = match parse_pack_type(&raw) {
        Ok(t) => t,
        Err(e) => return Ok(e.error_response()),
    };
    match service.quota_overview(user_id, pack_type).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/packs",
    tag = "packs",
    request_body = GrantPackRequest,
    params(
        ("user_id" = i64, Path, description = "用户ID")
    ),
    responses(
        (status = 200, description = "发卡成功", body = PackResponse),
        (status = 400, description = "参数错误")
    )
)]
/// 直接发一张加次卡（运营补偿/活动发放, 不扣金币;
/// 用户自助购买走 /store/packs）
pub async fn grant_pack(
    service: web::Data<EntitlementService>,
    path: web::Path<i64>,
    body: web::Json<GrantPackRequest>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let req = body.into_inner();
    match service
        .grant(user_id, req.pack_type, req.units_per_day, req.duration_days)
        .await
    {
        Ok(pack) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": PackResponse::from(pack)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn packs_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/{user_id}/packs", web::get().to(list_packs))
        .route("/users/{user_id}/packs", web::post().to(grant_pack))
        .route(
            "/users/{user_id}/packs/{pack_type}/quota",
            web::get().to(get_quota),
        );
}
