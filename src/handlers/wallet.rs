use crate::models::*;
use crate::services::{BalanceService, LedgerService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/users/{user_id}/wallet",
    tag = "wallet",
    params(
        ("user_id" = i64, Path, description = "用户ID")
    ),
    responses(
        (status = 200, description = "获取余额成功", body = BalanceResponse)
    )
)]
/// 当前金币余额（由账本求和推导）
pub async fn get_balance(
    service: web::Data<BalanceService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match service.get_balance(user_id).await {
        Ok(balance) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": BalanceResponse { user_id, balance }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/wallet/transactions",
    tag = "wallet",
    params(
        ("user_id" = i64, Path, description = "用户ID"),
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)"),
        ("kind" = Option<String>, Query, description = "交易类型过滤"),
        ("category" = Option<String>, Query, description = "活动标签过滤")
    ),
    responses(
        (status = 200, description = "获取账本明细成功")
    )
)]
/// 分页获取账本明细（倒序, 可按类型/标签过滤）
pub async fn get_transactions(
    service: web::Data<LedgerService>,
    path: web::Path<i64>,
    query: web::Query<TransactionHistoryQuery>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match service.history(user_id, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn wallet_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/{user_id}/wallet", web::get().to(get_balance))
        .route(
            "/users/{user_id}/wallet/transactions",
            web::get().to(get_transactions),
        );
}
