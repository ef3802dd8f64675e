use crate::config::StoreConfig;
use crate::models::*;
use crate::services::PurchaseService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/store/catalog",
    tag = "store",
    responses(
        (status = 200, description = "获取商店目录成功", body = StoreCatalogResponse)
    )
)]
/// 商店目录（加次卡与商品, 来自配置）
pub async fn get_catalog(store: web::Data<StoreConfig>) -> Result<HttpResponse> {
    let data = StoreCatalogResponse {
        packs: store.packs.iter().map(Into::into).collect(),
        items: store.items.iter().map(Into::into).collect(),
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/store/packs",
    tag = "store",
    request_body = PurchasePackRequest,
    params(
        ("user_id" = i64, Path, description = "用户ID")
    ),
    responses(
        (status = 200, description = "购买成功", body = PackPurchaseResponse),
        (status = 400, description = "余额不足")
    )
)]
/// 用金币购买加次卡（扣款+发卡, 发卡失败自动退款）
pub async fn purchase_pack(
    service: web::Data<PurchaseService>,
    path: web::Path<i64>,
    body: web::Json<PurchasePackRequest>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match service.purchase_pack(user_id, body.pack_type).await {
        Ok(receipt) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": receipt }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/store/items",
    tag = "store",
    request_body = PurchaseItemRequest,
    params(
        ("user_id" = i64, Path, description = "用户ID")
    ),
    responses(
        (status = 200, description = "购买成功", body = PurchaseReceiptResponse),
        (status = 400, description = "余额不足"),
        (status = 404, description = "商品不存在")
    )
)]
/// 购买商品并生成兑换码（多步流程, 中途失败自动冲正退款）
pub async fn purchase_item(
    service: web::Data<PurchaseService>,
    path: web::Path<i64>,
    body: web::Json<PurchaseItemRequest>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match service.purchase_item(user_id, &body.item_key).await {
        Ok(receipt) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": receipt }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn store_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/store/catalog", web::get().to(get_catalog))
        .route(
            "/users/{user_id}/store/packs",
            web::post().to(purchase_pack),
        )
        .route(
            "/users/{user_id}/store/items",
            web::post().to(purchase_item),
        );
}
