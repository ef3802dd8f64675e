use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{ActivityAction, PackStatus, PackType, PurchaseState, TransactionKind};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::wallet::get_balance,
        handlers::wallet::get_transactions,
        handlers::spin::get_spin_quota,
        handlers::spin::spin,
        handlers::vote::cast_vote,
        handlers::packs::list_packs,
        handlers::packs::get_quota,
        handlers::packs::grant_pack,
        handlers::store::get_catalog,
        handlers::store::purchase_pack,
        handlers::store::purchase_item,
    ),
    components(
        schemas(
            BalanceResponse,
            TransactionResponse,
            TransactionHistoryQuery,
            TransactionKind,
            ActivityAction,
            SpinResponse,
            SpinQuotaResponse,
            SpecialKind,
            PrizeEntry,
            VoteResponse,
            PackResponse,
            PackType,
            PackStatus,
            GrantPackRequest,
            QuotaResponse,
            PurchasePackRequest,
            PurchaseItemRequest,
            PackPurchaseResponse,
            PurchaseReceiptResponse,
            PurchaseState,
            StoreCatalogResponse,
            PackOfferResponse,
            ItemOfferResponse,
            ApiError,
        )
    ),
    tags(
        (name = "wallet", description = "Coin balance and ledger history API"),
        (name = "spin", description = "Prize wheel API"),
        (name = "vote", description = "Vote reward API"),
        (name = "packs", description = "Entitlement pack API"),
        (name = "store", description = "Coin store API"),
    ),
    info(
        title = "Coinwheel Backend API",
        version = "1.0.0",
        description = "Coin ledger, prize wheel and store REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
