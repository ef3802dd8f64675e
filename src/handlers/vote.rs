use crate::config::EconomyConfig;
use crate::entities::{ActivityAction, PackType};
use crate::error::AppError;
use crate::models::*;
use crate::services::{BalanceService, EntitlementService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/users/{user_id}/votes",
    tag = "vote",
    params(
        ("user_id" = i64, Path, description = "用户ID")
    ),
    responses(
        (status = 200, description = "投票成功", body = VoteResponse),
        (status = 400, description = "当日次数已用完")
    )
)]
/// 投一票: 校验当日配额 -> 记录动作 -> 发放投票奖励
pub async fn cast_vote(
    balance: web::Data<BalanceService>,
    entitlements: web::Data<EntitlementService>,
    economy: web::Data<EconomyConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();

    let remaining = match entitlements.remaining_today(user_id, PackType::Vote).await {
        Ok(v) => v,
        Err(e) => return Ok(e.error_response()),
    };
    if remaining <= 0 {
        return Ok(AppError::QuotaExhausted.error_response());
    }

    let event = match entitlements
        .record_action(user_id, ActivityAction::Vote, None)
        .await
    {
        Ok(e) => e,
        Err(e) => return Ok(e.error_response()),
    };

    let reward = economy.vote_reward;
    if reward > 0
        && let Err(e) = balance
            .credit(
                user_id,
                reward,
                "voting",
                Some("Vote reward".to_string()),
                None,
                Some((event.id, "vote_event")),
            )
            .await
    {
        return Ok(e.error_response());
    }

    let new_balance = match balance.get_balance(user_id).await {
        Ok(v) => v,
        Err(e) => return Ok(e.error_response()),
    };

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": VoteResponse {
            reward,
            balance: new_balance,
            quota_remaining: remaining - 1,
        }
    })))
}

/// 路由配置
pub fn vote_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/{user_id}/votes", web::post().to(cast_vote));
}
