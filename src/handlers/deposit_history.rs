use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::dtos::ErrorResponse;
use crate::models::entities::DepositHistory;
use crate::models::AppState;
use crate::repositories::deposit_history_repository::DepositHistoryRepository;
use crate::repositories::member_repository::MemberRepository;

#[utoipa::path(
    get,
    path = "/api/members/{member_id}/deposit-history",
    tag = "Deposits",
    summary = "Ledger entries for one member",
    description = "Append-only balance history, newest first. Summing the amounts in creation \
                   order reconstructs the member's current balance.",
    operation_id = "memberDepositHistory",
    params(
        ("member_id" = i32, Path, description = "Member id"),
    ),
    responses(
        (status = 200, description = "Ledger entries", body = [DepositHistory]),
        (status = 404, description = "No such member", body = ErrorResponse),
    ),
)]
pub async fn member_deposit_history(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<i32>,
) -> Result<Json<Vec<DepositHistory>>, ApiError> {
    let mut conn = state.db.get()?;

    MemberRepository::find_by_id(&mut conn, member_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Member {} not found", member_id)))?;

    let entries = DepositHistoryRepository::list_for_member(&mut conn, member_id)?;
    Ok(Json(entries))
}
