use axum::extract::{Json, State};
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use validator::Validate;

use crate::error::ApiError;
use crate::events::EventName;
use crate::models::dtos::{DepositSyncRequest, ErrorResponse};
use crate::models::enums::ClientRole;
use crate::models::AppState;
use crate::repositories::member_repository::MemberRepository;
use crate::services::reconciliation_service::{BatchSummary, ReconciliationService};

#[utoipa::path(
    post,
    path = "/api/admin/deposits/sync",
    tag = "Deposits",
    summary = "Run a deposit reconciliation batch",
    description = "Matches incoming bank rows against members by folded depositor name, credits \
                   unique matches and records every row's disposition. Replaying a batch is safe: \
                   rows whose bkcode was seen before are skipped.",
    operation_id = "syncDeposits",
    request_body = DepositSyncRequest,
    responses(
        (status = 200, description = "Batch processed", body = BatchSummary),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Reconciliation run aborted", body = ErrorResponse),
    ),
)]
pub async fn sync_deposits(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DepositSyncRequest>,
) -> Result<Json<BatchSummary>, ApiError> {
    req.validate().map_err(|e| {
        error!("Validation error: {}", e);
        ApiError::Validation(e)
    })?;

    // The engine is synchronous Diesel code; run it on the blocking pool
    // and resolve credited balances there too, in the same borrow of the
    // connection.
    let rows = req.transactions;
    let db = state.db.clone();
    let (summary, balances) =
        tokio::task::spawn_blocking(move || -> Result<(BatchSummary, Vec<(i32, i64)>), ApiError> {
            let mut conn = db.get()?;
            let summary = ReconciliationService::process_batch(&mut conn, &rows)?;

            let mut balances = Vec::with_capacity(summary.credited_member_ids.len());
            for member_id in &summary.credited_member_ids {
                if let Some(member) = MemberRepository::find_by_id(&mut conn, *member_id)? {
                    balances.push((member.id, member.deposit));
                }
            }
            Ok((summary, balances))
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Reconciliation task failed: {}", e)))??;

    // Publish only after every row has committed. Listeners re-fetch
    // through the API, so payloads stay small.
    state
        .events
        .deliver_to_role(ClientRole::User, EventName::DepositsUpdated, &summary);
    for (member_id, deposit) in balances {
        state.events.deliver_to_member(
            member_id,
            EventName::MemberBalanceUpdated,
            &json!({ "member_id": member_id, "deposit": deposit }),
        );
    }

    Ok(Json(summary))
}
