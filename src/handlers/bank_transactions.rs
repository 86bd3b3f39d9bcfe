use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::dtos::{BankTransactionQuery, ErrorResponse};
use crate::models::entities::BankTransaction;
use crate::models::enums::MatchStatus;
use crate::models::AppState;
use crate::repositories::bank_transaction_repository::BankTransactionRepository;

#[utoipa::path(
    get,
    path = "/api/admin/bank-transactions",
    tag = "Deposits",
    summary = "List audited bank transactions",
    description = "Newest first. Operators filter on `duplicate_name` or `unmatched` to work \
                   through rows the reconciliation pass could not credit.",
    operation_id = "listBankTransactions",
    params(
        ("status" = Option<String>, Query, description = "matched, duplicate_name or unmatched"),
    ),
    responses(
        (status = 200, description = "Audit rows", body = [BankTransaction]),
        (status = 400, description = "Unknown status value", body = ErrorResponse),
    ),
)]
pub async fn list_bank_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BankTransactionQuery>,
) -> Result<Json<Vec<BankTransaction>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(MatchStatus::parse)
        .transpose()?;

    let mut conn = state.db.get()?;
    let rows = BankTransactionRepository::list(&mut conn, status)?;
    Ok(Json(rows))
}
