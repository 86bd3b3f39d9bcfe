use crate::handlers::{
    bank_transactions::__path_list_bank_transactions,
    deposit_history::__path_member_deposit_history, deposits::__path_sync_deposits,
    events::__path_subscribe_events, health::__path_health_check,
};
use crate::models::dtos::{DepositSyncRequest, ErrorResponse, HealthStatus, IncomingDeposit};
use crate::models::entities::{BankTransaction, DepositHistory};
use crate::models::enums::{ClientRole, DepositEntryType, MatchStatus};
use crate::services::reconciliation_service::BatchSummary;
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        subscribe_events,
        sync_deposits,
        list_bank_transactions,
        member_deposit_history
    ),
    components(schemas(
        DepositSyncRequest,
        IncomingDeposit,
        BatchSummary,
        BankTransaction,
        DepositHistory,
        MatchStatus,
        DepositEntryType,
        ClientRole,
        HealthStatus,
        ErrorResponse
    )),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Events", description = "Realtime event stream"),
        (name = "Deposits", description = "Bank deposit reconciliation and audit")
    )
)]
pub struct ApiDoc;

/// The OpenAPI document is the API contract; it is served directly as
/// JSON without a bundled UI.
pub async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
