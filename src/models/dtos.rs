use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::enums::ClientRole;

// Request DTOs

/// One bank row as exported by the banking portal. `bkcode` is the
/// bank's own transaction code and the idempotency key.
#[derive(Deserialize, Serialize, ToSchema, Validate, Debug, Clone)]
pub struct IncomingDeposit {
    #[validate(length(min = 1, message = "bkcode must not be empty"))]
    pub bkcode: String,
    #[validate(length(min = 1, message = "depositor name must not be empty"))]
    pub bkjukyo: String,
    #[validate(range(min = 0, message = "bkinput must not be negative"))]
    pub bkinput: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "bkoutput must not be negative"))]
    pub bkoutput: i64,
}

#[derive(Deserialize, ToSchema, Validate, Debug)]
pub struct DepositSyncRequest {
    #[validate(length(min = 1, message = "transactions must not be empty"))]
    #[validate(nested)]
    pub transactions: Vec<IncomingDeposit>,
}

/// Identity of an event-stream subscriber. The reverse proxy in front of
/// this service resolves the session and forwards these as query
/// parameters; they are trusted as-is.
#[derive(Deserialize, ToSchema, Debug, Clone)]
pub struct EventStreamParams {
    pub role: ClientRole,
    pub user_id: Option<i32>,
    pub vendor_id: Option<i32>,
}

#[derive(Deserialize, Debug)]
pub struct BankTransactionQuery {
    pub status: Option<String>,
}

// Response DTOs

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
