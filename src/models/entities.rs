use crate::models::enums::{DepositEntryType, MatchStatus};
use crate::schema::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Queryable, Insertable, Selectable, Identifiable, Debug, Clone)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = crate::schema::members)]
pub struct Member {
    pub id: i32,
    pub login_id: String,
    pub name: String,
    pub company_name: String,
    pub deposit: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Serialize, Debug, Clone)]
#[diesel(table_name = crate::schema::members)]
pub struct NewMember {
    pub login_id: String,
    pub name: String,
    pub company_name: String,
    pub deposit: i64,
}

// Audit record, one row per external bank transaction. Immutable once
// written apart from the match fields set during the reconciliation pass.
#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, Serialize, ToSchema,
)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = bank_transactions)]
pub struct BankTransaction {
    pub id: i32,
    pub bkcode: String,
    pub bkjukyo: String,
    pub bkinput: i64,
    pub bkoutput: i64,
    pub match_status: MatchStatus,
    pub matched_member_id: Option<i32>,
    pub deposit_charged: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = bank_transactions)]
pub struct NewBankTransaction {
    pub bkcode: String,
    pub bkjukyo: String,
    pub bkinput: i64,
    pub bkoutput: i64,
    pub match_status: MatchStatus,
    pub matched_member_id: Option<i32>,
    pub deposit_charged: bool,
}

// Append-only ledger. Summing `amount` in creation order must
// reconstruct the member's current balance.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, ToSchema)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = deposit_history)]
pub struct DepositHistory {
    pub id: i32,
    pub member_id: i32,
    pub entry_type: DepositEntryType,
    pub amount: i64,
    pub balance_after: i64,
    pub description: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = deposit_history)]
pub struct NewDepositHistory {
    pub member_id: i32,
    pub entry_type: DepositEntryType,
    pub amount: i64,
    pub balance_after: i64,
    pub description: String,
}
