use diesel::dsl::exists;
use diesel::prelude::*;

use crate::error::ApiError;
use crate::models::entities::{BankTransaction, NewBankTransaction};
use crate::models::enums::MatchStatus;
use crate::schema::bank_transactions;

pub struct BankTransactionRepository;

impl BankTransactionRepository {
    pub fn exists_by_bkcode(conn: &mut SqliteConnection, code: &str) -> Result<bool, ApiError> {
        let found = diesel::select(exists(
            bank_transactions::table.filter(bank_transactions::bkcode.eq(code)),
        ))
        .get_result::<bool>(conn)?;
        Ok(found)
    }

    pub fn insert(
        conn: &mut SqliteConnection,
        record: &NewBankTransaction,
    ) -> Result<(), ApiError> {
        diesel::insert_into(bank_transactions::table)
            .values(record)
            .execute(conn)?;
        Ok(())
    }

    pub fn find_by_bkcode(
        conn: &mut SqliteConnection,
        code: &str,
    ) -> Result<Option<BankTransaction>, ApiError> {
        let row = bank_transactions::table
            .filter(bank_transactions::bkcode.eq(code))
            .first::<BankTransaction>(conn)
            .optional()?;
        Ok(row)
    }

    /// Audit listing, newest first. `status` narrows to one disposition
    /// (operators mostly ask for `duplicate_name` and `unmatched`).
    pub fn list(
        conn: &mut SqliteConnection,
        status: Option<MatchStatus>,
    ) -> Result<Vec<BankTransaction>, ApiError> {
        let mut query = bank_transactions::table.into_boxed();
        if let Some(status) = status {
            query = query.filter(bank_transactions::match_status.eq(status));
        }
        let rows = query
            .order((
                bank_transactions::created_at.desc(),
                bank_transactions::id.desc(),
            ))
            .load::<BankTransaction>(conn)?;
        Ok(rows)
    }
}
