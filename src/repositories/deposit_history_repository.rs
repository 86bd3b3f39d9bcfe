use diesel::prelude::*;

use crate::error::ApiError;
use crate::models::entities::{DepositHistory, NewDepositHistory};
use crate::schema::deposit_history;

pub struct DepositHistoryRepository;

impl DepositHistoryRepository {
    pub fn insert(conn: &mut SqliteConnection, entry: NewDepositHistory) -> Result<(), ApiError> {
        diesel::insert_into(deposit_history::table)
            .values(&entry)
            .execute(conn)?;
        Ok(())
    }

    pub fn list_for_member(
        conn: &mut SqliteConnection,
        member_id: i32,
    ) -> Result<Vec<DepositHistory>, ApiError> {
        let entries = deposit_history::table
            .filter(deposit_history::member_id.eq(member_id))
            .order((
                deposit_history::created_at.desc(),
                deposit_history::id.desc(),
            ))
            .load::<DepositHistory>(conn)?;
        Ok(entries)
    }
}
