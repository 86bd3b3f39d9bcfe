use diesel::prelude::*;

use crate::error::ApiError;
use crate::models::entities::{Member, NewMember};
use crate::schema::members;

pub struct MemberRepository;

impl MemberRepository {
    pub fn create(conn: &mut SqliteConnection, new_member: NewMember) -> Result<Member, ApiError> {
        let member = diesel::insert_into(members::table)
            .values(&new_member)
            .get_result::<Member>(conn)?;
        Ok(member)
    }

    pub fn find_by_id(conn: &mut SqliteConnection, member_id: i32) -> Result<Option<Member>, ApiError> {
        let member = members::table
            .find(member_id)
            .first::<Member>(conn)
            .optional()?;
        Ok(member)
    }

    pub fn find_all(conn: &mut SqliteConnection) -> Result<Vec<Member>, ApiError> {
        let all = members::table
            .order(members::id.asc())
            .load::<Member>(conn)?;
        Ok(all)
    }

    /// Adds `amount` to the member's balance and returns the balance
    /// after the update. Must run inside the caller's transaction so the
    /// returned snapshot matches the ledger row written next to it.
    pub fn credit_deposit(
        conn: &mut SqliteConnection,
        member_id: i32,
        amount: i64,
    ) -> Result<i64, ApiError> {
        let balance_after = diesel::update(members::table.find(member_id))
            .set(members::deposit.eq(members::deposit + amount))
            .returning(members::deposit)
            .get_result::<i64>(conn)?;
        Ok(balance_after)
    }
}
