use crate::error::ApiError;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Disposition of a bank transaction after the reconciliation pass.
/// Stored as TEXT; all three values are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
    AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    DuplicateName,
    Unmatched,
}

impl MatchStatus {
    pub fn parse(input: &str) -> Result<Self, ApiError> {
        Self::from_str(input.trim())
            .map_err(|_| ApiError::BadRequest(format!("Unknown match status: {}", input)))
    }
}

impl ToSql<Text, Sqlite> for MatchStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for MatchStatus {
    fn from_sql(value: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        Self::from_str(&s).map_err(|_| format!("Unrecognized match status: {}", s).into())
    }
}

/// Ledger entry kind. The reconciliation flow only writes `charge`;
/// `deduct` and `refund` belong to the order modules sharing this table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
    AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DepositEntryType {
    Charge,
    Deduct,
    Refund,
}

impl ToSql<Text, Sqlite> for DepositEntryType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for DepositEntryType {
    fn from_sql(value: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        Self::from_str(&s).map_err(|_| format!("Unrecognized entry type: {}", s).into())
    }
}

/// Audience bucket for the event stream. Not persisted; arrives as a
/// query parameter on the subscription request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClientRole {
    User,
    Member,
    Partner,
}
