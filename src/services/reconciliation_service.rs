use std::collections::HashMap;

use diesel::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::dtos::IncomingDeposit;
use crate::models::entities::{Member, NewBankTransaction, NewDepositHistory};
use crate::models::enums::{DepositEntryType, MatchStatus};
use crate::repositories::bank_transaction_repository::BankTransactionRepository;
use crate::repositories::deposit_history_repository::DepositHistoryRepository;
use crate::repositories::member_repository::MemberRepository;

/// Totals for one reconciliation run. `processed` counts rows that
/// received a disposition in this run; rows whose `bkcode` was seen
/// before are counted in `skipped` and left untouched.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct BatchSummary {
    pub processed: usize,
    pub credited: usize,
    pub duplicates: usize,
    pub unmatched: usize,
    pub skipped: usize,
    pub credited_member_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    AlreadyProcessed,
    Credited { member_id: i32, balance_after: i64 },
    MatchedUncharged { member_id: i32 },
    DuplicateName { candidate_ids: Vec<i32> },
    Unmatched,
}

/// Strips every Unicode whitespace character so that "홍 길동" and
/// "홍길동" compare equal. Bank exports pad depositor names freely.
pub fn fold_name(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

pub struct ReconciliationService;

impl ReconciliationService {
    /// Runs one reconciliation pass over `rows`, sequentially. Each row
    /// commits in its own transaction; a database failure aborts the
    /// whole run and is propagated. Re-running the same batch is safe:
    /// the `bkcode` uniqueness guard turns replays into skips.
    pub fn process_batch(
        conn: &mut SqliteConnection,
        rows: &[IncomingDeposit],
    ) -> Result<BatchSummary, ApiError> {
        let members = MemberRepository::find_all(conn)?;
        let mut by_folded_name: HashMap<String, Vec<&Member>> = HashMap::new();
        for member in &members {
            by_folded_name
                .entry(fold_name(&member.name))
                .or_default()
                .push(member);
        }

        let mut summary = BatchSummary::default();

        for row in rows {
            match Self::process_row(conn, &by_folded_name, row)? {
                RowOutcome::AlreadyProcessed => {
                    info!(bkcode = %row.bkcode, "Deposit already processed, skipping");
                    summary.skipped += 1;
                }
                RowOutcome::Credited {
                    member_id,
                    balance_after,
                } => {
                    info!(
                        bkcode = %row.bkcode,
                        depositor = %row.bkjukyo,
                        member_id,
                        amount = row.bkinput,
                        balance_after,
                        "Deposit credited"
                    );
                    summary.processed += 1;
                    summary.credited += 1;
                    summary.credited_member_ids.push(member_id);
                }
                RowOutcome::MatchedUncharged { member_id } => {
                    info!(
                        bkcode = %row.bkcode,
                        depositor = %row.bkjukyo,
                        member_id,
                        "Zero-amount deposit matched, nothing credited"
                    );
                    summary.processed += 1;
                }
                RowOutcome::DuplicateName { candidate_ids } => {
                    warn!(
                        bkcode = %row.bkcode,
                        depositor = %row.bkjukyo,
                        ?candidate_ids,
                        "Depositor name matches several members, left for operator"
                    );
                    summary.processed += 1;
                    summary.duplicates += 1;
                }
                RowOutcome::Unmatched => {
                    warn!(
                        bkcode = %row.bkcode,
                        depositor = %row.bkjukyo,
                        "Depositor name matches no member, left for operator"
                    );
                    summary.processed += 1;
                    summary.unmatched += 1;
                }
            }
        }

        info!(
            processed = summary.processed,
            credited = summary.credited,
            duplicates = summary.duplicates,
            unmatched = summary.unmatched,
            skipped = summary.skipped,
            "Reconciliation run finished"
        );

        Ok(summary)
    }

    fn process_row(
        conn: &mut SqliteConnection,
        by_folded_name: &HashMap<String, Vec<&Member>>,
        row: &IncomingDeposit,
    ) -> Result<RowOutcome, ApiError> {
        if BankTransactionRepository::exists_by_bkcode(conn, &row.bkcode)? {
            return Ok(RowOutcome::AlreadyProcessed);
        }

        let folded = fold_name(&row.bkjukyo);
        let candidates: &[&Member] = by_folded_name
            .get(&folded)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);

        let result = conn.transaction::<RowOutcome, ApiError, _>(|conn| match candidates {
            // Exactly one member and real money in: credit, ledger, audit.
            [member] if row.bkinput > 0 => {
                BankTransactionRepository::insert(
                    conn,
                    &Self::audit_row(row, MatchStatus::Matched, Some(member.id), true),
                )?;
                let balance_after =
                    MemberRepository::credit_deposit(conn, member.id, row.bkinput)?;
                DepositHistoryRepository::insert(
                    conn,
                    NewDepositHistory {
                        member_id: member.id,
                        entry_type: DepositEntryType::Charge,
                        amount: row.bkinput,
                        balance_after,
                        description: format!("무통장입금 ({})", row.bkjukyo),
                    },
                )?;
                Ok(RowOutcome::Credited {
                    member_id: member.id,
                    balance_after,
                })
            }
            // Unique name match on a withdrawal-echo row: audited, never credited.
            [member] => {
                BankTransactionRepository::insert(
                    conn,
                    &Self::audit_row(row, MatchStatus::Matched, Some(member.id), false),
                )?;
                Ok(RowOutcome::MatchedUncharged { member_id: member.id })
            }
            [] => {
                BankTransactionRepository::insert(
                    conn,
                    &Self::audit_row(row, MatchStatus::Unmatched, None, false),
                )?;
                Ok(RowOutcome::Unmatched)
            }
            several => {
                BankTransactionRepository::insert(
                    conn,
                    &Self::audit_row(row, MatchStatus::DuplicateName, None, false),
                )?;
                Ok(RowOutcome::DuplicateName {
                    candidate_ids: several.iter().map(|m| m.id).collect(),
                })
            }
        });

        // The UNIQUE constraint on bkcode is the idempotency backstop: a
        // violation means the row landed in an earlier run, so the whole
        // per-row transaction (credit included) has been rolled back.
        match result {
            Err(ApiError::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ))) => Ok(RowOutcome::AlreadyProcessed),
            other => other,
        }
    }

    fn audit_row(
        row: &IncomingDeposit,
        match_status: MatchStatus,
        matched_member_id: Option<i32>,
        deposit_charged: bool,
    ) -> NewBankTransaction {
        NewBankTransaction {
            bkcode: row.bkcode.clone(),
            bkjukyo: row.bkjukyo.clone(),
            bkinput: row.bkinput,
            bkoutput: row.bkoutput,
            match_status,
            matched_member_id,
            deposit_charged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_name_strips_ascii_spaces() {
        assert_eq!(fold_name("홍 길동"), "홍길동");
        assert_eq!(fold_name("  홍길동  "), "홍길동");
    }

    #[test]
    fn fold_name_strips_unicode_whitespace() {
        // Ideographic space and no-break space both count.
        assert_eq!(fold_name("홍\u{3000}길동"), "홍길동");
        assert_eq!(fold_name("홍\u{a0}길동"), "홍길동");
        assert_eq!(fold_name("김\t철\n수"), "김철수");
    }

    #[test]
    fn fold_name_keeps_non_whitespace_intact() {
        assert_eq!(fold_name("Fruit-Co. 청과"), "Fruit-Co.청과");
    }
}
