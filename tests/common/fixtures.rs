use diesel::SqliteConnection;
use fruitline::models::dtos::IncomingDeposit;
use fruitline::models::entities::{Member, NewMember};
use fruitline::repositories::member_repository::MemberRepository;

/// Insert a member with the given display name and an empty balance.
#[allow(dead_code)]
pub fn create_member(conn: &mut SqliteConnection, login_id: &str, name: &str) -> Member {
    create_member_with_deposit(conn, login_id, name, 0)
}

#[allow(dead_code)]
pub fn create_member_with_deposit(
    conn: &mut SqliteConnection,
    login_id: &str,
    name: &str,
    deposit: i64,
) -> Member {
    MemberRepository::create(
        conn,
        NewMember {
            login_id: login_id.to_string(),
            name: name.to_string(),
            company_name: format!("{} 상회", name),
            deposit,
        },
    )
    .expect("Failed to insert test member")
}

/// A deposit row shaped the way the banking portal exports it.
#[allow(dead_code)]
pub fn bank_row(bkcode: &str, bkjukyo: &str, bkinput: i64) -> IncomingDeposit {
    IncomingDeposit {
        bkcode: bkcode.to_string(),
        bkjukyo: bkjukyo.to_string(),
        bkinput,
        bkoutput: 0,
    }
}
