pub mod bank_transactions;
pub mod deposit_history;
pub mod deposits;
pub mod events;
pub mod health;
