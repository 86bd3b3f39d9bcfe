pub mod bank_transaction_repository;
pub mod deposit_history_repository;
pub mod member_repository;
