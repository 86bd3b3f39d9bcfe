pub mod db_pool;
pub mod server;
pub mod shutdown;
pub mod tasks;
