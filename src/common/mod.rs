pub mod axum_ip;
pub mod axum_json;
pub mod context;
pub mod env;
pub mod error;
pub mod init;
pub mod redis_json;
pub mod redis_pool;
pub mod sanitize;
pub mod state;
