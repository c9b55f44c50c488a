pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod redis_repo;
pub mod seat_repo;
pub mod trip_repo;

pub use database::DbClient;
pub use redis_repo::RedisClient;

/// One transaction context per request, passed explicitly into every
/// mutating repository call and released on all exit paths.
pub type PgTx<'a> = sqlx::Transaction<'a, sqlx::Postgres>;
