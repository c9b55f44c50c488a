use async_trait::async_trait;
use redis::AsyncCommands;
use ruta_domain::selection::SelectionStore;
use ruta_domain::EngineError;
use uuid::Uuid;

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

fn selection_key(trip_id: Uuid, seat_id: Uuid) -> String {
    format!("select:{}:{}", trip_id, seat_id)
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SelectionStore for RedisClient {
    async fn try_select(
        &self,
        trip_id: Uuid,
        seat_id: Uuid,
        holder: &str,
        ttl_seconds: u64,
    ) -> Result<bool, EngineError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(EngineError::database)?;

        // SET NX: only set if key does not exist
        let result: Option<String> = redis::cmd("SET")
            .arg(selection_key(trip_id, seat_id))
            .arg(holder)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(EngineError::database)?;

        Ok(result.is_some())
    }

    async fn release(
        &self,
        trip_id: Uuid,
        seat_id: Uuid,
        holder: &str,
    ) -> Result<bool, EngineError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(EngineError::database)?;

        // Compare-then-delete must be atomic or a late release could evict
        // a newer holder's selection.
        let script = redis::Script::new(
            r#"
            if redis.call("GET", KEYS[1]) == ARGV[1] then
                return redis.call("DEL", KEYS[1])
            else
                return 0
            end
            "#,
        );

        let deleted: i64 = script
            .key(selection_key(trip_id, seat_id))
            .arg(holder)
            .invoke_async(&mut conn)
            .await
            .map_err(EngineError::database)?;

        Ok(deleted == 1)
    }

    async fn holder_of(
        &self,
        trip_id: Uuid,
        seat_id: Uuid,
    ) -> Result<Option<String>, EngineError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(EngineError::database)?;

        let holder: Option<String> = conn
            .get(selection_key(trip_id, seat_id))
            .await
            .map_err(EngineError::database)?;

        Ok(holder)
    }
}
