//! A `Bus` implementation backed by Redis: key/value with TTL via
//! `SET ... EX`, pub/sub via Redis channels. Matches the spec's treatment
//! of Bus as best-effort — connection errors are surfaced as `BusError`
//! and are expected to be swallowed/logged by callers.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use kernel::{Bus, BusError, BusResult, ChangeEvent};
use redis::AsyncCommands;

const INVALIDATION_CHANNEL: &str = "invalidation";

pub struct RedisBus {
    client: redis::Client,
}

impl RedisBus {
    pub fn new(redis_url: &str) -> BusResult<Self> {
        let client = redis::Client::open(redis_url).map_err(|err| BusError::Unavailable(err.to_string()))?;
        Ok(Self { client })
    }

    async fn connection(&self) -> BusResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| BusError::Unavailable(err.to_string()))
    }
}

#[async_trait]
impl Bus for RedisBus {
    async fn get(&self, key: &str) -> BusResult<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        conn.get(key).await.map_err(|err| BusError::Unavailable(err.to_string()))
    }

    async fn set_ttl(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> BusResult<()> {
        let mut conn = self.connection().await?;
        if ttl_secs == 0 {
            let _: () = conn.set(key, value).await.map_err(|err| BusError::Unavailable(err.to_string()))?;
        } else {
            let _: () = conn
                .set_ex(key, value, ttl_secs)
                .await
                .map_err(|err| BusError::Unavailable(err.to_string()))?;
        }
        Ok(())
    }

    async fn del(&self, key: &str) -> BusResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(key).await.map_err(|err| BusError::Unavailable(err.to_string()))?;
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> BusResult<Vec<String>> {
        let mut conn = self.connection().await?;
        let pattern = format!("{prefix}*");
        let keys: Vec<String> = conn
            .keys(pattern)
            .await
            .map_err(|err| BusError::Unavailable(err.to_string()))?;
        Ok(keys)
    }

    async fn publish(&self, event: ChangeEvent) -> BusResult<()> {
        let payload = serde_json::to_vec(&event).map_err(|err| BusError::Serialization(err.to_string()))?;
        let mut conn = self.connection().await?;
        let _: () = conn
            .publish(INVALIDATION_CHANNEL, payload)
            .await
            .map_err(|err| BusError::Unavailable(err.to_string()))?;
        Ok(())
    }

    async fn subscribe(&self) -> BusResult<BoxStream<'static, ChangeEvent>> {
        let client = self.client.clone();
        let pubsub = match client.get_async_pubsub().await {
            Ok(mut pubsub) => {
                if let Err(err) = pubsub.subscribe(INVALIDATION_CHANNEL).await {
                    tracing::warn!(error = %err, "failed to subscribe to invalidation channel");
                    return Ok(Box::pin(stream::empty()));
                }
                pubsub
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to open redis pub/sub connection");
                return Ok(Box::pin(stream::empty()));
            }
        };

        let stream = pubsub.into_on_message().filter_map(|msg| async move {
            let payload: Vec<u8> = msg.get_payload().ok()?;
            serde_json::from_slice::<ChangeEvent>(&payload).ok()
        });
        Ok(Box::pin(stream))
    }
}
