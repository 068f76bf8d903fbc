//! Redis counter store - the distributed backend.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Script};

use tollgate_core::ports::{CounterStore, StoreError, WindowState};

/// Lua script for one counter hit.
///
/// INCR and PEXPIRE must happen in one atomic step: run as two commands,
/// two concurrent hits could both observe a fresh key and only one window
/// would ever be armed. The script also re-arms an expiry that was lost
/// (a counter with no TTL would deny forever once over capacity).
/// Returns `{count, ttl_ms}`.
const HIT_SCRIPT: &str = r#"
local count = redis.call('INCR', KEYS[1])
if count == 1 then
    redis.call('PEXPIRE', KEYS[1], ARGV[1])
end
local ttl = redis.call('PTTL', KEYS[1])
if ttl < 0 then
    redis.call('PEXPIRE', KEYS[1], ARGV[1])
    ttl = tonumber(ARGV[1])
end
return {count, ttl}
"#;

/// Redis counter store configuration.
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Redis or Valkey connection URL.
    pub url: String,
    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,
    /// Timeout for a single counter hit round trip. Exceeding it is store
    /// unavailability, never an implicit admit or deny.
    pub command_timeout: Duration,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(1),
        }
    }
}

impl RedisStoreConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("TOLLGATE_REDIS_URL").unwrap_or(defaults.url),
            connect_timeout: Duration::from_millis(
                std::env::var("TOLLGATE_REDIS_CONNECT_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.connect_timeout.as_millis() as u64),
            ),
            command_timeout: Duration::from_millis(
                std::env::var("TOLLGATE_REDIS_COMMAND_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.command_timeout.as_millis() as u64),
            ),
        }
    }
}

/// Counter store backed by a shared Redis (or Valkey) instance.
///
/// One long-lived connection per process: the connection manager
/// multiplexes all in-flight hits and reconnects on failure, so the store
/// is safe to share across every concurrent evaluation without locking.
pub struct RedisCounterStore {
    conn: ConnectionManager,
    script: Script,
    command_timeout: Duration,
}

impl RedisCounterStore {
    pub async fn connect(config: RedisStoreConfig) -> Result<Self, StoreError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // Use timeout to prevent hanging if the server is unreachable
        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| StoreError::Timeout(config.connect_timeout))?
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis counter store");

        Ok(Self {
            conn,
            script: Script::new(HIT_SCRIPT),
            command_timeout: config.command_timeout,
        })
    }

    /// Connect using environment configuration.
    pub async fn from_env() -> Result<Self, StoreError> {
        Self::connect(RedisStoreConfig::from_env()).await
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn hit(&self, key: &str, window: Duration) -> Result<WindowState, StoreError> {
        let mut conn = self.conn.clone();

        let mut script_call = self.script.key(key);
        script_call.arg(window.as_millis() as u64);
        let invocation = script_call.invoke_async(&mut conn);

        let reply: Vec<i64> = tokio::time::timeout(self.command_timeout, invocation)
            .await
            .map_err(|_| StoreError::Timeout(self.command_timeout))?
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        let count = reply.first().copied().unwrap_or(1).max(1) as u64;
        let ttl_ms = reply.get(1).copied().unwrap_or(0).max(0) as u64;

        Ok(WindowState {
            count,
            expires_in: Duration::from_millis(ttl_ms),
        })
    }
}
