use crate::{Session, SessionStore, SessionUpdate};
use async_trait::async_trait;
use fred::prelude::*;
use retail_core::{RetailError, Result};

const KEY_PREFIX: &str = "session:";

/// Session storage delegated to a TTL-capable Redis cache.
///
/// Records are stored as JSON under `session:<id>` and every write re-arms
/// the TTL, so expiry is enforced by the cache itself and
/// [`SessionStore::cleanup_expired`] has nothing to sweep.
pub struct RedisSessionStore {
    client: Client,
    ttl_seconds: i64,
}

impl RedisSessionStore {
    /// Connect to the cache at `url` (e.g. `redis://localhost:6379/0`).
    pub async fn connect(url: &str, ttl_hours: i64) -> Result<Self> {
        let config = Config::from_url(url).map_err(cache_err)?;
        let client = Builder::from_config(config).build().map_err(cache_err)?;
        client.init().await.map_err(cache_err)?;

        tracing::info!("session store connected to redis");
        Ok(Self { client, ttl_seconds: ttl_hours * 3600 })
    }

    fn key(session_id: &str) -> String {
        format!("{KEY_PREFIX}{session_id}")
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let payload = serde_json::to_string(session)?;
        let _: () = self
            .client
            .set(
                Self::key(&session.session_id),
                payload,
                Some(Expiration::EX(self.ttl_seconds)),
                None,
                false,
            )
            .await
            .map_err(cache_err)?;
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<Session>> {
        let raw: Option<String> =
            self.client.get(Self::key(session_id)).await.map_err(cache_err)?;
        raw.map(|payload| serde_json::from_str(&payload)).transpose().map_err(Into::into)
    }
}

fn cache_err(err: Error) -> RetailError {
    RetailError::Session(err.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, customer_id: &str) -> Result<Session> {
        let session = Session::new(customer_id);
        self.save(&session).await?;

        tracing::info!(
            session_id = %session.session_id,
            customer_id = %session.customer_id,
            "created session"
        );
        Ok(session)
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>> {
        self.load(session_id).await
    }

    async fn update(&self, session_id: &str, update: SessionUpdate) -> Result<()> {
        if let Some(mut session) = self.load(session_id).await? {
            update.apply(&mut session);
            session.touch();
            self.save(&session).await?;
        }
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<bool> {
        let removed: i64 = self.client.del(Self::key(session_id)).await.map_err(cache_err)?;
        if removed > 0 {
            tracing::info!(session_id = %session_id, "deleted session");
        }
        Ok(removed > 0)
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        // The cache expires keys natively; nothing to sweep here.
        Ok(0)
    }

    async fn active_count(&self) -> Result<usize> {
        let keys: Vec<String> = self
            .client
            .custom(fred::cmd!("KEYS"), vec![format!("{KEY_PREFIX}*")])
            .await
            .map_err(cache_err)?;
        Ok(keys.len())
    }
}
