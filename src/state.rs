use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::config::Config;
use crate::db::{self, Db};
use crate::error::Result;
use crate::models::session::Session;

/// A cache of live bearer sessions, keyed by token.
#[derive(Clone, Default)]
pub struct SessionCache {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionCache {
    /// Creates a new, empty `SessionCache`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a live session by token, evicting it if it has expired.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.read().await.get(token).cloned()?;

        if session.is_expired() {
            tracing::warn!("❌ Session expired for user: {}", session.user_id);
            self.remove(token).await;
            return None;
        }

        Some(session)
    }

    /// Inserts a session under `token`, pruning every expired session first.
    ///
    /// Clients sign out locally, so abandoned tokens are only ever reclaimed here.
    pub async fn insert(&self, token: String, session: Session) {
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!("🧹 Pruned {} expired sessions", pruned);
        }

        sessions.insert(token, session);
    }

    /// Removes the session stored under `token`.
    pub async fn remove(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Removes every session belonging to `user_id`.
    pub async fn remove_user(&self, user_id: &str) {
        self.sessions
            .write()
            .await
            .retain(|_, session| session.user_id != user_id);
    }
}

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The registry tables.
    pub db: Db,
    /// The bearer session cache.
    pub sessions: SessionCache,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_database(&config.seed_password).await?;
        tracing::info!("✅ In-memory registry initialized");

        let sessions = SessionCache::new();
        tracing::info!("✅ Session cache initialized");

        Ok(AppState {
            db,
            sessions,
            config: config.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_prunes_expired_sessions() {
        let cache = SessionCache::new();
        for i in 0..100 {
            cache
                .sessions
                .write()
                .await
                .insert(format!("stale-{}", i), Session::new("1".to_string(), -1));
        }

        cache.insert("live".to_string(), Session::new("2".to_string(), 7)).await;

        assert_eq!(cache.sessions.read().await.len(), 1);
        assert_eq!(cache.get("live").await.map(|s| s.user_id), Some("2".to_string()));
    }

    #[tokio::test]
    async fn get_evicts_an_expired_token() {
        let cache = SessionCache::new();
        cache
            .sessions
            .write()
            .await
            .insert("old".to_string(), Session::new("1".to_string(), -1));

        assert!(cache.get("old").await.is_none());
        assert!(cache.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn remove_user_drops_every_session_of_that_user() {
        let cache = SessionCache::new();
        cache.insert("a".to_string(), Session::new("1".to_string(), 7)).await;
        cache.insert("b".to_string(), Session::new("1".to_string(), 7)).await;
        cache.insert("c".to_string(), Session::new("2".to_string(), 7)).await;

        cache.remove_user("1").await;

        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_none());
        assert!(cache.get("c").await.is_some());
    }
}
