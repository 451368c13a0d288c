use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::UserService;
use crate::domain::{User, UserCreate, UserId, UserPatch, UserStatus};
use crate::error::UserResult;

pub const DEFAULT_LIST_TTL: Duration = Duration::from_secs(600);

struct CachedList {
    users: Vec<User>,
    stored_at: Instant,
}

/// Caches `list_users` results per status filter for a fixed window.
///
/// Mutations do not invalidate entries, so a list may be stale for up to
/// `ttl`. Expiry is checked on access; nothing runs in the background.
pub struct ListCacheService<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<Option<UserStatus>, CachedList>>,
}

impl<S: UserService> ListCacheService<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[allow(dead_code)]
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: UserService> UserService for ListCacheService<S> {
    async fn get_user(&self, id: UserId) -> UserResult<User> {
        self.inner.get_user(id).await
    }

    async fn create_user(&self, request: UserCreate) -> UserResult<User> {
        self.inner.create_user(request).await
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> UserResult<User> {
        self.inner.update_user(id, patch).await
    }

    async fn delete_user(&self, id: UserId) -> UserResult<bool> {
        self.inner.delete_user(id).await
    }

    async fn list_users(&self, status: Option<UserStatus>) -> UserResult<Vec<User>> {
        // Held across the refill so each filter is computed once per window.
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        if let Some(cached) = entries.get(&status) {
            if now.duration_since(cached.stored_at) < self.ttl {
                debug!(?status, "Serving cached user list");
                return Ok(cached.users.clone());
            }
        }

        let users = self.inner.list_users(status).await?;
        entries.insert(
            status,
            CachedList {
                users: users.clone(),
                stored_at: now,
            },
        );
        Ok(users)
    }

    async fn search_users(&self, query: &str) -> UserResult<Vec<User>> {
        self.inner.search_users(query).await
    }

    fn user_count(&self) -> usize {
        self.inner.user_count()
    }
}
