use async_trait::async_trait;
use std::future::Future;
use tracing::{error, info, info_span, Instrument, Span};

use super::UserService;
use crate::domain::{User, UserCreate, UserId, UserPatch, UserStatus};
use crate::error::UserResult;

/// Logs entry, success and failure of every call, then passes the result
/// through untouched.
pub struct LoggingUserService<S> {
    inner: S,
}

impl<S: UserService> LoggingUserService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    #[allow(dead_code)]
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

async fn logged<T, F>(span: Span, call: F) -> UserResult<T>
where
    F: Future<Output = UserResult<T>>,
{
    async move {
        info!("Calling");
        let result = call.await;
        match &result {
            Ok(_) => info!("Completed successfully"),
            Err(e) => error!(error = %e, "Failed"),
        }
        result
    }
    .instrument(span)
    .await
}

#[async_trait]
impl<S: UserService> UserService for LoggingUserService<S> {
    async fn get_user(&self, id: UserId) -> UserResult<User> {
        let span = info_span!("get_user", user_id = id);
        logged(span, self.inner.get_user(id)).await
    }

    async fn create_user(&self, request: UserCreate) -> UserResult<User> {
        let span = info_span!(
            "create_user",
            user_name = %request.name,
            user_email = %request.email,
            metadata = ?request.metadata
        );
        logged(span, self.inner.create_user(request)).await
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> UserResult<User> {
        let span = info_span!("update_user", user_id = id, patch = ?patch);
        logged(span, self.inner.update_user(id, patch)).await
    }

    async fn delete_user(&self, id: UserId) -> UserResult<bool> {
        let span = info_span!("delete_user", user_id = id);
        logged(span, self.inner.delete_user(id)).await
    }

    async fn list_users(&self, status: Option<UserStatus>) -> UserResult<Vec<User>> {
        let span = info_span!("list_users", status = ?status);
        logged(span, self.inner.list_users(status)).await
    }

    async fn search_users(&self, query: &str) -> UserResult<Vec<User>> {
        let span = info_span!("search_users", query);
        logged(span, self.inner.search_users(query)).await
    }

    fn user_count(&self) -> usize {
        self.inner.user_count()
    }
}
