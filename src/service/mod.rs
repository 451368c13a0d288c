//! Business layer on top of a [`UserRepository`](crate::repository::UserRepository).
//!
//! Cross-cutting behavior is layered by wrapping one service in another:
//!
//! ```text
//! LoggingUserService -> ListCacheService -> CoreUserService -> repository
//! ```

pub mod cache;
pub mod core_service;
pub mod logging;

pub use cache::*;
pub use core_service::*;
pub use logging::*;

use async_trait::async_trait;

use crate::domain::{User, UserCreate, UserId, UserPatch, UserStatus};
use crate::error::UserResult;

#[async_trait]
pub trait UserService: Send + Sync {
    /// Fails with [`UserError::NotFound`](crate::error::UserError::NotFound) when absent.
    async fn get_user(&self, id: UserId) -> UserResult<User>;

    async fn create_user(&self, request: UserCreate) -> UserResult<User>;

    async fn update_user(&self, id: UserId, patch: UserPatch) -> UserResult<User>;

    /// The user must exist; deleting an unknown id is `NotFound`, not `Ok(false)`.
    async fn delete_user(&self, id: UserId) -> UserResult<bool>;

    /// Optionally filtered by status, oldest first.
    async fn list_users(&self, status: Option<UserStatus>) -> UserResult<Vec<User>>;

    /// Case-insensitive substring match on name or email.
    async fn search_users(&self, query: &str) -> UserResult<Vec<User>>;

    /// Users created minus users deleted through this service.
    fn user_count(&self) -> usize;
}
