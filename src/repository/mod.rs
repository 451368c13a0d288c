//! Storage abstraction for users.
//!
//! The service only ever sees [`UserRepository`]; [`MemoryUserRepository`]
//! is the one variant shipped here.

pub mod memory;

pub use memory::*;

use async_trait::async_trait;

use crate::domain::{User, UserId};
use crate::error::RepositoryResult;

/// Persistence operations, free of business rules.
///
/// Errors only signal that the store could not be reached. A missing
/// record is `None` (or `false` for `delete`).
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;

    /// Assigns the next id when `user.id` is unset, otherwise overwrites the
    /// entry at that id. Returns the stored record.
    async fn save(&self, user: User) -> RepositoryResult<User>;

    async fn delete(&self, id: UserId) -> RepositoryResult<bool>;

    /// First record whose email equals `email` exactly.
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    async fn list_all(&self) -> RepositoryResult<Vec<User>>;
}
