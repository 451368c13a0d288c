use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::UserService;
use crate::domain::{User, UserCreate, UserId, UserPatch, UserStatus};
use crate::error::{UserError, UserResult};
use crate::repository::UserRepository;
use crate::validation::validate_email;

/// Enforces the rules the repository does not: email format and
/// uniqueness on create, existence on update and delete.
///
/// Keeps a read-through id cache and the running user count.
pub struct CoreUserService<R> {
    repository: R,
    cache: Mutex<HashMap<UserId, User>>,
    // Held across the duplicate-email check and the save.
    create_lock: Mutex<()>,
    user_count: AtomicUsize,
}

impl<R: UserRepository> CoreUserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            cache: Mutex::new(HashMap::new()),
            create_lock: Mutex::new(()),
            user_count: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn repository(&self) -> &R {
        &self.repository
    }
}

#[async_trait]
impl<R: UserRepository> UserService for CoreUserService<R> {
    async fn get_user(&self, id: UserId) -> UserResult<User> {
        let cached = self.cache.lock().await.get(&id).cloned();
        if let Some(user) = cached {
            debug!(user_id = id, "Cache hit");
            return Ok(user);
        }

        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        self.cache.lock().await.insert(id, user.clone());
        Ok(user)
    }

    async fn create_user(&self, request: UserCreate) -> UserResult<User> {
        if !validate_email(&request.email) {
            return Err(UserError::ValidationError(format!(
                "Invalid email: {}",
                request.email
            )));
        }

        let _guard = self.create_lock.lock().await;

        if self.repository.find_by_email(&request.email).await?.is_some() {
            return Err(UserError::ValidationError(format!(
                "User with email {} already exists",
                request.email
            )));
        }

        let user = User::new(request.name, request.email)?.with_metadata(request.metadata);
        let saved = self.repository.save(user).await?;

        self.cache.lock().await.insert(saved.id, saved.clone());
        self.user_count.fetch_add(1, Ordering::SeqCst);

        info!(user = %saved.display_name(), user_id = saved.id, "Created user");
        Ok(saved)
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> UserResult<User> {
        let mut user = self.get_user(id).await?;

        // Format only. Uniqueness against other records is not checked here.
        if let Some(email) = &patch.email {
            if !validate_email(email) {
                return Err(UserError::ValidationError(format!("Invalid email: {}", email)));
            }
        }

        user.apply_patch(patch);
        let updated = self.repository.save(user).await?;

        self.cache.lock().await.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_user(&self, id: UserId) -> UserResult<bool> {
        let user = self.get_user(id).await?;
        let removed = self.repository.delete(id).await?;

        if removed {
            self.cache.lock().await.remove(&id);
            let _ = self
                .user_count
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
            info!(user = %user.display_name(), user_id = id, "Deleted user");
        }

        Ok(removed)
    }

    async fn list_users(&self, status: Option<UserStatus>) -> UserResult<Vec<User>> {
        let mut users = self.repository.list_all().await?;
        if let Some(status) = status {
            users.retain(|u| u.status == status);
        }
        users.sort_by_key(|u| u.created_at());
        Ok(users)
    }

    async fn search_users(&self, query: &str) -> UserResult<Vec<User>> {
        let query = query.to_lowercase();
        let users = self.repository.list_all().await?;
        Ok(users
            .into_iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&query) || u.email.to_lowercase().contains(&query)
            })
            .collect())
    }

    fn user_count(&self) -> usize {
        self.user_count.load(Ordering::SeqCst)
    }
}
