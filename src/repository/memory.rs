use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::UserRepository;
use crate::domain::{User, UserId, UNSET_ID};
use crate::error::{RepositoryError, RepositoryResult};
use crate::messages::{RepositoryRequest, Response};

// =============================================================================
// ACTOR
// =============================================================================

/// Owns the user map. Every request is handled to completion before the
/// next one is read, so id assignment needs no locking.
pub struct MemoryRepositoryActor {
    receiver: mpsc::Receiver<RepositoryRequest>,
    // Ids only grow, so key order is insertion order.
    users: BTreeMap<UserId, User>,
    // `None` once `UserId::MAX` has been used.
    next_id: Option<UserId>,
}

impl MemoryRepositoryActor {
    /// `buffer_size` is raised to 1 if zero.
    pub fn new(buffer_size: usize) -> (Self, MemoryUserRepository) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let actor = Self {
            receiver,
            users: BTreeMap::new(),
            next_id: Some(1),
        };
        (actor, MemoryUserRepository::new(sender))
    }

    /// Starts the actor on the runtime and hands back its client.
    pub fn spawn(buffer_size: usize) -> (MemoryUserRepository, JoinHandle<()>) {
        let (actor, repository) = Self::new(buffer_size);
        let handle = tokio::spawn(actor.run());
        (repository, handle)
    }

    /// Runs until every client handle has been dropped.
    #[instrument(name = "memory_repository", skip(self))]
    pub async fn run(mut self) {
        info!("Memory repository starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                RepositoryRequest::GetById { id, respond_to } => {
                    let _ = respond_to.send(self.users.get(&id).cloned());
                }
                RepositoryRequest::Save { user, respond_to } => {
                    let _ = respond_to.send(self.handle_save(user));
                }
                RepositoryRequest::Delete { id, respond_to } => {
                    let removed = self.users.remove(&id).is_some();
                    debug!(user_id = id, removed, "Processed delete request");
                    let _ = respond_to.send(removed);
                }
                RepositoryRequest::FindByEmail { email, respond_to } => {
                    let found = self.users.values().find(|u| u.email == email).cloned();
                    let _ = respond_to.send(found);
                }
                RepositoryRequest::ListAll { respond_to } => {
                    let _ = respond_to.send(self.users.values().cloned().collect());
                }
            }
        }

        info!(stored = self.users.len(), "Memory repository stopped");
    }

    #[instrument(fields(user_id = user.id), skip(self, user))]
    fn handle_save(&mut self, mut user: User) -> RepositoryResult<User> {
        if user.id == UNSET_ID {
            let Some(id) = self.next_id else {
                warn!("Id sequence exhausted");
                return Err(RepositoryError::IdSequenceExhausted);
            };
            user.id = id;
            self.next_id = id.checked_add(1);
            debug!(assigned_id = id, "Assigned new id");
        } else if self.next_id.is_some_and(|next| user.id >= next) {
            // Explicit ids must never be handed out again.
            self.next_id = user.id.checked_add(1);
        }
        self.users.insert(user.id, user.clone());
        Ok(user)
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Cloneable handle to a [`MemoryRepositoryActor`].
#[derive(Clone, Debug)]
pub struct MemoryUserRepository {
    sender: mpsc::Sender<RepositoryRequest>,
}

impl MemoryUserRepository {
    pub(crate) fn new(sender: mpsc::Sender<RepositoryRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> RepositoryRequest,
    ) -> RepositoryResult<T> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| RepositoryError::ActorClosed)?;
        response.await.map_err(|_| RepositoryError::ActorDropped)
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn get_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        self.request(|respond_to| RepositoryRequest::GetById { id, respond_to }).await
    }

    async fn save(&self, user: User) -> RepositoryResult<User> {
        self.request(|respond_to| RepositoryRequest::Save { user, respond_to }).await?
    }

    async fn delete(&self, id: UserId) -> RepositoryResult<bool> {
        self.request(|respond_to| RepositoryRequest::Delete { id, respond_to }).await
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let email = email.to_string();
        self.request(|respond_to| RepositoryRequest::FindByEmail { email, respond_to })
            .await
    }

    async fn list_all(&self) -> RepositoryResult<Vec<User>> {
        self.request(|respond_to| RepositoryRequest::ListAll { respond_to }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str) -> User {
        User::new(name, email).unwrap()
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids_from_one() {
        let (repo, _handle) = MemoryRepositoryActor::spawn(8);

        let alice = repo.save(user("Alice", "alice@example.com")).await.unwrap();
        let bob = repo.save(user("Bob", "bob@example.com")).await.unwrap();

        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(repo.get_by_id(1).await.unwrap(), Some(alice));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let (repo, _handle) = MemoryRepositoryActor::spawn(8);

        let alice = repo.save(user("Alice", "alice@example.com")).await.unwrap();
        assert!(repo.delete(alice.id).await.unwrap());
        assert!(!repo.delete(alice.id).await.unwrap());

        let bob = repo.save(user("Bob", "bob@example.com")).await.unwrap();
        assert_eq!(bob.id, 2);
        assert_eq!(repo.get_by_id(alice.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_with_id_overwrites_in_place() {
        let (repo, _handle) = MemoryRepositoryActor::spawn(8);

        let mut alice = repo.save(user("Alice", "alice@example.com")).await.unwrap();
        repo.save(user("Bob", "bob@example.com")).await.unwrap();

        alice.name = "Alicia".to_string();
        repo.save(alice.clone()).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], alice);
        assert_eq!(all[1].name, "Bob");
    }

    #[tokio::test]
    async fn explicit_ids_advance_the_sequence() {
        let (repo, _handle) = MemoryRepositoryActor::spawn(8);

        let mut imported = user("Imported", "imported@example.com");
        imported.id = 10;
        repo.save(imported).await.unwrap();

        let fresh = repo.save(user("Fresh", "fresh@example.com")).await.unwrap();
        assert_eq!(fresh.id, 11);
    }

    #[tokio::test]
    async fn max_id_upsert_keeps_actor_alive() {
        let (repo, handle) = MemoryRepositoryActor::spawn(8);
        let alice = repo.save(user("Alice", "alice@example.com")).await.unwrap();

        let mut last = user("Last", "last@example.com");
        last.id = UserId::MAX;
        assert_eq!(repo.save(last.clone()).await.unwrap(), last);

        // Overwriting at the top id stays allowed.
        last.name = "Still Last".to_string();
        assert_eq!(repo.save(last.clone()).await.unwrap().name, "Still Last");

        let err = repo.save(user("Fresh", "fresh@example.com")).await.unwrap_err();
        assert_eq!(err, RepositoryError::IdSequenceExhausted);

        let all = repo.list_all().await.unwrap();
        assert_eq!(all, vec![alice, last]);

        drop(repo);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn top_id_is_assigned_once() {
        let (repo, _handle) = MemoryRepositoryActor::spawn(8);

        let mut near_top = user("Near", "near@example.com");
        near_top.id = UserId::MAX - 1;
        repo.save(near_top).await.unwrap();

        let top = repo.save(user("Top", "top@example.com")).await.unwrap();
        assert_eq!(top.id, UserId::MAX);
        assert_eq!(
            repo.save(user("Over", "over@example.com")).await.unwrap_err(),
            RepositoryError::IdSequenceExhausted
        );
    }

    #[tokio::test]
    async fn zero_buffer_is_raised_to_one() {
        let (repo, _handle) = MemoryRepositoryActor::spawn(0);
        let alice = repo.save(user("Alice", "alice@example.com")).await.unwrap();
        assert_eq!(alice.id, 1);
    }

    #[tokio::test]
    async fn find_by_email_is_exact() {
        let (repo, _handle) = MemoryRepositoryActor::spawn(8);
        repo.save(user("Alice", "alice@example.com")).await.unwrap();

        let found = repo.find_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.name), Some("Alice".to_string()));
        assert_eq!(repo.find_by_email("ALICE@example.com").await.unwrap(), None);
        assert_eq!(repo.find_by_email("nobody@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn closed_actor_reports_error() {
        let (actor, repo) = MemoryRepositoryActor::new(1);
        drop(actor);

        let err = repo.list_all().await.unwrap_err();
        assert_eq!(err, RepositoryError::ActorClosed);
    }
}
