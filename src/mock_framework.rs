//! # Mock Framework
//!
//! Utilities for testing services against a scripted repository.
//!
//! Use [`create_mock_repository`] to get a repository handle and a receiver.
//! Then use helpers like [`expect_find_by_email`] or [`expect_save`] to
//! assert the exact traffic a service call produces and to answer it.

use crate::domain::{User, UserId};
use crate::error::RepositoryResult;
use crate::messages::{RepositoryRequest, Response};
use crate::repository::MemoryUserRepository;
use std::io;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::subscriber::DefaultGuard;

/// Creates a repository handle whose requests land on `receiver` instead of
/// a running actor.
pub fn create_mock_repository(
    buffer_size: usize,
) -> (MemoryUserRepository, mpsc::Receiver<RepositoryRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MemoryUserRepository::new(sender), receiver)
}

/// Helper to verify that the next message is a GetById request
pub async fn expect_get_by_id(
    receiver: &mut mpsc::Receiver<RepositoryRequest>,
) -> Option<(UserId, Response<Option<User>>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::GetById { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Save request
pub async fn expect_save(
    receiver: &mut mpsc::Receiver<RepositoryRequest>,
) -> Option<(User, Response<RepositoryResult<User>>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::Save { user, respond_to }) => Some((user, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete(
    receiver: &mut mpsc::Receiver<RepositoryRequest>,
) -> Option<(UserId, Response<bool>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a FindByEmail request
pub async fn expect_find_by_email(
    receiver: &mut mpsc::Receiver<RepositoryRequest>,
) -> Option<(String, Response<Option<User>>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::FindByEmail { email, respond_to }) => Some((email, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a ListAll request
pub async fn expect_list_all(
    receiver: &mut mpsc::Receiver<RepositoryRequest>,
) -> Option<Response<Vec<User>>> {
    match receiver.recv().await {
        Some(RepositoryRequest::ListAll { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes `info` and above on the current thread into a [`LogBuffer`]
/// until the guard is dropped.
///
/// Pair with the default current-thread `#[tokio::test]` runtime so
/// spawned actors log into the same buffer.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::UserRepository;

    #[tokio::test]
    async fn mock_repository_answers_save() {
        let (repo, mut receiver) = create_mock_repository(10);

        let save_task = tokio::spawn(async move {
            let user = User::new("Test", "test@example.com").unwrap();
            repo.save(user).await
        });

        let (mut user, responder) = expect_save(&mut receiver).await.expect("Expected Save request");
        assert_eq!(user.name, "Test");
        user.id = 1;
        responder.send(Ok(user.clone())).unwrap();

        let result = save_task.await.unwrap();
        assert_eq!(result, Ok(user));
    }

    #[test]
    fn captured_logs_stay_in_buffer() {
        let (logs, guard) = capture_logs();
        tracing::info!(user_id = 7, "Captured line");
        drop(guard);
        tracing::info!("Not captured");

        let output = logs.contents();
        assert!(output.contains("Captured line user_id=7"), "{}", output);
        assert!(!output.contains("Not captured"));
    }
}
