use tokio::sync::oneshot;
use crate::domain::{User, UserId};
use crate::error::RepositoryResult;

/// Reply channel handed to the repository actor with every request.
pub type Response<T> = oneshot::Sender<T>;

/// Typed messages for the in-memory repository actor. Each variant carries
/// its parameters and a oneshot channel for the reply.
#[derive(Debug)]
pub enum RepositoryRequest {
    GetById {
        id: UserId,
        respond_to: Response<Option<User>>,
    },
    Save {
        user: User,
        respond_to: Response<RepositoryResult<User>>,
    },
    Delete {
        id: UserId,
        respond_to: Response<bool>,
    },
    FindByEmail {
        email: String,
        respond_to: Response<Option<User>>,
    },
    ListAll {
        respond_to: Response<Vec<User>>,
    },
}
