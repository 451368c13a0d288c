use std::sync::Arc;
use tracing::{error, info};

use crate::config::SystemConfig;
use crate::manager::UserManager;
use crate::repository::MemoryRepositoryActor;
use crate::service::{CoreUserService, ListCacheService, LoggingUserService, UserService};

/// Wires the repository actor, the layered service and the manager together.
///
/// Replaces process-wide "initialized" flags and counters: all state lives
/// in the values this struct owns.
pub struct UserSystem {
    pub service: Arc<dyn UserService>,
    pub manager: UserManager,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl UserSystem {
    /// Must be called inside a tokio runtime.
    pub fn new(config: &SystemConfig) -> Self {
        let (repository, repository_handle) =
            MemoryRepositoryActor::spawn(config.repository_buffer.max(1));

        let service: Arc<dyn UserService> = Arc::new(LoggingUserService::new(
            ListCacheService::new(CoreUserService::new(repository), config.list_cache_ttl()),
        ));
        let manager = UserManager::new(service.clone());

        info!(
            max_users = config.max_users,
            list_cache_ttl_secs = config.list_cache_ttl_secs,
            "User management system initialized"
        );

        Self {
            service,
            manager,
            handles: vec![repository_handle],
        }
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        // The repository actor stops once the last client handle is gone.
        drop(self.manager);
        drop(self.service);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
