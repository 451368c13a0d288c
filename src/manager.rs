use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::domain::{User, UserCreate, UserFields};
use crate::error::UserResult;
use crate::export::ExportFormat;
use crate::service::UserService;

/// Bulk and export operations built on a [`UserService`].
#[derive(Clone)]
pub struct UserManager {
    service: Arc<dyn UserService>,
}

impl UserManager {
    pub fn new(service: Arc<dyn UserService>) -> Self {
        Self { service }
    }

    #[allow(dead_code)]
    pub fn service(&self) -> &Arc<dyn UserService> {
        &self.service
    }

    /// Creates each entry in order. A failing entry is logged and skipped;
    /// only the users that were created come back.
    #[instrument(skip(self, entries), fields(requested = entries.len()))]
    pub async fn bulk_create_users(&self, entries: Vec<UserFields>) -> Vec<User> {
        let mut created = Vec::with_capacity(entries.len());

        for fields in entries {
            let summary = format!("{:?}", fields);
            let result = match UserCreate::from_fields(fields) {
                Ok(request) => self.service.create_user(request).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(user) => created.push(user),
                Err(e) => error!(user_data = %summary, error = %e, "Failed to create user"),
            }
        }

        info!(created = created.len(), "Bulk create finished");
        created
    }

    /// Renders the unfiltered user list as `"json"` or `"csv"`.
    ///
    /// The list comes from the service's cached `list_users`, so it may lag
    /// recent writes.
    #[instrument(skip(self))]
    pub async fn export_users(&self, format: &str) -> UserResult<String> {
        let format: ExportFormat = format.parse()?;
        let users = self.service.list_users(None).await?;
        info!(user_count = users.len(), %format, "Exporting users");
        format.render(&users)
    }
}
