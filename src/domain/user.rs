use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{UserError, UserResult};
use crate::validation::validate_email;

pub type UserId = u64;

/// Id carried by a user that has not been saved yet.
pub const UNSET_ID: UserId = 0;

pub type Metadata = BTreeMap<String, String>;

/// Loose field-map used by bulk creation and by-name updates.
pub type UserFields = BTreeMap<String, String>;

/// Account status. Any status may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
    Deleted,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Suspended => "suspended",
            UserStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            "deleted" => Ok(UserStatus::Deleted),
            other => Err(UserError::ValidationError(format!("Unknown status: {}", other))),
        }
    }
}

/// Represents a registered user in the system.
///
/// The serialized form is the export row shape:
/// `{id, name, email, status, created_at, metadata}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserRow")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    created_at: DateTime<Utc>,
    pub metadata: Metadata,
}

impl User {
    /// Creates an unsaved, active user stamped with the current time.
    ///
    /// # Errors
    /// Returns [`UserError::InvalidEmail`] when `email` is not `local@domain.tld`.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> UserResult<Self> {
        let email = email.into();
        if !validate_email(&email) {
            return Err(UserError::InvalidEmail(email));
        }
        Ok(Self {
            id: UNSET_ID,
            name: name.into(),
            email,
            status: UserStatus::Active,
            created_at: Utc::now(),
            metadata: Metadata::new(),
        })
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[allow(dead_code)]
    pub fn is_persisted(&self) -> bool {
        self.id != UNSET_ID
    }

    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.email)
    }

    #[allow(dead_code)]
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    #[allow(dead_code)]
    pub fn activate(&mut self) {
        self.status = UserStatus::Active;
    }

    #[allow(dead_code)]
    pub fn deactivate(&mut self) {
        self.status = UserStatus::Inactive;
    }

    #[allow(dead_code)]
    pub fn suspend(&mut self) {
        self.status = UserStatus::Suspended;
    }

    /// Applies every field the patch carries. Format checks happen in the service.
    pub(crate) fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(metadata) = patch.metadata {
            self.metadata = metadata;
        }
    }
}

/// Wire form of [`User`]; converting it re-checks the email.
#[derive(Deserialize)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    #[serde(default)]
    status: UserStatus,
    created_at: DateTime<Utc>,
    #[serde(default)]
    metadata: Metadata,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        if !validate_email(&row.email) {
            return Err(UserError::InvalidEmail(row.email));
        }
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            status: row.status,
            created_at: row.created_at,
            metadata: row.metadata,
        })
    }
}

/// Payload for creating a new user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub metadata: Metadata,
}

impl UserCreate {
    #[allow(dead_code)]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            metadata: Metadata::new(),
        }
    }

    #[allow(dead_code)]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builds a create request from a field-map.
    ///
    /// `name` and `email` are required; every other key becomes metadata.
    pub fn from_fields(mut fields: UserFields) -> UserResult<Self> {
        let name = fields
            .remove("name")
            .ok_or_else(|| UserError::ValidationError("Missing field: name".to_string()))?;
        let email = fields
            .remove("email")
            .ok_or_else(|| UserError::ValidationError("Missing field: email".to_string()))?;
        Ok(Self {
            name,
            email,
            metadata: fields,
        })
    }
}

/// Payload for updating an existing user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<UserStatus>,
    pub metadata: Option<Metadata>,
}

#[allow(dead_code)]
impl UserPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Builds a patch from updates keyed by field name.
    ///
    /// `id` and `created_at` are immutable and unknown names are dropped,
    /// both without error.
    pub fn from_fields(fields: &UserFields) -> UserResult<Self> {
        let mut patch = Self::default();
        for (field, value) in fields {
            match field.as_str() {
                "name" => patch.name = Some(value.clone()),
                "email" => patch.email = Some(value.clone()),
                "status" => patch.status = Some(value.parse()?),
                _ => {}
            }
        }
        Ok(patch)
    }
}
