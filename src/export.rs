//! Text encodings for user exports.
//!
//! Both formats share one row shape: `id, name, email, status, created_at, metadata`.

use chrono::SecondsFormat;
use csv::Writer;
use std::fmt;
use std::str::FromStr;

use crate::domain::User;
use crate::error::{UserError, UserResult};

pub const EXPORT_FIELDS: [&str; 6] = ["id", "name", "email", "status", "created_at", "metadata"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON array, two-space indentation
    Json,
    /// Header row plus one row per user
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn render(&self, users: &[User]) -> UserResult<String> {
        match self {
            ExportFormat::Json => JsonExporter::export(users),
            ExportFormat::Csv => CsvExporter::export(users),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(UserError::UnsupportedFormat(other.to_string())),
        }
    }
}

pub struct JsonExporter;

impl JsonExporter {
    pub fn export(users: &[User]) -> UserResult<String> {
        serde_json::to_string_pretty(users)
            .map_err(|e| UserError::ExportError(format!("JSON export failed: {}", e)))
    }
}

pub struct CsvExporter;

impl CsvExporter {
    /// An empty slice yields an empty string, header included.
    pub fn export(users: &[User]) -> UserResult<String> {
        if users.is_empty() {
            return Ok(String::new());
        }

        let mut writer = Writer::from_writer(Vec::new());
        writer
            .write_record(EXPORT_FIELDS)
            .map_err(|e| UserError::ExportError(format!("Failed to write CSV headers: {}", e)))?;

        for user in users {
            let metadata = serde_json::to_string(&user.metadata)
                .map_err(|e| UserError::ExportError(format!("Failed to encode metadata: {}", e)))?;
            let row = [
                user.id.to_string(),
                user.name.clone(),
                user.email.clone(),
                user.status.to_string(),
                user.created_at().to_rfc3339_opts(SecondsFormat::AutoSi, true),
                metadata,
            ];
            writer
                .write_record(&row)
                .map_err(|e| UserError::ExportError(format!("Failed to write CSV row: {}", e)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| UserError::ExportError(format!("Failed to get CSV output: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| UserError::ExportError(e.to_string()))
    }
}
