//! Unified application error type.
//! All modules (db, core, cli, server) return AppError to keep the error
//! handling consistent and easy to manage. The HTTP mapping lives in
//! `server::response`.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use thiserror::Error;

/// Field-level validation messages, keyed by field name (camelCase, as the
/// client sent it). Cross-field problems are reported under `body`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<garde::Report> for FieldErrors {
    fn from(report: garde::Report) -> Self {
        let mut errors = FieldErrors::new();
        for (path, error) in report.iter() {
            let field = camel_case(&path.to_string());
            let field = if field.is_empty() { "body" } else { &field };
            errors.add(field, error.to_string());
        }
        errors
    }
}

/// `contact_email` -> `contactEmail`, matching the JSON field names.
fn camel_case(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut upper = false;
    for c in path.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, msgs)| format!("{field}: {}", msgs.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Request / input errors
    // ---------------------------
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    // ---------------------------
    // Identity / permission errors
    // ---------------------------
    #[error("Authentication required")]
    AuthRequired,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    // ---------------------------
    // Domain outcomes
    // ---------------------------
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Runtime
    // ---------------------------
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Internal error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Other(format!("JSON error: {e}"))
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(e: serde_yaml::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl AppError {
    /// Returns true only for a UNIQUE violation; foreign-key and other
    /// constraint failures are not duplicates.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            AppError::Db(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_paths_use_json_names() {
        assert_eq!(camel_case("contact_email"), "contactEmail");
        assert_eq!(camel_case("volunteer_positions"), "volunteerPositions");
        assert_eq!(camel_case("title"), "title");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn field_errors_serialize_as_a_map() {
        let mut errors = FieldErrors::single("title", "required");
        errors.add("title", "too short");
        errors.add("date", "Invalid date format");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "date": ["Invalid date format"],
                "title": ["required", "too short"]
            })
        );
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["date", "title"]);
    }
}
