use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SYSTEM_LOG_COLLECTION: &str = "system_log";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SystemLog {
    pub subject_id: String,
    pub subject_type: SubjectType,
    pub action: LogAction,
    pub severity: LogSeverity,
    pub function: String,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    Critical,
    Warning,
    Info,
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogSeverity::Critical => write!(f, "critical"),
            LogSeverity::Warning => write!(f, "warning"),
            LogSeverity::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    Create,
    Update,
    Delete,
    Other,
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogAction::Create => write!(f, "create"),
            LogAction::Update => write!(f, "update"),
            LogAction::Delete => write!(f, "delete"),
            LogAction::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubjectType {
    Admin,
    Guest,
    System,
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectType::Admin => write!(f, "admin"),
            SubjectType::Guest => write!(f, "guest"),
            SubjectType::System => write!(f, "system"),
        }
    }
}
