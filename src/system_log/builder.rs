use std::sync::Arc;

use chrono::Utc;
use tokio::runtime::Handle;
use tracing::{error, warn};

use crate::{
    auth::models::Identity,
    common::error::AppError,
    store::document_store::DocumentStore,
    system_log::{
        db,
        models::{LogAction, LogSeverity, SubjectType, SystemLog},
    },
};

const MAX_DESCRIPTION_LEN: usize = 512;

pub struct SystemLogBuilder {
    store: Arc<dyn DocumentStore>,
    subject_id: Option<String>,
    subject_type: Option<SubjectType>,
    action: Option<LogAction>,
    severity: Option<LogSeverity>,
    function: Option<String>,
    description: Option<String>,
    metadata: Option<serde_json::Value>,
}

impl SystemLogBuilder {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            subject_id: None,
            subject_type: None,
            action: None,
            severity: None,
            function: None,
            description: None,
            metadata: None,
        }
    }

    pub fn subject(mut self, identity: &Identity) -> Self {
        let subject_type = if identity.is_admin() {
            SubjectType::Admin
        } else {
            SubjectType::Guest
        };
        self.subject_id = Some(identity.voter_id().to_string());
        self.subject_type = Some(subject_type);
        self
    }

    pub fn system(mut self) -> Self {
        self.subject_id = Some("system".into());
        self.subject_type = Some(SubjectType::System);
        self
    }

    pub fn action(mut self, action: LogAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn severity(mut self, severity: LogSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn function(mut self, function: &str) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub async fn log(self) -> Result<(), AppError> {
        let (subject_id, subject_type) = match (self.subject_id, self.subject_type) {
            (Some(id), Some(subject_type)) => (id, subject_type),
            _ => {
                return Err(AppError::Internal(
                    "Subject is required for system logs".into(),
                ));
            }
        };

        let mut description = self
            .description
            .unwrap_or_else(|| "No description".to_string());

        if description.chars().count() > MAX_DESCRIPTION_LEN {
            let truncated: String = description.chars().take(MAX_DESCRIPTION_LEN - 3).collect();
            description = format!("{}...", truncated);
        }

        let entry = SystemLog {
            subject_id,
            subject_type,
            action: self.action.unwrap_or(LogAction::Other),
            severity: self.severity.unwrap_or(LogSeverity::Info),
            function: self.function.unwrap_or_else(|| "Not specified".into()),
            description,
            metadata: self.metadata,
            created_at: Utc::now(),
        };

        db::create_system_log(self.store.as_ref(), &entry).await
    }

    /// Fire-and-forget variant. Dropped with a warning outside a tokio runtime.
    pub fn log_async(self) {
        let Ok(handle) = Handle::try_current() else {
            warn!("No runtime available, system log entry dropped");
            return;
        };

        handle.spawn(async move {
            if let Err(e) = self.log().await {
                error!("Failed to system log async: {}", e);
            }
        });
    }
}
