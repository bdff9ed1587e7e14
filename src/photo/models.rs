use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PHOTOS_COLLECTION: &str = "uploaded_photos";

/// Approval progress of a photo. Each step is persisted before the next one
/// starts, so an interrupted approval is visible and can be retried.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhotoStatus {
    #[default]
    PendingUpload,
    Hosted,
    Approved,
}

impl fmt::Display for PhotoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoStatus::PendingUpload => write!(f, "pending_upload"),
            PhotoStatus::Hosted => write!(f, "hosted"),
            PhotoStatus::Approved => write!(f, "approved"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(skip)]
    pub id: String,
    /// Inline `data:` encoding until approval, hosted url afterwards.
    pub url: String,
    #[serde(default)]
    pub file_name: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub vetted: bool,
    #[serde(default)]
    pub hosted_url: Option<String>,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub status: PhotoStatus,
}

impl Photo {
    pub fn is_inline(&self) -> bool {
        self.url.starts_with("data:")
    }

    /// Status as far as the stored fields prove it. Records written before the
    /// status field existed only carry `vetted` and the url.
    pub fn effective_status(&self) -> PhotoStatus {
        if self.vetted {
            PhotoStatus::Approved
        } else if self.status == PhotoStatus::Hosted || !self.is_inline() {
            PhotoStatus::Hosted
        } else {
            PhotoStatus::PendingUpload
        }
    }

    pub fn to_view(&self, default_alt: &str) -> PhotoView {
        PhotoView {
            id: self.id.clone(),
            src: self.url.clone(),
            alt: self
                .file_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| default_alt.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PhotoView {
    pub id: String,
    pub src: String,
    pub alt: String,
}
