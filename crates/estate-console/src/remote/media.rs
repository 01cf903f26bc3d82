use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("media storage unavailable: {0}")]
    Unavailable(String),
}

/// Object storage for listing and agent images. Uploads return the stable
/// public URL the stored row references.
pub trait MediaStore: Send + Sync {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<String, MediaError>;
    fn public_url(&self, path: &str) -> String;
}

/// Collision-avoiding object name: `{unix_timestamp}_{original_file_name}`.
/// Any unique-name scheme would do; this mirrors what the stored URLs use.
pub fn object_path(now: DateTime<Utc>, original_name: &str) -> String {
    format!("{}_{}", now.timestamp(), original_name.trim())
}
