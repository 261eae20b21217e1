use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::debug;

use shared_config::AppConfig;

/// File intake for uploaded credential documents. Files land under the
/// configured uploads directory as `<millis>-<original name>`; collisions
/// require two uploads sharing the same millisecond and filename.
pub struct CredentialsService {
    uploads_dir: PathBuf,
}

impl CredentialsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            uploads_dir: PathBuf::from(&config.uploads_dir),
        }
    }

    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        // Directory components in the client-supplied name are stripped.
        let file_name = Path::new(original_name)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("credentials");

        let stored_name = format!("{}-{}", Utc::now().timestamp_millis(), file_name);
        let path = self.uploads_dir.join(&stored_name);

        tokio::fs::create_dir_all(&self.uploads_dir)
            .await
            .with_context(|| format!("Failed to create uploads directory {}", self.uploads_dir.display()))?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write uploaded file {}", path.display()))?;

        debug!("Stored credentials file at {}", path.display());
        Ok(path.to_string_lossy().into_owned())
    }
}
