use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use uuid::Uuid;

use crate::errors::AppError;

/// Public prefix uploaded files are served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Local-disk store for onboarding attachments.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` under a fresh name and returns the path to record in the database.
    pub async fn store(
        &self,
        field_name: &str,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        fs::create_dir_all(&self.root).await.map_err(|err| {
            AppError::StorageError(format!("creating {}: {}", self.root.display(), err))
        })?;

        let file_name = unique_file_name(original_filename);
        let path = self.root.join(&file_name);
        fs::write(&path, bytes).await.map_err(|err| {
            AppError::StorageError(format!("writing {}: {}", path.display(), err))
        })?;

        log::debug!("Stored {} ({} bytes) as {}", field_name, bytes.len(), path.display());
        Ok(path.to_string_lossy().into_owned())
    }

    /// Reads back a stored file. Only the base name of `relative_path` is used.
    pub async fn resolve(&self, relative_path: &str) -> Result<Vec<u8>, AppError> {
        let name = base_name(relative_path)
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        match fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("File not found".to_string()))
            }
            Err(err) => Err(AppError::StorageError(format!("reading {}: {}", name, err))),
        }
    }
}

/// Rewrites a stored path to the URL it is served from.
pub fn public_url(stored_path: &str) -> Option<String> {
    base_name(stored_path).map(|name| format!("{}/{}", PUBLIC_PREFIX, name))
}

fn base_name(path: &str) -> Option<&str> {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| *name != "..")
}

fn unique_file_name(original_filename: &str) -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        id,
        sanitize_file_name(original_filename)
    )
}

fn sanitize_file_name(original_filename: &str) -> String {
    let name = Path::new(original_filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    let cleaned: String = name
        .chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
