/*
 * Responsibility
 * - アップロードされたファイル (資格証明書・ディプロマ・ペット写真) の保存と削除
 * - 保存名は UUID + 元の拡張子、公開パスは `/uploads/<file>`
 * - use-case はこの公開パス文字列だけを受け取る
 */
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

pub const PUBLIC_PREFIX: &str = "/uploads/";

#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write `bytes` under a fresh name and return its public path.
    pub async fn save(
        &self,
        prefix: &str,
        original_name: Option<&str>,
        default_ext: &str,
        bytes: &[u8],
    ) -> io::Result<String> {
        let ext = original_name
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| default_ext.to_string());

        let file_name = format!("{prefix}{}.{ext}", Uuid::new_v4());
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;

        Ok(format!("{PUBLIC_PREFIX}{file_name}"))
    }

    /// Best-effort delete of a file previously returned by [`save`](Self::save).
    ///
    /// Paths outside the upload prefix, or with any directory component, are ignored.
    pub async fn remove(&self, public_path: &str) {
        let Some(file_name) = public_path.strip_prefix(PUBLIC_PREFIX) else {
            return;
        };
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return;
        }

        if let Err(err) = tokio::fs::remove_file(self.dir.join(file_name)).await {
            tracing::debug!(error = %err, path = public_path, "upload removal skipped");
        }
    }
}
