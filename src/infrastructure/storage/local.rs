use crate::common::error::{AppError, AppResult};
use crate::common::validation::ensure_bare_filename;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Prefix under which uploads are reported to clients, independent of
/// where the uploads root lives on the host.
pub const PUBLIC_UPLOADS_PREFIX: &str = "uploads";
pub const PUBLIC_RESULTS_PREFIX: &str = "results";

/// The two on-disk roots shared by every request: client uploads and
/// transcoder output.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    pub uploads_dir: PathBuf,
    pub results_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(uploads_dir: impl Into<PathBuf>, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            results_dir: results_dir.into(),
        }
    }

    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.uploads_dir).await?;
        tokio::fs::create_dir_all(&self.results_dir).await?;
        info!(
            "✅ Storage ready (uploads: {}, results: {})",
            self.uploads_dir.display(),
            self.results_dir.display()
        );
        Ok(())
    }

    pub fn upload_path(&self, name: &str) -> AppResult<PathBuf> {
        ensure_bare_filename(name)?;
        Ok(self.uploads_dir.join(name))
    }

    pub fn result_path(&self, name: &str) -> AppResult<PathBuf> {
        ensure_bare_filename(name)?;
        Ok(self.results_dir.join(name))
    }

    /// Client-facing form of a stored upload: `uploads/<name>`.
    pub fn public_upload_path(&self, storage_path: &Path) -> String {
        let name = storage_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}/{}", PUBLIC_UPLOADS_PREFIX, name)
    }

    /// Rewrites host storage roots in tool output to their public prefixes.
    pub fn redact_roots(&self, text: &str) -> String {
        let mut roots = [
            (&self.uploads_dir, PUBLIC_UPLOADS_PREFIX),
            (&self.results_dir, PUBLIC_RESULTS_PREFIX),
        ];
        // Longest first, in case one root is nested in the other.
        roots.sort_by_key(|(root, _)| std::cmp::Reverse(root.as_os_str().len()));

        roots.into_iter().fold(text.to_string(), |acc, (root, public)| {
            let root = root.to_string_lossy().into_owned();
            if root.is_empty() || root == "." || root == public {
                acc
            } else {
                acc.replace(&root, public)
            }
        })
    }

    /// Resolves a client-echoed source path back into the uploads root.
    /// Accepts a bare name, `uploads/<name>` or `<uploads_dir>/<name>`;
    /// anything else is a traversal attempt.
    pub fn resolve_source(&self, source: &str) -> AppResult<PathBuf> {
        let path = Path::new(source);
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(AppError::PathTraversal(source.to_string()));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::PathTraversal(source.to_string()))?;

        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        let allowed = parent == Path::new("")
            || parent == Path::new(PUBLIC_UPLOADS_PREFIX)
            || parent == self.uploads_dir.as_path();
        if !allowed {
            return Err(AppError::PathTraversal(source.to_string()));
        }

        self.upload_path(name)
    }

    /// Size of a produced artifact in bytes.
    pub async fn result_size(&self, name: &str) -> AppResult<u64> {
        let path = self.result_path(name)?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| AppError::io(format!("Failed to stat artifact '{}'", name), e))?;
        Ok(metadata.len())
    }

    /// Best-effort removal of a stored upload or a partially written artifact.
    pub async fn discard_file(&self, path: &Path) {
        if tokio::fs::remove_file(path).await.is_ok() {
            info!("🧹 Removed {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> LocalStorage {
        LocalStorage::new("uploads", "results")
    }

    #[test]
    fn result_paths_stay_under_root() {
        let s = storage();
        assert_eq!(s.result_path("clip_h264.mp4").unwrap(), PathBuf::from("results/clip_h264.mp4"));
        assert!(matches!(s.result_path("../clip.mp4"), Err(AppError::PathTraversal(_))));
        assert!(matches!(s.result_path("/etc/passwd"), Err(AppError::PathTraversal(_))));
    }

    #[test]
    fn resolves_source_paths() {
        let s = storage();
        assert_eq!(s.resolve_source("uploads/clip.mp4").unwrap(), PathBuf::from("uploads/clip.mp4"));
        assert_eq!(s.resolve_source("clip.mp4").unwrap(), PathBuf::from("uploads/clip.mp4"));
    }

    #[test]
    fn rejects_sources_outside_uploads() {
        let s = storage();
        for source in ["../secret.mp4", "/etc/passwd", "results/clip.mp4", "uploads/../x.mp4", "uploads/a/b.mp4", ""] {
            assert!(
                matches!(s.resolve_source(source), Err(AppError::PathTraversal(_))),
                "{} should be rejected",
                source
            );
        }
    }

    #[test]
    fn resolves_sources_under_absolute_roots() {
        let s = LocalStorage::new("/srv/vq/uploads", "/srv/vq/results");
        assert_eq!(
            s.resolve_source("/srv/vq/uploads/clip.mp4").unwrap(),
            PathBuf::from("/srv/vq/uploads/clip.mp4")
        );
        assert_eq!(
            s.resolve_source("uploads/clip.mp4").unwrap(),
            PathBuf::from("/srv/vq/uploads/clip.mp4")
        );
        assert!(s.resolve_source("/srv/vq/results/clip.mp4").is_err());
    }

    #[test]
    fn public_paths_hide_the_host_root() {
        let s = LocalStorage::new("/srv/vq/uploads", "/srv/vq/results");
        assert_eq!(
            s.public_upload_path(Path::new("/srv/vq/uploads/clip.mp4")),
            "uploads/clip.mp4"
        );
    }

    #[test]
    fn tool_output_hides_the_host_roots() {
        let s = LocalStorage::new("/srv/vq/uploads", "/srv/vq/uploads/out");
        assert_eq!(
            s.redact_roots("/srv/vq/uploads/clip.mp4 -> /srv/vq/uploads/out/clip_h264.mp4: Invalid data"),
            "uploads/clip.mp4 -> results/clip_h264.mp4: Invalid data"
        );
        assert_eq!(storage().redact_roots("uploads/clip.mp4: boom"), "uploads/clip.mp4: boom");
    }

    #[tokio::test]
    async fn reports_artifact_size() {
        let dir = tempfile::tempdir().unwrap();
        let s = LocalStorage::new(dir.path().join("uploads"), dir.path().join("results"));
        s.ensure_dirs().await.unwrap();

        std::fs::write(s.results_dir.join("out.mp4"), vec![0u8; 1234]).unwrap();
        assert_eq!(s.result_size("out.mp4").await.unwrap(), 1234);
        assert!(matches!(s.result_size("missing.mp4").await, Err(AppError::Io { .. })));
    }
}
