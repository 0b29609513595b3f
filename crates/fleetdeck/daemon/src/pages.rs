//! Static-page store for the dashboard's WYSIWYG editor.
//!
//! File CRUD over a content directory. Paths arrive from the network and
//! are validated before touching the filesystem: relative, no `..`, no
//! absolute components.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Page store errors.
#[derive(Debug, Error)]
pub enum PageError {
    /// The requested path escapes the content directory or is malformed.
    #[error("invalid page path: {0}")]
    InvalidPath(String),

    /// No page at the given path.
    #[error("page not found: {0}")]
    NotFound(String),

    /// Filesystem failure.
    #[error("page store error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extensions the editor may list and edit.
const EDITABLE_EXTENSIONS: &[&str] = &["html", "md"];

/// File CRUD rooted at the content directory.
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Validate a request path and resolve it under the root.
    fn resolve(&self, rel: &str) -> Result<PathBuf, PageError> {
        if rel.is_empty() {
            return Err(PageError::InvalidPath("empty path".to_string()));
        }

        let path = Path::new(rel);
        for component in path.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(PageError::InvalidPath(format!(
                        "path must be relative without '..': {}",
                        rel
                    )))
                }
            }
        }

        let editable = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| EDITABLE_EXTENSIONS.contains(&e))
            .unwrap_or(false);
        if !editable {
            return Err(PageError::InvalidPath(format!(
                "unsupported page type: {}",
                rel
            )));
        }

        Ok(self.root.join(path))
    }

    /// Relative paths of all editable pages, sorted.
    pub async fn list(&self) -> Result<Vec<String>, PageError> {
        let mut pages = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                    continue;
                }

                let editable = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| EDITABLE_EXTENSIONS.contains(&e))
                    .unwrap_or(false);
                if !editable {
                    continue;
                }

                if let Ok(rel) = path.strip_prefix(&self.root) {
                    pages.push(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }

        pages.sort();
        Ok(pages)
    }

    /// Read one page.
    pub async fn read(&self, rel: &str) -> Result<String, PageError> {
        let path = self.resolve(rel)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(PageError::NotFound(rel.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Create or replace one page.
    pub async fn write(&self, rel: &str, body: &str) -> Result<(), PageError> {
        let path = self.resolve(rel)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body).await?;
        info!(page = rel, bytes = body.len(), "page saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> PageStore {
        PageStore::new(dir.path())
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store.write("guides/intro.html", "<h1>Hi</h1>").await.unwrap();
        let body = store.read("guides/intro.html").await.unwrap();
        assert_eq!(body, "<h1>Hi</h1>");
    }

    #[tokio::test]
    async fn test_list_finds_editable_pages() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store.write("a.html", "a").await.unwrap();
        store.write("sub/b.md", "b").await.unwrap();
        tokio::fs::write(dir.path().join("ignore.png"), b"x").await.unwrap();

        let pages = store.list().await.unwrap();
        assert_eq!(pages, vec!["a.html".to_string(), "sub/b.md".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_page_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            store(&dir).read("nope.html").await,
            Err(PageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        for bad in ["../etc/passwd.html", "/etc/passwd.html", "a/../../b.html", ""] {
            assert!(
                matches!(store.read(bad).await, Err(PageError::InvalidPath(_))),
                "path {:?} must be rejected",
                bad
            );
        }
    }

    #[tokio::test]
    async fn test_non_editable_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            store(&dir).write("script.sh", "#!/bin/sh").await,
            Err(PageError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_root_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path().join("missing"));
        assert!(store.list().await.unwrap().is_empty());
    }
}
