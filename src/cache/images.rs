use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::Client;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

/// Image extensions kept as-is; anything else is normalized to png.
const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];
const DEFAULT_EXTENSION: &str = "png";

/// URL-keyed image cache rooted at one directory, with per-kind
/// subdirectories (`teams/`, `leagues/`, `other/`).
pub struct ImageCache {
    root: PathBuf,
    client: Client,
}

impl ImageCache {
    pub fn new(root: PathBuf, client: Client) -> Self {
        Self { root, client }
    }

    /// Return a local path for `url`, downloading it into `subdir` on first
    /// use. An empty URL or a failed download yields `None`; failures are
    /// logged, never raised, so a missing badge cannot fail a fetch cycle.
    pub async fn get_or_download(&self, url: &str, subdir: &str) -> Option<PathBuf> {
        if url.is_empty() {
            return None;
        }

        let dir = self.root.join(subdir);
        let path = dir.join(cache_filename(url));

        // Cache hit: no network call
        if path.exists() {
            debug!(path = %path.display(), "Badge cache hit");
            return Some(path);
        }

        match self.download(url, &dir, &path).await {
            Ok(()) => Some(path),
            Err(e) => {
                warn!(url, error = %e, "Failed to download badge image");
                None
            }
        }
    }

    async fn download(&self, url: &str, dir: &Path, path: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Image request failed")?
            .error_for_status()
            .context("Image request returned an error status")?;

        // Stream to disk rather than buffering the whole body
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Image transfer interrupted")?;
            file.write_all(&chunk)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        debug!(url, path = %path.display(), "Downloaded badge image");
        Ok(())
    }
}

/// Content-stable cache filename: sha256 of the URL plus a normalized
/// extension taken from the URL path (query string stripped).
pub fn cache_filename(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}.{}", hasher.finalize(), normalized_extension(url))
}

fn normalized_extension(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or(url);
    let extension = without_query
        .rsplit('.')
        .next()
        .unwrap_or(DEFAULT_EXTENSION)
        .trim()
        .to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        extension
    } else {
        DEFAULT_EXTENSION.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache_root(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("scorematrix-cache-{}-{}", tag, nanos))
    }

    #[test]
    fn test_cache_filename_is_stable() {
        let a = cache_filename("https://cdn.example.com/badge.png");
        let b = cache_filename("https://cdn.example.com/badge.png");
        assert_eq!(a, b);
        assert!(a.ends_with(".png"));
    }

    #[test]
    fn test_cache_filename_differs_per_url() {
        let a = cache_filename("https://cdn.example.com/badge.png");
        let b = cache_filename("https://cdn.example.com/other.png");
        assert_ne!(a, b);
    }

    #[test]
    fn test_extension_normalization() {
        assert!(cache_filename("https://x.test/logo.jpg").ends_with(".jpg"));
        assert!(cache_filename("https://x.test/logo.JPEG").ends_with(".jpeg"));
        // Query strings are stripped before the extension is read
        assert!(cache_filename("https://x.test/logo.gif?w=64&h=64").ends_with(".gif"));
        // Anything outside the allowed set becomes png
        assert!(cache_filename("https://x.test/logo.svg").ends_with(".png"));
        assert!(cache_filename("https://x.test/logo").ends_with(".png"));
    }

    #[tokio::test]
    async fn test_empty_url_returns_none_without_side_effects() {
        let root = temp_cache_root("empty-url");
        let cache = ImageCache::new(root.clone(), Client::new());
        assert!(cache.get_or_download("", "teams").await.is_none());
        // No directory should have been created
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn test_existing_file_is_returned_without_network() {
        let root = temp_cache_root("hit");
        // Unroutable URL: any network attempt would fail, so a returned
        // path proves the cache was hit
        let url = "http://192.0.2.1/badge.png";

        let dir = root.join("teams");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(cache_filename(url));
        std::fs::write(&path, b"not a real png").unwrap();

        let cache = ImageCache::new(root.clone(), Client::new());
        let first = cache.get_or_download(url, "teams").await;
        let second = cache.get_or_download(url, "teams").await;
        assert_eq!(first.as_deref(), Some(path.as_path()));
        assert_eq!(first, second);

        std::fs::remove_dir_all(&root).ok();
    }
}
