//! Frame loaders: fetch and decode one frame image.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use scrollreel_core::{FrameBuffer, FrameIndex, FrameLocation, ReelError, ReelResult};

use crate::image_loader::load_image_from_bytes;

/// Fetches and decodes one frame. Implementations must not block the caller;
/// heavy work belongs on a blocking task.
#[async_trait]
pub trait FrameLoader: Send + Sync {
    async fn load(&self, index: FrameIndex, location: &FrameLocation) -> ReelResult<FrameBuffer>;
}

/// Loads frames from a local directory mirroring the served asset root.
pub struct FsFrameLoader {
    root: PathBuf,
}

impl FsFrameLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FrameLoader for FsFrameLoader {
    async fn load(&self, index: FrameIndex, location: &FrameLocation) -> ReelResult<FrameBuffer> {
        let path = location.to_path(&self.root);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ReelError::load(index.get(), format!("{}: {}", path.display(), e)))?;
        decode_off_thread(index, bytes).await
    }
}

/// Loads frames over http(s) from a base URL.
pub struct HttpFrameLoader {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFrameLoader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl FrameLoader for HttpFrameLoader {
    async fn load(&self, index: FrameIndex, location: &FrameLocation) -> ReelResult<FrameBuffer> {
        let url = location.to_url(&self.base_url);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ReelError::load(index.get(), format!("{}: {}", url, e)))?;

        if !res.status().is_success() {
            return Err(ReelError::load(
                index.get(),
                format!("{}: HTTP {}", url, res.status()),
            ));
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|e| ReelError::load(index.get(), format!("{}: {}", url, e)))?;
        decode_off_thread(index, bytes.to_vec()).await
    }
}

/// Generates solid frames without any I/O, shading from dark to light across
/// the sequence. Used for dry runs.
pub struct SyntheticFrameLoader {
    total: u32,
    width: u32,
    height: u32,
}

impl SyntheticFrameLoader {
    pub fn new(total: u32, width: u32, height: u32) -> Self {
        Self {
            total: total.max(1),
            width,
            height,
        }
    }
}

#[async_trait]
impl FrameLoader for SyntheticFrameLoader {
    async fn load(&self, index: FrameIndex, _location: &FrameLocation) -> ReelResult<FrameBuffer> {
        let shade = ((index.get() as f64 / self.total as f64) * 255.0).round() as u8;
        Ok(FrameBuffer::solid(
            self.width,
            self.height,
            [shade, shade, shade, 255],
        ))
    }
}

/// Pick a loader for an asset root: http(s) URLs go over the network,
/// anything else is a local directory.
pub fn loader_for_root(root: &str) -> Arc<dyn FrameLoader> {
    if is_http_url(root) {
        Arc::new(HttpFrameLoader::new(root.trim()))
    } else {
        Arc::new(FsFrameLoader::new(root))
    }
}

fn is_http_url(s: &str) -> bool {
    let s = s.trim();
    s.starts_with("http://") || s.starts_with("https://")
}

async fn decode_off_thread(index: FrameIndex, bytes: Vec<u8>) -> ReelResult<FrameBuffer> {
    tokio::task::spawn_blocking(move || load_image_from_bytes(&bytes))
        .await
        .map_err(|e| ReelError::load(index.get(), format!("decode task failed: {}", e)))?
        .map_err(|e| ReelError::load(index.get(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollreel_core::{FrameResolver, SequenceConfig};

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://cdn.example.com"));
        assert!(is_http_url("  http://localhost:5173"));
        assert!(!is_http_url("public"));
        assert!(!is_http_url("/srv/www"));
    }

    #[tokio::test]
    async fn test_fs_loader_missing_frame_is_load_error() {
        let resolver = FrameResolver::new(&SequenceConfig::default());
        let index = FrameIndex::new(3, 96).unwrap();
        let loader = FsFrameLoader::new("/nonexistent/root");
        let err = loader
            .load(index, &resolver.location(index))
            .await
            .unwrap_err();
        assert!(matches!(err, ReelError::Load { index: 3, .. }));
        assert!(err.to_string().contains("frame_003.webp"));
    }

    #[tokio::test]
    async fn test_synthetic_loader_shades() {
        let resolver = FrameResolver::new(&SequenceConfig::default());
        let loader = SyntheticFrameLoader::new(96, 2, 2);
        let last = FrameIndex::new(96, 96).unwrap();
        let fb = loader.load(last, &resolver.location(last)).await.unwrap();
        assert_eq!(fb.get_pixel(0, 0), Some([255, 255, 255, 255]));
    }
}
