//! Frame reference resolver.
//! Maps a frame index to the location of its pre-rendered image:
//! `<base_path>/<prefix><index zero-padded>.<extension>`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::SequenceConfig;
use crate::error::ReelResult;
use crate::frame::FrameIndex;

/// Where a frame image is served from, relative to the asset root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FrameLocation(String);

impl FrameLocation {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join this location onto a local asset directory.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        root.join(self.0.trim_start_matches('/'))
    }

    /// Join this location onto an http(s) base URL.
    pub fn to_url(&self, base: &str) -> String {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            self.0.trim_start_matches('/')
        )
    }
}

impl fmt::Display for FrameLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deterministic index → location naming for one frame sequence.
#[derive(Debug, Clone)]
pub struct FrameResolver {
    total: u32,
    stem: String,
    pad_width: usize,
    extension: String,
}

impl FrameResolver {
    pub fn new(sequence: &SequenceConfig) -> Self {
        let base = sequence.base_path.trim_end_matches('/');
        Self {
            total: sequence.total_frames,
            stem: format!("{}/{}", base, sequence.prefix),
            pad_width: sequence.pad_width as usize,
            extension: sequence.extension.trim_start_matches('.').to_string(),
        }
    }

    /// Number of frames this resolver covers.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Resolve an index in `[1, N]`; anything else is `OutOfRange`.
    pub fn resolve(&self, index: i64) -> ReelResult<FrameLocation> {
        let index = FrameIndex::new(index, self.total)?;
        Ok(self.location(index))
    }

    /// Location of an already-validated index.
    pub fn location(&self, index: FrameIndex) -> FrameLocation {
        FrameLocation(format!(
            "{}{:0width$}.{}",
            self.stem,
            index.get(),
            self.extension,
            width = self.pad_width
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReelError;

    fn resolver() -> FrameResolver {
        FrameResolver::new(&SequenceConfig::default())
    }

    #[test]
    fn test_resolve_zero_pads() {
        let loc = resolver().resolve(7).unwrap();
        assert!(loc.as_str().contains("007"));
        assert_eq!(loc.as_str(), "/mountain_8s_frames/frame_007.webp");
    }

    #[test]
    fn test_resolve_out_of_range() {
        let r = resolver();
        assert!(matches!(
            r.resolve(0),
            Err(ReelError::OutOfRange { index: 0, total: 96 })
        ));
        assert!(matches!(
            r.resolve(97),
            Err(ReelError::OutOfRange { index: 97, .. })
        ));
    }

    #[test]
    fn test_resolve_bounds() {
        let r = resolver();
        assert!(r.resolve(1).unwrap().as_str().ends_with("frame_001.webp"));
        assert!(r.resolve(96).unwrap().as_str().ends_with("frame_096.webp"));
    }

    #[test]
    fn test_wide_index_not_truncated() {
        let seq = SequenceConfig {
            total_frames: 1200,
            ..SequenceConfig::default()
        };
        let loc = FrameResolver::new(&seq).resolve(1100).unwrap();
        assert!(loc.as_str().ends_with("frame_1100.webp"));
    }

    #[test]
    fn test_location_joins() {
        let loc = resolver().resolve(12).unwrap();
        assert_eq!(
            loc.to_url("https://cdn.example.com/"),
            "https://cdn.example.com/mountain_8s_frames/frame_012.webp"
        );
        assert_eq!(
            loc.to_path(Path::new("/srv/public")),
            PathBuf::from("/srv/public/mountain_8s_frames/frame_012.webp")
        );
    }
}
