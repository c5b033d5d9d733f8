use scrollreel_core::config::SurfaceConfig;
use scrollreel_core::{FrameHandle, FrameIndex, FrameLocation, FrameResolver};
use scrollreel_motion::SectionTransform;
use serde::Serialize;

use crate::prefetch::PrefetchCache;

/// What to paint as the background for the current frame.
#[derive(Debug, Clone)]
pub enum Paint {
    Frame(FrameHandle),
    /// The frame has not loaded (or failed); draw the fallback visual.
    Placeholder,
}

/// Everything needed to paint one update.
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceFrame {
    pub frame: FrameIndex,
    /// Where the frame is served from, for hosts that paint by reference.
    pub location: FrameLocation,
    #[serde(skip)]
    pub paint: Paint,
    pub placeholder: bool,
    pub sections: Vec<SectionTransform>,
    pub background_opacity: f64,
    pub overlay_opacity: f64,
}

impl SurfaceFrame {
    pub fn image(&self) -> Option<&FrameHandle> {
        match &self.paint {
            Paint::Frame(handle) => Some(handle),
            Paint::Placeholder => None,
        }
    }
}

/// Projects engine state into a [`SurfaceFrame`]. Holds style only.
#[derive(Debug, Clone)]
pub struct RenderSurface {
    style: SurfaceConfig,
    resolver: FrameResolver,
}

impl RenderSurface {
    pub fn new(style: SurfaceConfig, resolver: FrameResolver) -> Self {
        Self { style, resolver }
    }

    /// Borrow the cached image for `frame`, falling back to the placeholder.
    pub fn project(
        &self,
        frame: FrameIndex,
        sections: &[SectionTransform],
        cache: &PrefetchCache,
    ) -> SurfaceFrame {
        let paint = match cache.get(frame) {
            Some(handle) => Paint::Frame(handle),
            None => Paint::Placeholder,
        };
        SurfaceFrame {
            frame,
            location: self.resolver.location(frame),
            placeholder: matches!(paint, Paint::Placeholder),
            paint,
            sections: sections.to_vec(),
            background_opacity: self.style.background_opacity,
            overlay_opacity: self.style.overlay_opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SyntheticFrameLoader;
    use scrollreel_core::SequenceConfig;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_placeholder_until_loaded() {
        let resolver = FrameResolver::new(&SequenceConfig::default());
        let cache = PrefetchCache::new(
            resolver.clone(),
            Arc::new(SyntheticFrameLoader::new(96, 4, 4)),
        );
        let surface = RenderSurface::new(SurfaceConfig::default(), resolver);
        let frame = FrameIndex::new(10, 96).unwrap();
        let sections = [SectionTransform::new(1.0, 1.0)];

        let before = surface.project(frame, &sections, &cache);
        assert!(before.placeholder);
        assert!(before.image().is_none());
        assert_eq!(before.location.as_str(), "/mountain_8s_frames/frame_010.webp");

        cache.request(frame).unwrap();
        cache.wait_idle().await;

        let after = surface.project(frame, &sections, &cache);
        assert!(!after.placeholder);
        assert_eq!(after.image().map(|h| h.index()), Some(frame));
        assert_eq!(after.sections, sections.to_vec());
        assert_eq!(after.background_opacity, 0.7);
    }

    #[test]
    fn test_surface_frame_json() {
        let resolver = FrameResolver::new(&SequenceConfig::default());
        let frame = SurfaceFrame {
            frame: FrameIndex::new(2, 96).unwrap(),
            location: resolver.resolve(2).unwrap(),
            paint: Paint::Placeholder,
            placeholder: true,
            sections: vec![SectionTransform::new(0.0, 0.5)],
            background_opacity: 0.7,
            overlay_opacity: 0.2,
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["frame"], 2);
        assert_eq!(json["location"], "/mountain_8s_frames/frame_002.webp");
        assert_eq!(json["sections"][0]["scale"], 0.5);
    }
}
