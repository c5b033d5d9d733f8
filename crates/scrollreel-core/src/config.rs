use serde::{Deserialize, Serialize};

use crate::error::{ReelError, ReelResult};
use crate::types::Easing;

/// Naming and size of the pre-rendered frame sequence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub total_frames: u32,
    pub base_path: String,
    pub prefix: String,
    pub pad_width: u32,
    pub extension: String,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            total_frames: 96,
            base_path: "/mountain_8s_frames".to_string(),
            prefix: "frame_".to_string(),
            pad_width: 3,
            extension: "webp".to_string(),
        }
    }
}

/// Two-tier warm-up of the frame cache.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PrefetchConfig {
    /// Frames `1..=immediate` are requested at mount.
    pub immediate: u32,
    /// Delay before the remaining frames are requested.
    pub defer_ms: u64,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            immediate: 20,
            defer_ms: 1000,
        }
    }
}

/// Lag, in seconds, between the scroll position and the displayed progress.
/// Zero disables smoothing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrubConfig {
    pub frame_lag: f64,
    pub section_lag: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub background_opacity: f64,
    pub overlay_opacity: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            background_opacity: 0.7,
            overlay_opacity: 0.2,
        }
    }
}

/// Shape of the per-section reveal timeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Progress at which the enter phase ends and the exit phase begins.
    pub split: f64,
    pub enter_scale: f64,
    pub peak_scale: f64,
    pub exit_scale: f64,
    pub enter_easing: Easing,
    pub exit_easing: Easing,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            split: 0.4,
            enter_scale: 0.5,
            peak_scale: 1.0,
            exit_scale: 2.5,
            enter_easing: Easing::Linear,
            exit_easing: Easing::Linear,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Local directory or http(s) base URL the frame locations are relative to.
    pub root: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: "public".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReelConfig {
    #[serde(default)]
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub prefetch: PrefetchConfig,
    #[serde(default)]
    pub scrub: ScrubConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl ReelConfig {
    pub fn load_from_file(path: &std::path::Path) -> ReelResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ReelResult<Self> {
        let config: ReelConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> ReelResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| ReelError::Other(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values outside their domains.
    pub fn validate(&self) -> ReelResult<()> {
        if self.sequence.total_frames == 0 {
            return Err(ReelError::config("sequence.total_frames must be positive"));
        }
        if self.prefetch.immediate == 0 {
            return Err(ReelError::config("prefetch.immediate must be positive"));
        }
        if self.sequence.extension.trim_start_matches('.').is_empty() {
            return Err(ReelError::config("sequence.extension must not be empty"));
        }
        let split = self.timeline.split;
        if !(split > 0.0 && split < 1.0) {
            return Err(ReelError::config(format!(
                "timeline.split must be inside (0, 1), got {}",
                split
            )));
        }
        let t = &self.timeline;
        if [t.enter_scale, t.peak_scale, t.exit_scale]
            .iter()
            .any(|s| !s.is_finite() || *s < 0.0)
        {
            return Err(ReelError::config("timeline scales must be finite and >= 0"));
        }
        for (name, lag) in [
            ("scrub.frame_lag", self.scrub.frame_lag),
            ("scrub.section_lag", self.scrub.section_lag),
        ] {
            if !lag.is_finite() || lag < 0.0 {
                return Err(ReelError::config(format!("{} must be >= 0", name)));
            }
        }
        for (name, v) in [
            ("surface.background_opacity", self.surface.background_opacity),
            ("surface.overlay_opacity", self.surface.overlay_opacity),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ReelError::config(format!("{} must be in [0, 1]", name)));
            }
        }
        Ok(())
    }
}
