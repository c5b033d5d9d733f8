//! Per-section reveal timelines.
//!
//! Each section is scrubbed by its own trigger (top at viewport center →
//! bottom at viewport center), independent of the container progress that
//! drives the frame sequence.

use scrollreel_core::config::TimelineConfig;
use scrollreel_core::ElementBox;
use serde::Serialize;

use crate::observer::{ScrollListener, ScrollSample};
use crate::scrub::Scrub;
use crate::timeline::{Keyframe, Property, Timeline, Track};
use crate::trigger::ScrollTrigger;

/// Visual state applied to one section, centered on the section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectionTransform {
    /// In [0, 1].
    pub opacity: f64,
    /// Never negative.
    pub scale: f64,
}

impl SectionTransform {
    pub fn new(opacity: f64, scale: f64) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0),
            scale: scale.max(0.0),
        }
    }
}

/// A trigger plus the timeline it scrubs.
#[derive(Debug, Clone)]
pub struct SectionTimeline {
    trigger: ScrollTrigger,
    timeline: Timeline,
}

impl SectionTimeline {
    pub fn new(trigger: ScrollTrigger, timeline: Timeline) -> Self {
        Self { trigger, timeline }
    }

    /// Enter (fade + grow to peak) until `split`, then exit (grow further + fade out).
    pub fn reveal(config: &TimelineConfig) -> Self {
        let scale = Track::new(Property::Scale)
            .with_keyframe(Keyframe::new(0.0, config.enter_scale))
            .with_keyframe(
                Keyframe::new(config.split, config.peak_scale).with_easing(config.enter_easing),
            )
            .with_keyframe(Keyframe::new(1.0, config.exit_scale).with_easing(config.exit_easing));
        let opacity = Track::new(Property::Opacity)
            .with_keyframe(Keyframe::new(0.0, 0.0))
            .with_keyframe(Keyframe::new(config.split, 1.0).with_easing(config.enter_easing))
            .with_keyframe(Keyframe::new(1.0, 0.0).with_easing(config.exit_easing));
        Self::new(
            ScrollTrigger::SECTION,
            Timeline::new().with_track(scale).with_track(opacity),
        )
    }

    /// Local progress of one section, clamped to [0, 1].
    pub fn local_progress(&self, offset: f64, section: &ElementBox, viewport_height: f64) -> f64 {
        self.trigger.progress(offset, section, viewport_height)
    }

    /// Pure mapping from local progress to the section's transform.
    pub fn transform_at(&self, progress: f64) -> SectionTransform {
        SectionTransform::new(
            self.timeline.value(Property::Opacity, progress).unwrap_or(1.0),
            self.timeline.value(Property::Scale, progress).unwrap_or(1.0),
        )
    }
}

#[derive(Debug, Clone)]
struct SectionState {
    scrub: Scrub,
    transform: SectionTransform,
}

/// Drives one [`SectionTimeline`] per section of the current layout.
#[derive(Debug, Clone)]
pub struct SectionOrchestrator {
    timeline: SectionTimeline,
    lag: f64,
    states: Vec<SectionState>,
    transforms: Vec<SectionTransform>,
}

impl SectionOrchestrator {
    pub fn new(timeline: SectionTimeline) -> Self {
        Self {
            timeline,
            lag: 0.0,
            states: Vec::new(),
            transforms: Vec::new(),
        }
    }

    /// Smooth each section's local progress with the given lag (seconds).
    pub fn with_lag(mut self, lag_seconds: f64) -> Self {
        self.lag = lag_seconds;
        self
    }

    /// Recompute every section's transform for this sample.
    pub fn update(&mut self, sample: &ScrollSample<'_>) -> &[SectionTransform] {
        let sections = &sample.layout.sections;
        if self.states.len() != sections.len() {
            let initial = self.timeline.transform_at(0.0);
            self.states.resize_with(sections.len(), || SectionState {
                scrub: Scrub::new(self.lag),
                transform: initial,
            });
        }

        self.transforms.clear();
        for (section, state) in sections.iter().zip(self.states.iter_mut()) {
            let target =
                self.timeline
                    .local_progress(sample.offset, section, sample.layout.viewport_height);
            let shown = state.scrub.advance(target, sample.dt);
            state.transform = self.timeline.transform_at(shown);
            self.transforms.push(state.transform);
        }
        &self.transforms
    }

    pub fn transforms(&self) -> &[SectionTransform] {
        &self.transforms
    }
}

/// Listener that updates a [`SectionOrchestrator`] and hands the fresh
/// transforms to `on_update` on every sample.
pub struct SectionFollower<F> {
    orchestrator: SectionOrchestrator,
    on_update: F,
}

impl<F: FnMut(&[SectionTransform])> SectionFollower<F> {
    pub fn new(orchestrator: SectionOrchestrator, on_update: F) -> Self {
        Self {
            orchestrator,
            on_update,
        }
    }
}

impl<F: FnMut(&[SectionTransform])> ScrollListener for SectionFollower<F> {
    fn on_scroll(&mut self, sample: &ScrollSample<'_>) {
        let transforms = self.orchestrator.update(sample);
        (self.on_update)(transforms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollreel_core::PageLayout;

    fn approx(t: SectionTransform, opacity: f64, scale: f64) {
        assert!(
            (t.opacity - opacity).abs() < 1e-9 && (t.scale - scale).abs() < 1e-9,
            "expected {{opacity: {}, scale: {}}}, got {:?}",
            opacity,
            scale,
            t
        );
    }

    #[test]
    fn test_reveal_phase_boundaries() {
        let tl = SectionTimeline::reveal(&TimelineConfig::default());
        approx(tl.transform_at(0.0), 0.0, 0.5);
        approx(tl.transform_at(0.4), 1.0, 1.0);
        approx(tl.transform_at(1.0), 0.0, 2.5);
    }

    #[test]
    fn test_reveal_phase_midpoints() {
        let tl = SectionTimeline::reveal(&TimelineConfig::default());
        approx(tl.transform_at(0.2), 0.5, 0.75);
        approx(tl.transform_at(0.7), 0.5, 1.75);
    }

    #[test]
    fn test_transform_ranges() {
        let tl = SectionTimeline::reveal(&TimelineConfig::default());
        for i in 0..=100 {
            let t = tl.transform_at(i as f64 / 100.0);
            assert!((0.0..=1.0).contains(&t.opacity));
            assert!(t.scale >= 0.0);
        }
    }

    #[test]
    fn test_sections_are_independent() {
        let layout = PageLayout::stacked(800.0, 3);
        let mut orch = SectionOrchestrator::new(SectionTimeline::reveal(&TimelineConfig::default()));

        // First section's top (800) sits at viewport center (offset 400).
        let sample = ScrollSample {
            offset: 400.0,
            progress: 0.0,
            dt: 0.0,
            layout: &layout,
        };
        let transforms = orch.update(&sample).to_vec();
        assert_eq!(transforms.len(), 3);
        approx(transforms[0], 0.0, 0.5);
        approx(transforms[1], 0.0, 0.5);

        // Section 0 at its phase boundary: offset = 400 + 0.4 * 800.
        let sample = ScrollSample {
            offset: 720.0,
            progress: 0.0,
            dt: 0.0,
            layout: &layout,
        };
        let transforms = orch.update(&sample).to_vec();
        approx(transforms[0], 1.0, 1.0);
        approx(transforms[1], 0.0, 0.5);
        approx(transforms[2], 0.0, 0.5);
    }

    #[test]
    fn test_lagged_sections_trail() {
        let layout = PageLayout::stacked(800.0, 1);
        let mut orch = SectionOrchestrator::new(SectionTimeline::reveal(&TimelineConfig::default()))
            .with_lag(1.5);
        let at = |offset: f64, dt: f64| ScrollSample {
            offset,
            progress: 0.0,
            dt,
            layout: &layout,
        };
        orch.update(&at(400.0, 0.0));
        let t = orch.update(&at(720.0, 0.016))[0];
        assert!(t.opacity > 0.0 && t.opacity < 1.0);
    }
}
