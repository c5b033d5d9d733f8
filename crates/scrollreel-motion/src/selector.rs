//! Progress → frame index mapping with change suppression.

use scrollreel_core::FrameIndex;

use crate::observer::{ScrollListener, ScrollSample};
use crate::scrub::Scrub;

/// Maps normalized progress to a frame index in `[1, N]`.
///
/// The only state is the last emitted index, kept so that scroll jitter which
/// leaves the index unchanged does not trigger another repaint.
#[derive(Debug, Clone)]
pub struct FrameSelector {
    total: u32,
    last: Option<FrameIndex>,
}

impl FrameSelector {
    /// `total` is clamped to at least one frame.
    pub fn new(total: u32) -> Self {
        Self {
            total: total.max(1),
            last: None,
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// `clamp(ceil(progress * N), 1, N)`. NaN selects the first frame.
    ///
    /// The ceiling means any progress above zero already leaves frame 1 behind
    /// sooner than rounding would.
    pub fn select(&self, progress: f64) -> FrameIndex {
        if progress.is_nan() {
            return FrameIndex::FIRST;
        }
        let p = progress.clamp(0.0, 1.0);
        FrameIndex::clamped((p * self.total as f64).ceil() as i64, self.total)
    }

    /// Select, returning `Some` only when the index differs from the last emission.
    pub fn update(&mut self, progress: f64) -> Option<FrameIndex> {
        let index = self.select(progress);
        if self.last == Some(index) {
            return None;
        }
        self.last = Some(index);
        Some(index)
    }

    /// The last emitted index, if any.
    pub fn current(&self) -> Option<FrameIndex> {
        self.last
    }
}

/// Listener that runs a [`FrameSelector`] on each sample and calls `on_change`
/// for every emitted index.
pub struct FrameFollower<F> {
    selector: FrameSelector,
    scrub: Scrub,
    on_change: F,
}

impl<F: FnMut(FrameIndex)> FrameFollower<F> {
    pub fn new(selector: FrameSelector, on_change: F) -> Self {
        Self {
            selector,
            scrub: Scrub::passthrough(),
            on_change,
        }
    }

    pub fn with_scrub(mut self, scrub: Scrub) -> Self {
        self.scrub = scrub;
        self
    }
}

impl<F: FnMut(FrameIndex)> ScrollListener for FrameFollower<F> {
    fn on_scroll(&mut self, sample: &ScrollSample<'_>) {
        let shown = self.scrub.advance(sample.progress, sample.dt);
        if let Some(index) = self.selector.update(shown) {
            tracing::trace!(frame = index.get(), progress = shown, "frame changed");
            (self.on_change)(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_bounds() {
        let s = FrameSelector::new(96);
        assert_eq!(s.select(0.0).get(), 1);
        assert_eq!(s.select(1.0).get(), 96);
        assert_eq!(s.select(-0.2).get(), 1);
        assert_eq!(s.select(1.7).get(), 96);
        assert_eq!(s.select(f64::NAN).get(), 1);
    }

    #[test]
    fn test_select_uses_ceiling() {
        let s = FrameSelector::new(96);
        assert_eq!(s.select(0.001).get(), 1);
        assert_eq!(s.select(0.011).get(), 2);
        assert_eq!(s.select(0.5).get(), 48);
        assert_eq!(s.select(0.5001).get(), 49);
    }

    #[test]
    fn test_select_in_range_and_monotone() {
        let s = FrameSelector::new(96);
        let mut prev = s.select(0.0);
        for i in 0..=10_000 {
            let idx = s.select(i as f64 / 10_000.0);
            assert!((1..=96).contains(&idx.get()));
            assert!(idx >= prev);
            prev = idx;
        }
    }

    #[test]
    fn test_change_suppression() {
        let mut s = FrameSelector::new(96);
        assert_eq!(s.update(0.30).map(|f| f.get()), Some(29));
        // 0.301 still maps to frame 29
        assert_eq!(s.update(0.301), None);
        assert_eq!(s.current().map(|f| f.get()), Some(29));
        assert!(s.update(0.5).is_some());
    }

    #[test]
    fn test_single_frame_sequence() {
        let s = FrameSelector::new(1);
        assert_eq!(s.select(0.0).get(), 1);
        assert_eq!(s.select(0.7).get(), 1);
        assert_eq!(FrameSelector::new(0).total(), 1);
    }
}
