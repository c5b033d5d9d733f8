use scrollreel_core::PageLayout;

use crate::trigger::ScrollTrigger;

/// Normalized scroll progress through the tall container.
///
/// Holds the last measured geometry. A resize marks it stale; a stale tracker
/// must be handed a fresh measurement before it computes progress again.
#[derive(Debug, Clone)]
pub struct ScrollProgressTracker {
    trigger: ScrollTrigger,
    layout: Option<PageLayout>,
    stale: bool,
}

impl ScrollProgressTracker {
    pub fn new() -> Self {
        Self::with_trigger(ScrollTrigger::CONTAINER)
    }

    pub fn with_trigger(trigger: ScrollTrigger) -> Self {
        Self {
            trigger,
            layout: None,
            stale: true,
        }
    }

    /// Mark the cached geometry as outdated.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// True when there is no geometry or it has been invalidated.
    pub fn needs_measure(&self) -> bool {
        self.stale || self.layout.is_none()
    }

    pub fn set_layout(&mut self, layout: PageLayout) {
        self.layout = Some(layout);
        self.stale = false;
    }

    pub fn layout(&self) -> Option<&PageLayout> {
        self.layout.as_ref()
    }

    /// Progress in [0, 1] for a scroll offset. Unmeasured trackers report 0.
    pub fn progress(&self, offset: f64) -> f64 {
        match &self.layout {
            Some(layout) => {
                self.trigger
                    .progress(offset, &layout.container, layout.viewport_height)
            }
            None => 0.0,
        }
    }
}

impl Default for ScrollProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollreel_core::ElementBox;

    #[test]
    fn test_unmeasured_tracker() {
        let tracker = ScrollProgressTracker::new();
        assert!(tracker.needs_measure());
        assert_eq!(tracker.progress(500.0), 0.0);
    }

    #[test]
    fn test_progress_non_decreasing_in_offset() {
        let mut tracker = ScrollProgressTracker::new();
        tracker.set_layout(PageLayout::new(ElementBox::new(0.0, 6000.0), 900.0));
        let mut prev = 0.0;
        for step in 0..=700 {
            let p = tracker.progress(step as f64 * 10.0 - 500.0);
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= prev);
            prev = p;
        }
        assert_eq!(prev, 1.0);
    }

    #[test]
    fn test_invalidate_requires_measure() {
        let mut tracker = ScrollProgressTracker::new();
        tracker.set_layout(PageLayout::new(ElementBox::new(0.0, 2000.0), 1000.0));
        assert!(!tracker.needs_measure());
        tracker.invalidate();
        assert!(tracker.needs_measure());
        tracker.set_layout(PageLayout::new(ElementBox::new(0.0, 3000.0), 1000.0));
        assert!((tracker.progress(1000.0) - 0.5).abs() < 1e-9);
    }
}
