//! Scroll notification fan-out.
//!
//! The host forwards scroll, resize and animation-frame events to a
//! [`ScrollDriver`]. The driver keeps geometry fresh through a [`LayoutSource`]
//! and hands every subscribed [`ScrollListener`] the same [`ScrollSample`].

use std::cell::RefCell;
use std::rc::Rc;

use scrollreel_core::PageLayout;

use crate::tracker::ScrollProgressTracker;

/// Measures the page. Called after every resize, before progress is computed.
pub trait LayoutSource {
    fn measure(&self) -> PageLayout;
}

impl LayoutSource for PageLayout {
    fn measure(&self) -> PageLayout {
        self.clone()
    }
}

impl<P: LayoutSource> LayoutSource for Rc<RefCell<P>> {
    fn measure(&self) -> PageLayout {
        self.borrow().measure()
    }
}

/// What every listener sees for one notification.
#[derive(Debug, Clone, Copy)]
pub struct ScrollSample<'a> {
    pub offset: f64,
    /// Container progress in [0, 1].
    pub progress: f64,
    /// Seconds since the previous animation frame; zero for scroll/resize events.
    pub dt: f64,
    pub layout: &'a PageLayout,
}

pub trait ScrollListener {
    fn on_scroll(&mut self, sample: &ScrollSample<'_>);
}

impl<F: FnMut(&ScrollSample<'_>)> ScrollListener for F {
    fn on_scroll(&mut self, sample: &ScrollSample<'_>) {
        self(sample)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Owns the progress tracker and the subscribed listeners.
pub struct ScrollDriver<P> {
    source: P,
    tracker: ScrollProgressTracker,
    listeners: Vec<(ListenerId, Box<dyn ScrollListener>)>,
    next_id: u64,
    offset: f64,
}

impl<P> ScrollDriver<P> {
    pub fn new(source: P) -> Self {
        Self {
            source,
            tracker: ScrollProgressTracker::new(),
            listeners: Vec::new(),
            next_id: 0,
            offset: 0.0,
        }
    }

    pub fn subscribe(&mut self, listener: impl ScrollListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Drop every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn layout(&self) -> Option<&PageLayout> {
        self.tracker.layout()
    }
}

impl<P: LayoutSource> ScrollDriver<P> {
    /// Scroll notification. Returns the container progress.
    pub fn on_scroll(&mut self, offset: f64) -> f64 {
        self.offset = offset;
        self.dispatch(0.0)
    }

    /// Resize notification: the cached geometry is discarded and re-measured
    /// before progress is recomputed at the current offset.
    pub fn on_resize(&mut self) -> f64 {
        self.tracker.invalidate();
        self.dispatch(0.0)
    }

    /// Animation-frame callback; lets lagged listeners catch up.
    pub fn tick(&mut self, dt: f64) -> f64 {
        self.dispatch(dt)
    }

    fn dispatch(&mut self, dt: f64) -> f64 {
        if self.tracker.needs_measure() {
            let layout = self.source.measure();
            tracing::debug!(
                container_height = layout.container.height,
                viewport_height = layout.viewport_height,
                sections = layout.sections.len(),
                "re-measured page layout"
            );
            self.tracker.set_layout(layout);
        }

        let progress = self.tracker.progress(self.offset);
        let Some(layout) = self.tracker.layout() else {
            return progress;
        };
        let sample = ScrollSample {
            offset: self.offset,
            progress,
            dt,
            layout,
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_scroll(&sample);
        }
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollreel_core::ElementBox;

    fn recorder() -> (Rc<RefCell<Vec<f64>>>, impl FnMut(&ScrollSample<'_>)) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |s: &ScrollSample<'_>| sink.borrow_mut().push(s.progress))
    }

    #[test]
    fn test_listeners_receive_samples() {
        let layout = PageLayout::new(ElementBox::new(0.0, 3000.0), 1000.0);
        let mut driver = ScrollDriver::new(layout);
        let (seen, listener) = recorder();
        driver.subscribe(listener);

        assert!((driver.on_scroll(1000.0) - 0.5).abs() < 1e-9);
        driver.on_scroll(2000.0);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1], 1.0);
    }

    #[test]
    fn test_unsubscribe_and_clear() {
        let mut driver = ScrollDriver::new(PageLayout::new(ElementBox::new(0.0, 3000.0), 1000.0));
        let (seen, listener) = recorder();
        let id = driver.subscribe(listener);
        let (_, other) = recorder();
        driver.subscribe(other);
        assert!(driver.unsubscribe(id));
        assert!(!driver.unsubscribe(id));
        driver.on_scroll(10.0);
        assert!(seen.borrow().is_empty());
        driver.clear();
        assert_eq!(driver.listener_count(), 0);
    }

    #[test]
    fn test_resize_remeasures_before_progress() {
        let shared = Rc::new(RefCell::new(PageLayout::new(
            ElementBox::new(0.0, 3000.0),
            1000.0,
        )));
        let mut driver = ScrollDriver::new(shared.clone());
        assert!((driver.on_scroll(1000.0) - 0.5).abs() < 1e-9);

        // Viewport grows; without a resize notification the old geometry stands.
        shared.borrow_mut().viewport_height = 2000.0;
        assert!((driver.on_scroll(1000.0) - 0.5).abs() < 1e-9);

        assert_eq!(driver.on_resize(), 1.0);
        assert_eq!(driver.layout().map(|l| l.viewport_height), Some(2000.0));
    }
}
