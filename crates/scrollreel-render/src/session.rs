//! The parallax view as an owned resource.
//!
//! Mounting warms the prefetch cache and subscribes the frame selector and
//! section orchestrator to a scroll driver. Teardown (explicit or on drop)
//! releases the listeners and the deferred prefetch timer; loads already in
//! flight are left to finish against the cache or be discarded.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use scrollreel_core::{FrameIndex, FrameResolver, PrefetchPlan, ReelConfig, ReelResult};
use scrollreel_motion::{
    FrameFollower, FrameSelector, LayoutSource, ScrollDriver, Scrub, SectionFollower,
    SectionOrchestrator, SectionTimeline, SectionTransform,
};

use crate::loader::FrameLoader;
use crate::prefetch::{PrefetchCache, WarmHandle};
use crate::surface::{RenderSurface, SurfaceFrame};

#[derive(Debug)]
struct ViewState {
    frame: FrameIndex,
    changed: Option<FrameIndex>,
    sections: Vec<SectionTransform>,
}

pub struct ParallaxSession<P> {
    driver: ScrollDriver<P>,
    cache: PrefetchCache,
    warm: Option<WarmHandle>,
    surface: RenderSurface,
    view: Rc<RefCell<ViewState>>,
    mounted: bool,
}

impl<P: LayoutSource> ParallaxSession<P> {
    /// Validate `config`, start the prefetch warm-up and subscribe listeners.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(config: &ReelConfig, loader: Arc<dyn FrameLoader>, source: P) -> ReelResult<Self> {
        config.validate()?;

        let total = config.sequence.total_frames;
        let resolver = FrameResolver::new(&config.sequence);
        let cache = PrefetchCache::new(resolver.clone(), loader);
        let warm = cache.warm(&PrefetchPlan::new(total, &config.prefetch))?;

        let view = Rc::new(RefCell::new(ViewState {
            frame: FrameIndex::FIRST,
            changed: None,
            sections: Vec::new(),
        }));

        let mut driver = ScrollDriver::new(source);
        let frames = view.clone();
        driver.subscribe(
            FrameFollower::new(FrameSelector::new(total), move |index| {
                let mut v = frames.borrow_mut();
                v.frame = index;
                v.changed = Some(index);
            })
            .with_scrub(Scrub::new(config.scrub.frame_lag)),
        );
        let sections = view.clone();
        driver.subscribe(SectionFollower::new(
            SectionOrchestrator::new(SectionTimeline::reveal(&config.timeline))
                .with_lag(config.scrub.section_lag),
            move |transforms: &[SectionTransform]| {
                let mut v = sections.borrow_mut();
                v.sections.clear();
                v.sections.extend_from_slice(transforms);
            },
        ));

        tracing::info!(frames = total, "parallax session mounted");
        let mut session = Self {
            driver,
            cache,
            warm: Some(warm),
            surface: RenderSurface::new(config.surface.clone(), resolver),
            view,
            mounted: true,
        };
        // Initial measurement and projection at the top of the page.
        session.driver.on_scroll(0.0);
        session.take_change();
        Ok(session)
    }

    /// Scroll notification. Returns the new frame if it changed.
    pub fn on_scroll(&mut self, offset: f64) -> Option<FrameIndex> {
        self.driver.on_scroll(offset);
        self.take_change()
    }

    /// Resize notification; geometry is re-measured before anything is recomputed.
    pub fn on_resize(&mut self) -> Option<FrameIndex> {
        self.driver.on_resize();
        self.take_change()
    }

    /// Animation-frame callback for lagged scrubbing.
    pub fn tick(&mut self, dt: f64) -> Option<FrameIndex> {
        self.driver.tick(dt);
        self.take_change()
    }

    pub fn current_frame(&self) -> FrameIndex {
        self.view.borrow().frame
    }

    pub fn section_transforms(&self) -> Vec<SectionTransform> {
        self.view.borrow().sections.clone()
    }

    /// Project the current state for painting.
    pub fn frame(&self) -> SurfaceFrame {
        let view = self.view.borrow();
        self.surface.project(view.frame, &view.sections, &self.cache)
    }

    pub fn cache(&self) -> &PrefetchCache {
        &self.cache
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn listener_count(&self) -> usize {
        self.driver.listener_count()
    }

    /// Wait for the deferred prefetch tier to be issued and every load to settle.
    pub async fn settle(&mut self) {
        if let Some(warm) = self.warm.as_mut() {
            warm.deferred_issued().await;
        }
        self.cache.wait_idle().await;
    }

    fn take_change(&mut self) -> Option<FrameIndex> {
        self.view.borrow_mut().changed.take()
    }
}

impl<P> ParallaxSession<P> {
    /// Release listeners and the deferred prefetch timer. Idempotent.
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.driver.clear();
        if let Some(mut warm) = self.warm.take() {
            warm.cancel_deferred();
        }
        self.mounted = false;
        tracing::info!(stats = ?self.cache.stats(), "parallax session torn down");
    }
}

impl<P> Drop for ParallaxSession<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}
