//! Browser-side scroll engine.
//!
//! Mirrors the native parallax session without the prefetch cache or any
//! async runtime: the page hands in measured geometry and scroll offsets,
//! the engine hands back frame changes and section transforms. Image loading
//! stays with the host, driven by [`PrefetchPlan`].

use std::cell::RefCell;
use std::rc::Rc;

use scrollreel_core::{FrameIndex, FrameLocation, FrameResolver, PageLayout, PrefetchPlan, ReelConfig, ReelResult};
use scrollreel_motion::{
    FrameFollower, FrameSelector, ScrollDriver, Scrub, SectionFollower, SectionOrchestrator,
    SectionTimeline, SectionTransform,
};

#[derive(Debug, Default)]
struct View {
    frame: Option<FrameIndex>,
    changed: Option<FrameIndex>,
    sections: Vec<SectionTransform>,
}

pub struct WasmEngine {
    config: ReelConfig,
    resolver: FrameResolver,
    layout: Rc<RefCell<PageLayout>>,
    driver: ScrollDriver<Rc<RefCell<PageLayout>>>,
    view: Rc<RefCell<View>>,
    /// Last offset seen; replayed when the first layout arrives.
    offset: f64,
    measured: bool,
}

impl WasmEngine {
    pub fn new(config: ReelConfig) -> ReelResult<Self> {
        config.validate()?;
        let layout = Rc::new(RefCell::new(PageLayout::default()));
        let view = Rc::new(RefCell::new(View::default()));
        let mut driver = ScrollDriver::new(layout.clone());

        let frames = view.clone();
        driver.subscribe(
            FrameFollower::new(FrameSelector::new(config.sequence.total_frames), move |index| {
                let mut v = frames.borrow_mut();
                v.frame = Some(index);
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

        Ok(Self {
            resolver: FrameResolver::new(&config.sequence),
            config,
            layout,
            driver,
            view,
            offset: 0.0,
            measured: false,
        })
    }

    pub fn resolve(&self, index: i64) -> ReelResult<FrameLocation> {
        self.resolver.resolve(index)
    }

    pub fn prefetch_plan(&self) -> PrefetchPlan {
        PrefetchPlan::new(self.config.sequence.total_frames, &self.config.prefetch)
    }

    /// Replace the measured geometry. The first call selects a frame for the
    /// latest scroll offset; later calls are treated as a resize.
    pub fn set_layout(&mut self, layout: PageLayout) -> Option<FrameIndex> {
        *self.layout.borrow_mut() = layout;
        if self.measured {
            self.driver.on_resize();
        } else {
            self.measured = true;
            self.driver.on_scroll(self.offset);
        }
        self.take_change()
    }

    /// Nothing is selected before the first layout; the offset is kept.
    pub fn on_scroll(&mut self, offset: f64) -> Option<FrameIndex> {
        self.offset = offset;
        if !self.measured {
            return None;
        }
        self.driver.on_scroll(offset);
        self.take_change()
    }

    pub fn tick(&mut self, dt: f64) -> Option<FrameIndex> {
        if !self.measured {
            return None;
        }
        self.driver.tick(dt);
        self.take_change()
    }

    /// The frame on screen; the first frame until a layout has been set.
    pub fn current_frame(&self) -> FrameIndex {
        self.view.borrow().frame.unwrap_or(FrameIndex::FIRST)
    }

    pub fn section_transforms(&self) -> Vec<SectionTransform> {
        self.view.borrow().sections.clone()
    }

    pub fn config(&self) -> &ReelConfig {
        &self.config
    }

    fn take_change(&mut self) -> Option<FrameIndex> {
        self.view.borrow_mut().changed.take()
    }
}
