//! # scrollreel-motion
//!
//! Everything that turns a scroll offset into motion: scroll triggers, the
//! container progress tracker, the frame selector, scrub smoothing and the
//! per-section reveal timelines. A [`ScrollDriver`] owns the tracker and fans
//! each scroll sample out to its subscribed listeners.
//!
//! Nothing here performs I/O; every computation is O(1) per sample (O(sections)
//! for the section orchestrator).

pub mod observer;
pub mod scrub;
pub mod section;
pub mod selector;
pub mod timeline;
pub mod tracker;
pub mod trigger;

pub use observer::{LayoutSource, ListenerId, ScrollDriver, ScrollListener, ScrollSample};
pub use scrub::Scrub;
pub use section::{SectionFollower, SectionOrchestrator, SectionTimeline, SectionTransform};
pub use selector::{FrameFollower, FrameSelector};
pub use timeline::{Keyframe, Property, Timeline, Track};
pub use tracker::ScrollProgressTracker;
pub use trigger::{Edge, ScrollTrigger, TriggerPoint};
