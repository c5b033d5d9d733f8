//! # scrollreel-render
//!
//! The I/O side of scrollreel: frame loaders, the two-tier prefetch cache, the
//! render surface projection and [`ParallaxSession`], which wires a scroll
//! driver to all of them for the lifetime of one mounted view.

pub mod image_loader;
pub mod loader;
pub mod prefetch;
pub mod session;
pub mod surface;

pub use loader::{loader_for_root, FrameLoader, FsFrameLoader, HttpFrameLoader, SyntheticFrameLoader};
pub use prefetch::{CacheStats, FrameSlot, PrefetchCache, WarmHandle};
pub use session::ParallaxSession;
pub use surface::{Paint, RenderSurface, SurfaceFrame};
