//! # scrollreel-core
//!
//! Core types and primitives for the scrollreel engine.
//! This crate contains the foundational types shared across all scrollreel crates:
//! frame indices, decoded frame buffers, page geometry, easing, configuration,
//! the frame reference resolver and error types.

pub mod config;
pub mod error;
pub mod frame;
pub mod layout;
pub mod plan;
pub mod resolve;
pub mod types;

pub use config::*;

pub use error::{ReelError, ReelResult};
pub use frame::{FrameBuffer, FrameHandle, FrameIndex};
pub use layout::{ElementBox, PageLayout};
pub use plan::PrefetchPlan;
pub use resolve::{FrameLocation, FrameResolver};
pub use types::Easing;
