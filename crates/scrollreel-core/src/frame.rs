use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{ReelError, ReelResult};

/// One still image of the sequence, 1-based.
///
/// Only constructible through [`FrameIndex::new`], which checks the `[1, total]` domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FrameIndex(u32);

impl FrameIndex {
    /// The first frame of every sequence.
    pub const FIRST: FrameIndex = FrameIndex(1);

    /// Create a frame index, failing with `OutOfRange` outside `[1, total]`.
    pub fn new(index: i64, total: u32) -> ReelResult<Self> {
        if index < 1 || index > total as i64 {
            return Err(ReelError::out_of_range(index, total));
        }
        Ok(FrameIndex(index as u32))
    }

    /// Clamp an arbitrary integer into `[1, total]`.
    pub fn clamped(index: i64, total: u32) -> Self {
        FrameIndex(index.clamp(1, total.max(1) as i64) as u32)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A decoded frame as a raw RGBA8 pixel buffer.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// Raw pixel data, 4 bytes per pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Create a frame buffer filled with a solid color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            data.extend_from_slice(&rgba);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Get the RGBA value at a pixel coordinate. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Opaque, read-only reference to a loaded frame image.
///
/// Cloning is cheap; the pixels are shared.
#[derive(Debug, Clone)]
pub struct FrameHandle {
    index: FrameIndex,
    buffer: Arc<FrameBuffer>,
}

impl FrameHandle {
    pub fn new(index: FrameIndex, buffer: FrameBuffer) -> Self {
        Self {
            index,
            buffer: Arc::new(buffer),
        }
    }

    pub fn index(&self) -> FrameIndex {
        self.index
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    pub fn height(&self) -> u32 {
        self.buffer.height
    }

    /// True if both handles share the same decoded pixels.
    pub fn same_image(&self, other: &FrameHandle) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_index_domain() {
        assert!(FrameIndex::new(0, 96).is_err());
        assert!(FrameIndex::new(97, 96).is_err());
        assert!(FrameIndex::new(-3, 96).is_err());
        assert_eq!(FrameIndex::new(1, 96).unwrap().get(), 1);
        assert_eq!(FrameIndex::new(96, 96).unwrap().get(), 96);
    }

    #[test]
    fn test_frame_index_clamped() {
        assert_eq!(FrameIndex::clamped(0, 96).get(), 1);
        assert_eq!(FrameIndex::clamped(500, 96).get(), 96);
        assert_eq!(FrameIndex::clamped(40, 96).get(), 40);
    }

    #[test]
    fn test_solid_buffer_pixels() {
        let fb = FrameBuffer::solid(4, 2, [10, 20, 30, 255]);
        assert_eq!(fb.data.len(), 32);
        assert_eq!(fb.get_pixel(3, 1), Some([10, 20, 30, 255]));
        assert_eq!(fb.get_pixel(4, 0), None);
    }

    #[test]
    fn test_handle_shares_pixels() {
        let idx = FrameIndex::new(5, 10).unwrap();
        let a = FrameHandle::new(idx, FrameBuffer::solid(2, 2, [0, 0, 0, 255]));
        let b = a.clone();
        assert!(a.same_image(&b));
        assert_eq!(b.index(), idx);
        assert_eq!((b.width(), b.height()), (2, 2));
    }
}
