use std::sync::Arc;

use thiserror::Error;

use crate::app::PixelRect;

pub const PLACEHOLDER_SIZE_PX: u32 = 32;
pub const PLACEHOLDER_COLOR: [u8; 4] = [255, 0, 255, 255];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    ZeroSized { width: u32, height: u32 },
    #[error("rgba byte count mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Decoded RGBA8 pixels, row-major. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Image {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::ZeroSized { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Solid fill. Zero dimensions are bumped to one pixel.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            rgba.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn placeholder() -> Self {
        Self::solid(PLACEHOLDER_SIZE_PX, PLACEHOLDER_SIZE_PX, PLACEHOLDER_COLOR)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.rgba[offset..offset + 4]);
        Some(out)
    }
}

/// A rectangular view into a shared image (a tile of a tileset, a frame of a sheet).
#[derive(Debug, Clone)]
pub struct ImageRegion {
    image: Arc<Image>,
    rect: PixelRect,
}

impl ImageRegion {
    pub fn full(image: Arc<Image>) -> Self {
        let rect = PixelRect::new(0, 0, image.width(), image.height());
        Self { image, rect }
    }

    pub fn image(&self) -> &Arc<Image> {
        &self.image
    }

    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    pub fn width(&self) -> u32 {
        self.rect.w
    }

    pub fn height(&self) -> u32 {
        self.rect.h
    }

    /// `rect` is relative to this region and clipped to it, so an out-of-range
    /// frame yields an empty region rather than reading a neighbouring one.
    pub fn sub_region(&self, rect: PixelRect) -> ImageRegion {
        let absolute = PixelRect::new(
            self.rect.x.saturating_add(rect.x),
            self.rect.y.saturating_add(rect.y),
            rect.w,
            rect.h,
        );
        ImageRegion {
            image: Arc::clone(&self.image),
            rect: absolute.intersect(&self.rect),
        }
    }

    pub fn sample(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.rect.w || y >= self.rect.h {
            return None;
        }
        self.image
            .pixel((self.rect.x as u32).saturating_add(x), (self.rect.y as u32).saturating_add(y))
    }
}
