use crate::app::PixelRect;

use super::{DrawParams, ImageRegion};

/// Render sink: everything the world and entity code draws goes through this trait.
pub trait RenderTarget {
    fn draw_image(&mut self, image: &ImageRegion, params: &DrawParams);
    fn fill_rect(&mut self, rect: PixelRect, color: [u8; 4]);
}

/// Software RGBA8 canvas. An optional clip rectangle limits drawing and clearing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    clip: Option<PixelRect>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
            clip: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }

    pub fn set_clip(&mut self, clip: Option<PixelRect>) {
        self.clip = clip;
    }

    /// The drawable area: the clip rectangle intersected with the bounds.
    pub fn clip_rect(&self) -> PixelRect {
        match self.clip {
            Some(clip) => clip.intersect(&self.bounds()),
            None => self.bounds(),
        }
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Overwrites every pixel inside the clip rectangle.
    pub fn clear(&mut self, color: [u8; 4]) {
        if self.clip.is_none() {
            for chunk in self.rgba.chunks_exact_mut(4) {
                chunk.copy_from_slice(&color);
            }
            return;
        }
        let rect = self.clip_rect();
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if let Some(offset) = self.byte_offset(x, y) {
                    self.rgba[offset..offset + 4].copy_from_slice(&color);
                }
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let offset = self.byte_offset(x as i32, y as i32)?;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.rgba[offset..offset + 4]);
        Some(out)
    }

    /// Raw (non-blended) copy of `src_rect` from `source` to `(dest_x, dest_y)`. Clipped on both sides.
    pub fn copy_region_from(
        &mut self,
        source: &Surface,
        src_rect: PixelRect,
        dest_x: i32,
        dest_y: i32,
    ) {
        let src_rect = src_rect.intersect(&source.bounds());
        if src_rect.is_empty() {
            return;
        }
        for row in 0..src_rect.h as i32 {
            for col in 0..src_rect.w as i32 {
                let Some(src_offset) = source.byte_offset(src_rect.x + col, src_rect.y + row)
                else {
                    continue;
                };
                let Some(dst_offset) = self.byte_offset(dest_x + col, dest_y + row) else {
                    continue;
                };
                self.rgba[dst_offset..dst_offset + 4]
                    .copy_from_slice(&source.rgba[src_offset..src_offset + 4]);
            }
        }
    }

    fn byte_offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        let pixel_offset = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?;
        let byte_offset = pixel_offset.checked_mul(4)?;
        if byte_offset + 4 > self.rgba.len() {
            return None;
        }
        Some(byte_offset)
    }

    fn blend_at(&mut self, x: i32, y: i32, src: [u8; 4], alpha: f32) {
        let Some(offset) = self.byte_offset(x, y) else {
            return;
        };
        blend_pixel(&mut self.rgba[offset..offset + 4], src, alpha);
    }
}

impl RenderTarget for Surface {
    fn draw_image(&mut self, image: &ImageRegion, params: &DrawParams) {
        let (src_w, src_h) = (image.width(), image.height());
        let clip = self.clip_rect();
        if src_w == 0 || src_h == 0 || clip.is_empty() {
            return;
        }
        let alpha = params.alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let Some(inverse) = params.transform.inverse() else {
            return;
        };

        let corners = [
            params.transform.apply(0.0, 0.0),
            params.transform.apply(src_w as f32, 0.0),
            params.transform.apply(0.0, src_h as f32),
            params.transform.apply(src_w as f32, src_h as f32),
        ];
        let min_x = corners.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = corners.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
            return;
        }

        let left = (min_x.floor() as i32).max(clip.x);
        let top = (min_y.floor() as i32).max(clip.y);
        let right = (max_x.ceil() as i32).min(clip.right());
        let bottom = (max_y.ceil() as i32).min(clip.bottom());
        if left >= right || top >= bottom {
            return;
        }

        for out_y in top..bottom {
            for out_x in left..right {
                let (sx, sy) = inverse.apply(out_x as f32 + 0.5, out_y as f32 + 0.5);
                if sx < 0.0 || sy < 0.0 || sx >= src_w as f32 || sy >= src_h as f32 {
                    continue;
                }
                let Some(src) = image.sample(sx as u32, sy as u32) else {
                    continue;
                };
                self.blend_at(out_x, out_y, src, alpha);
            }
        }
    }

    fn fill_rect(&mut self, rect: PixelRect, color: [u8; 4]) {
        let rect = rect.intersect(&self.clip_rect());
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.blend_at(x, y, color, 1.0);
            }
        }
    }
}

fn blend_pixel(dst: &mut [u8], src: [u8; 4], alpha: f32) {
    let a = (src[3] as f32 / 255.0) * alpha;
    if a <= 0.0 {
        return;
    }
    if a >= 1.0 {
        dst[..3].copy_from_slice(&src[..3]);
        dst[3] = 255;
        return;
    }
    for channel in 0..3 {
        let blended = src[channel] as f32 * a + dst[channel] as f32 * (1.0 - a);
        dst[channel] = blended.round().clamp(0.0, 255.0) as u8;
    }
    let dst_a = dst[3] as f32 / 255.0;
    dst[3] = ((a + dst_a * (1.0 - a)) * 255.0).round().clamp(0.0, 255.0) as u8;
}
