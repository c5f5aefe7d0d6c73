use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use tracing::warn;
use winit::window::Window;

use super::Surface;

/// Presents a software `Surface` to the window. The pixel buffer is fixed at the
/// logical viewport size; `pixels` scales it to the window.
pub struct Renderer {
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
    warned_size_mismatch: bool,
}

impl Renderer {
    pub fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width.max(1), size.height.max(1), window);
        let pixels = Pixels::new(width, height, surface)?;
        Ok(Self {
            pixels,
            width,
            height,
            warned_size_mismatch: false,
        })
    }

    pub fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    pub fn present(&mut self, screen: &Surface) -> Result<(), Error> {
        if screen.width() != self.width || screen.height() != self.height {
            if !self.warned_size_mismatch {
                warn!(
                    screen_width = screen.width(),
                    screen_height = screen.height(),
                    buffer_width = self.width,
                    buffer_height = self.height,
                    "renderer_screen_size_mismatch"
                );
                self.warned_size_mismatch = true;
            }
            return Ok(());
        }
        self.pixels.frame_mut().copy_from_slice(screen.as_rgba());
        self.pixels.render()
    }
}
