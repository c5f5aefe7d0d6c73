mod image;
mod renderer;
mod surface;
mod transform;

pub use image::{Image, ImageError, ImageRegion, PLACEHOLDER_COLOR, PLACEHOLDER_SIZE_PX};
pub use renderer::Renderer;
pub use surface::{RenderTarget, Surface};
pub use transform::{DrawParams, Transform2D};
