mod animation;
mod camera;
mod geometry;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use animation::{AnimatedSprite, FrameTimer, SheetLayout, DEFAULT_FRAME_INTERVAL};
pub use camera::{Camera, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
pub use geometry::{overlaps, PixelRect, Rect, Vec2};
pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    DrawParams, Image, ImageError, ImageRegion, RenderTarget, Renderer, Surface, Transform2D,
    PLACEHOLDER_COLOR, PLACEHOLDER_SIZE_PX,
};
pub use scene::{InputSnapshot, Scene, SceneCommand};
