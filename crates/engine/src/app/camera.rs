use super::rendering::Surface;
use super::{PixelRect, Vec2};

pub const DEFAULT_VIEWPORT_WIDTH: u32 = 800;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 600;

/// Fixed-size window onto the world surface, centred on a follow point and kept inside the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    viewport_width: u32,
    viewport_height: u32,
    follow: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
    }
}

impl Camera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport_width,
            viewport_height,
            follow: Vec2::default(),
        }
    }

    pub fn viewport_size(&self) -> (u32, u32) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn follow(&self) -> Vec2 {
        self.follow
    }

    pub fn set_follow(&mut self, point: Vec2) {
        self.follow = point;
    }

    pub fn reset(&mut self) {
        self.follow = Vec2::default();
    }

    /// Top-left of the viewport in world pixels. Each axis lies in
    /// `[0, world - viewport]`, collapsing to 0 when the world is the smaller one.
    pub fn origin(&self, world_width: u32, world_height: u32) -> (i32, i32) {
        (
            clamp_axis(self.follow.x, self.viewport_width, world_width),
            clamp_axis(self.follow.y, self.viewport_height, world_height),
        )
    }

    /// The region of the world surface to show. Width and height shrink to
    /// what the world actually has when it is smaller than the viewport.
    pub fn visible_rect(&self, world_width: u32, world_height: u32) -> PixelRect {
        let (x, y) = self.origin(world_width, world_height);
        let w = self
            .viewport_width
            .min(world_width.saturating_sub(x.max(0) as u32));
        let h = self
            .viewport_height
            .min(world_height.saturating_sub(y.max(0) as u32));
        PixelRect::new(x.max(0), y.max(0), w, h)
    }

    pub fn draw(&self, world: &Surface, screen: &mut Surface) {
        let rect = self.visible_rect(world.width(), world.height());
        screen.copy_region_from(world, rect, 0, 0);
    }
}

fn clamp_axis(center: f32, viewport: u32, world: u32) -> i32 {
    let centered = center.floor() as i64 - (viewport / 2) as i64;
    let max_origin = world as i64 - viewport as i64;
    centered.min(max_origin).max(0) as i32
}
