use std::time::Duration;

use super::rendering::{DrawParams, ImageRegion, RenderTarget};
use super::PixelRect;

pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(200);

/// How long a frame is held before advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTimer {
    /// Advance after this many `update` calls.
    Ticks(u32),
    /// Advance once the accumulated step time reaches this interval.
    Interval(Duration),
}

/// Where frames sit on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetLayout {
    /// Frames run left to right along a single row.
    Row(u32),
    /// Frames wrap across rows: `columns_per_row = sheet_width / frame_width`.
    Flow,
}

#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    sheet: ImageRegion,
    frame_width: u32,
    frame_height: u32,
    frame_count: u32,
    current_frame: u32,
    layout: SheetLayout,
    timer: FrameTimer,
    ticks_since_advance: u32,
    time_since_advance: Duration,
}

impl AnimatedSprite {
    pub fn new(
        sheet: ImageRegion,
        frame_width: u32,
        frame_height: u32,
        frame_count: u32,
        timer: FrameTimer,
    ) -> Self {
        Self {
            sheet,
            frame_width: frame_width.max(1),
            frame_height: frame_height.max(1),
            frame_count: frame_count.max(1),
            current_frame: 0,
            layout: SheetLayout::Row(0),
            timer,
            ticks_since_advance: 0,
            time_since_advance: Duration::ZERO,
        }
    }

    pub fn with_layout(mut self, layout: SheetLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn layout(&self) -> SheetLayout {
        self.layout
    }

    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    pub fn update(&mut self, dt: Duration) {
        let due = match self.timer {
            FrameTimer::Ticks(delay) => {
                self.ticks_since_advance = self.ticks_since_advance.saturating_add(1);
                self.ticks_since_advance >= delay.max(1)
            }
            FrameTimer::Interval(interval) => {
                self.time_since_advance = self.time_since_advance.saturating_add(dt);
                self.time_since_advance >= interval
            }
        };
        if due {
            self.current_frame = (self.current_frame + 1) % self.frame_count;
            self.ticks_since_advance = 0;
            self.time_since_advance = Duration::ZERO;
        }
    }

    pub fn set_row(&mut self, row: u32) {
        self.layout = SheetLayout::Row(row);
    }

    pub fn reset(&mut self) {
        self.current_frame = 0;
        self.ticks_since_advance = 0;
        self.time_since_advance = Duration::ZERO;
    }

    /// Top-left of the current frame in sheet pixels.
    pub fn frame_origin(&self) -> (u32, u32) {
        match self.layout {
            SheetLayout::Row(row) => (
                self.current_frame * self.frame_width,
                row * self.frame_height,
            ),
            SheetLayout::Flow => {
                let columns = (self.sheet.width() / self.frame_width).max(1);
                (
                    (self.current_frame % columns) * self.frame_width,
                    (self.current_frame / columns) * self.frame_height,
                )
            }
        }
    }

    pub fn frame_region(&self) -> ImageRegion {
        let (x, y) = self.frame_origin();
        self.sheet.sub_region(PixelRect::new(
            x as i32,
            y as i32,
            self.frame_width,
            self.frame_height,
        ))
    }

    pub fn draw(&self, target: &mut dyn RenderTarget, params: &DrawParams) {
        target.draw_image(&self.frame_region(), params);
    }
}
