use std::f32::consts::TAU;
use std::time::Duration;

use engine::{
    AnimatedSprite, DrawParams, FrameTimer, ImageRegion, Rect, RenderTarget, Transform2D, Vec2,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

pub(crate) const VEHICLE_SIZE: f32 = 80.0;
pub(crate) const VEHICLE_FRAME_DELAY_TICKS: u32 = 8;
const HEADING_MIN_TICKS: u32 = 120;
const HEADING_SPREAD_TICKS: u32 = 180;
const BOUNCE_HEADING_TICKS: u32 = 60;

/// Frame geometry of a vehicle sheet; frames are read from its first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SheetConfig {
    pub(crate) frame_width: u32,
    pub(crate) frame_height: u32,
    pub(crate) frame_count: u32,
}

/// Roams with a random heading, bouncing off world edges.
#[derive(Debug, Clone)]
pub(crate) struct Vehicle {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) heading_ticks_remaining: u32,
    max_speed: f32,
    sprite: AnimatedSprite,
    rng: ChaCha8Rng,
}

impl Vehicle {
    pub(crate) fn new(
        position: Vec2,
        sheet: ImageRegion,
        config: SheetConfig,
        max_speed: f32,
        rng: ChaCha8Rng,
    ) -> Self {
        let sprite = AnimatedSprite::new(
            sheet,
            config.frame_width,
            config.frame_height,
            config.frame_count,
            FrameTimer::Ticks(VEHICLE_FRAME_DELAY_TICKS),
        );
        let mut vehicle = Self {
            position,
            velocity: Vec2::default(),
            heading_ticks_remaining: 0,
            max_speed: max_speed.max(0.0),
            sprite,
            rng,
        };
        vehicle.change_heading();
        vehicle
    }

    pub(crate) fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, VEHICLE_SIZE, VEHICLE_SIZE)
    }

    #[cfg(test)]
    pub(crate) fn current_frame(&self) -> u32 {
        self.sprite.current_frame()
    }

    #[cfg(test)]
    pub(crate) fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// New uniform heading, 50-100% of max speed, held for 120-299 ticks.
    pub(crate) fn change_heading(&mut self) {
        let angle = self.rng.random::<f32>() * TAU;
        let speed = self.max_speed * (0.5 + self.rng.random::<f32>() * 0.5);
        self.velocity = Vec2::new(speed * angle.cos(), speed * angle.sin());
        self.heading_ticks_remaining =
            HEADING_MIN_TICKS + self.rng.random_range(0..HEADING_SPREAD_TICKS);
    }

    pub(crate) fn update(&mut self, world_width: f32, world_height: f32, dt: Duration) {
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;

        let max_x = (world_width - VEHICLE_SIZE).max(0.0);
        let max_y = (world_height - VEHICLE_SIZE).max(0.0);
        if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.bounce_x();
        } else if self.position.x > max_x {
            self.position.x = max_x;
            self.bounce_x();
        }
        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.bounce_y();
        } else if self.position.y > max_y {
            self.position.y = max_y;
            self.bounce_y();
        }

        self.sprite.update(dt);

        self.heading_ticks_remaining = self.heading_ticks_remaining.saturating_sub(1);
        if self.heading_ticks_remaining == 0 {
            self.change_heading();
        }
    }

    fn bounce_x(&mut self) {
        self.velocity.x = -self.velocity.x;
        self.shorten_heading();
    }

    fn bounce_y(&mut self) {
        self.velocity.y = -self.velocity.y;
        self.shorten_heading();
    }

    fn shorten_heading(&mut self) {
        self.heading_ticks_remaining = self.heading_ticks_remaining.min(BOUNCE_HEADING_TICKS);
    }

    /// Scales the frame to the vehicle box and turns it to face along the velocity.
    pub(crate) fn draw(&self, target: &mut dyn RenderTarget) {
        let (frame_width, frame_height) = self.sprite.frame_size();
        let half = VEHICLE_SIZE / 2.0;
        let angle = self.velocity.y.atan2(self.velocity.x);
        let transform = Transform2D::IDENTITY
            .scale(
                VEHICLE_SIZE / frame_width as f32,
                VEHICLE_SIZE / frame_height as f32,
            )
            .translate(-half, -half)
            .rotate(angle)
            .translate(half, half)
            .translate(self.position.x, self.position.y);
        self.sprite
            .draw(target, &DrawParams::with_transform(transform));
    }
}
