use std::time::Duration;

use engine::{AnimatedSprite, DrawParams, ImageRegion, RenderTarget, Transform2D, Vec2};

pub(crate) const NPC_SIZE: f32 = 64.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PatrolAxis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone)]
pub(crate) enum NpcVisual {
    Static(ImageRegion),
    /// Frames cycled from one strip of a shared sheet on their own tick delay.
    Animated(AnimatedSprite),
}

/// Walks back and forth along one axis, one unit per tick, turning at `start ± range`.
#[derive(Debug, Clone)]
pub(crate) struct Npc {
    pub(crate) position: Vec2,
    start: Vec2,
    direction: f32,
    range: f32,
    axis: PatrolAxis,
    visual: NpcVisual,
}

impl Npc {
    pub(crate) fn new(position: Vec2, range: f32, axis: PatrolAxis, visual: NpcVisual) -> Self {
        Self {
            position,
            start: position,
            direction: 1.0,
            range: range.max(0.0),
            axis,
            visual,
        }
    }

    #[cfg(test)]
    pub(crate) fn direction(&self) -> f32 {
        self.direction
    }

    #[cfg(test)]
    pub(crate) fn bounds(&self) -> engine::Rect {
        engine::Rect::new(self.position.x, self.position.y, NPC_SIZE, NPC_SIZE)
    }

    pub(crate) fn update(&mut self, dt: Duration) {
        let displacement = match self.axis {
            PatrolAxis::Horizontal => {
                self.position.x += self.direction;
                self.position.x - self.start.x
            }
            PatrolAxis::Vertical => {
                self.position.y += self.direction;
                self.position.y - self.start.y
            }
        };
        if displacement >= self.range || displacement <= -self.range {
            self.direction = -self.direction;
        }

        if let NpcVisual::Animated(sprite) = &mut self.visual {
            sprite.update(dt);
        }
    }

    /// Scales the image or current frame into the NPC box.
    pub(crate) fn draw(&self, target: &mut dyn RenderTarget) {
        let (width, height) = match &self.visual {
            NpcVisual::Static(image) => (image.width(), image.height()),
            NpcVisual::Animated(sprite) => sprite.frame_size(),
        };
        if width == 0 || height == 0 {
            return;
        }
        let transform = Transform2D::IDENTITY
            .scale(NPC_SIZE / width as f32, NPC_SIZE / height as f32)
            .translate(self.position.x, self.position.y);
        let params = DrawParams::with_transform(transform);
        match &self.visual {
            NpcVisual::Static(image) => target.draw_image(image, &params),
            NpcVisual::Animated(sprite) => sprite.draw(target, &params),
        }
    }
}
