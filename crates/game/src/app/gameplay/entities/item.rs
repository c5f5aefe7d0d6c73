use std::time::Duration;

use engine::{AnimatedSprite, DrawParams, ImageRegion, Rect, RenderTarget, Transform2D, Vec2};

pub(crate) const ITEM_SIZE: f32 = 64.0;
pub(crate) const ITEM_DRAW_SCALE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemKind {
    Beneficial,
    Harmful,
    Portal,
}

#[derive(Debug, Clone)]
enum ItemVisual {
    Static(ImageRegion),
    Animated(AnimatedSprite),
}

#[derive(Debug, Clone)]
pub(crate) struct Item {
    pub(crate) position: Vec2,
    kind: ItemKind,
    visual: ItemVisual,
    collected: bool,
}

impl Item {
    pub(crate) fn new(kind: ItemKind, position: Vec2, image: ImageRegion) -> Self {
        Self {
            position,
            kind,
            visual: ItemVisual::Static(image),
            collected: false,
        }
    }

    pub(crate) fn portal(position: Vec2, sprite: AnimatedSprite) -> Self {
        Self {
            position,
            kind: ItemKind::Portal,
            visual: ItemVisual::Animated(sprite),
            collected: false,
        }
    }

    pub(crate) fn kind(&self) -> ItemKind {
        self.kind
    }

    #[cfg(test)]
    pub(crate) fn is_collected(&self) -> bool {
        self.collected
    }

    /// Permanent for this item instance.
    pub(crate) fn collect(&mut self) {
        self.collected = true;
    }

    pub(crate) fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, ITEM_SIZE, ITEM_SIZE)
    }

    pub(crate) fn check_collision(&self, other: &Rect) -> bool {
        !self.collected && self.bounds().overlaps(other)
    }

    #[cfg(test)]
    pub(crate) fn current_frame(&self) -> Option<u32> {
        match &self.visual {
            ItemVisual::Static(_) => None,
            ItemVisual::Animated(sprite) => Some(sprite.current_frame()),
        }
    }

    pub(crate) fn update(&mut self, dt: Duration) {
        if let ItemVisual::Animated(sprite) = &mut self.visual {
            sprite.update(dt);
        }
    }

    pub(crate) fn draw(&self, target: &mut dyn RenderTarget) {
        self.draw_with_alpha(target, 1.0);
    }

    pub(crate) fn draw_with_alpha(&self, target: &mut dyn RenderTarget, alpha: f32) {
        if self.collected {
            return;
        }
        let transform = Transform2D::IDENTITY
            .scale(ITEM_DRAW_SCALE, ITEM_DRAW_SCALE)
            .translate(self.position.x, self.position.y);
        let params = DrawParams::with_transform(transform).scale_alpha(alpha);
        match &self.visual {
            ItemVisual::Static(image) => target.draw_image(image, &params),
            ItemVisual::Animated(sprite) => sprite.draw(target, &params),
        }
    }
}
