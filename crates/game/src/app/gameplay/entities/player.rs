use std::f32::consts::FRAC_1_SQRT_2;
use std::time::Duration;

use engine::{
    AnimatedSprite, DrawParams, InputAction, InputSnapshot, Rect, RenderTarget, Transform2D, Vec2,
};

pub(crate) const PLAYER_SIZE: f32 = 64.0;
pub(crate) const PLAYER_SPEED: f32 = 3.0;
pub(crate) const PLAYER_HITBOX_INSET: f32 = 16.0;
pub(crate) const ATTACK_DURATION_TICKS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Facing {
    Down,
    DownLeft,
    Left,
    UpLeft,
    Up,
    UpRight,
    Right,
    DownRight,
}

impl Facing {
    /// Row on a four-row sheet: down, left, right, up. Diagonals never occur there.
    fn cardinal_row(self) -> u32 {
        match self {
            Facing::Down | Facing::DownLeft | Facing::DownRight => 0,
            Facing::Left | Facing::UpLeft => 1,
            Facing::Right | Facing::UpRight => 2,
            Facing::Up => 3,
        }
    }

    /// Row on an eight-row sheet, clockwise from down.
    fn eight_way_row(self) -> u32 {
        match self {
            Facing::Down => 0,
            Facing::DownLeft => 1,
            Facing::Left => 2,
            Facing::UpLeft => 3,
            Facing::Up => 4,
            Facing::UpRight => 5,
            Facing::Right => 6,
            Facing::DownRight => 7,
        }
    }

    fn from_signs(dx: i8, dy: i8) -> Option<Facing> {
        match (dx, dy) {
            (0, 1) => Some(Facing::Down),
            (-1, 1) => Some(Facing::DownLeft),
            (-1, 0) => Some(Facing::Left),
            (-1, -1) => Some(Facing::UpLeft),
            (0, -1) => Some(Facing::Up),
            (1, -1) => Some(Facing::UpRight),
            (1, 0) => Some(Facing::Right),
            (1, 1) => Some(Facing::DownRight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AttackAnimation {
    pub(crate) sprite: AnimatedSprite,
    pub(crate) duration_ticks: u32,
}

#[derive(Debug, Clone)]
pub(crate) enum MovementScheme {
    /// Four directions; left wins over right and up over down.
    Cardinal,
    /// Eight directions with normalized diagonals and an optional attack.
    EightWay { attack: Option<AttackAnimation> },
}

#[derive(Debug, Clone)]
pub(crate) struct Player {
    pub(crate) position: Vec2,
    pub(crate) size: f32,
    pub(crate) speed: f32,
    pub(crate) hitbox_inset: f32,
    sprite: AnimatedSprite,
    scheme: MovementScheme,
    facing: Facing,
    moving: bool,
    attack_ticks_remaining: u32,
}

impl Player {
    pub(crate) fn new(position: Vec2, sprite: AnimatedSprite, scheme: MovementScheme) -> Self {
        Self {
            position,
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            hitbox_inset: PLAYER_HITBOX_INSET,
            sprite,
            scheme,
            facing: Facing::Down,
            moving: false,
            attack_ticks_remaining: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn facing(&self) -> Facing {
        self.facing
    }

    #[cfg(test)]
    pub(crate) fn is_moving(&self) -> bool {
        self.moving
    }

    pub(crate) fn is_attacking(&self) -> bool {
        self.attack_ticks_remaining > 0
    }

    #[cfg(test)]
    pub(crate) fn current_frame(&self) -> u32 {
        self.sprite.current_frame()
    }

    pub(crate) fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size, self.size)
    }

    pub(crate) fn hitbox(&self) -> Rect {
        self.bounds().inset(self.hitbox_inset)
    }

    pub(crate) fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Puts the player back at a spawn point facing down, idle.
    pub(crate) fn respawn(&mut self, position: Vec2) {
        self.position = position;
        self.facing = Facing::Down;
        self.moving = false;
        self.attack_ticks_remaining = 0;
        self.sprite.set_row(self.row());
        self.sprite.reset();
    }

    pub(crate) fn update(
        &mut self,
        input: &InputSnapshot,
        world_width: f32,
        world_height: f32,
        dt: Duration,
    ) {
        match self.scheme {
            MovementScheme::Cardinal => self.update_cardinal(input),
            MovementScheme::EightWay { .. } => self.update_eight_way(input, dt),
        }
        self.clamp_to_world(world_width, world_height);

        if self.is_attacking() {
            return;
        }
        self.sprite.set_row(self.row());
        if self.moving {
            self.sprite.update(dt);
        } else {
            self.sprite.reset();
        }
    }

    fn update_cardinal(&mut self, input: &InputSnapshot) {
        self.moving = false;
        if input.is_down(InputAction::MoveLeft) {
            self.position.x -= self.speed;
            self.facing = Facing::Left;
            self.moving = true;
        } else if input.is_down(InputAction::MoveRight) {
            self.position.x += self.speed;
            self.facing = Facing::Right;
            self.moving = true;
        }
        if input.is_down(InputAction::MoveUp) {
            self.position.y -= self.speed;
            self.facing = Facing::Up;
            self.moving = true;
        } else if input.is_down(InputAction::MoveDown) {
            self.position.y += self.speed;
            self.facing = Facing::Down;
            self.moving = true;
        }
    }

    fn update_eight_way(&mut self, input: &InputSnapshot, dt: Duration) {
        if self.attack_ticks_remaining > 0 {
            self.attack_ticks_remaining -= 1;
            if self.attack_ticks_remaining > 0 {
                self.moving = false;
                let row = self.row();
                if let MovementScheme::EightWay {
                    attack: Some(attack),
                } = &mut self.scheme
                {
                    attack.sprite.set_row(row);
                    attack.sprite.update(dt);
                }
                return;
            }
        }

        if input.is_down(InputAction::Attack) {
            if let MovementScheme::EightWay {
                attack: Some(attack),
            } = &mut self.scheme
            {
                self.attack_ticks_remaining = attack.duration_ticks.max(1);
                attack.sprite.set_row(self.facing.eight_way_row());
                attack.sprite.reset();
                self.moving = false;
                return;
            }
        }

        let dx = axis(input, InputAction::MoveLeft, InputAction::MoveRight);
        let dy = axis(input, InputAction::MoveUp, InputAction::MoveDown);
        let Some(facing) = Facing::from_signs(dx, dy) else {
            self.moving = false;
            return;
        };

        let scale = if dx != 0 && dy != 0 { FRAC_1_SQRT_2 } else { 1.0 };
        self.position.x += dx as f32 * self.speed * scale;
        self.position.y += dy as f32 * self.speed * scale;
        self.facing = facing;
        self.moving = true;
    }

    fn clamp_to_world(&mut self, world_width: f32, world_height: f32) {
        self.position.x = self.position.x.min(world_width - self.size).max(0.0);
        self.position.y = self.position.y.min(world_height - self.size).max(0.0);
    }

    fn row(&self) -> u32 {
        match self.scheme {
            MovementScheme::Cardinal => self.facing.cardinal_row(),
            MovementScheme::EightWay { .. } => self.facing.eight_way_row(),
        }
    }

    pub(crate) fn draw(&self, target: &mut dyn RenderTarget) {
        let sprite = match &self.scheme {
            MovementScheme::EightWay {
                attack: Some(attack),
            } if self.is_attacking() => &attack.sprite,
            _ => &self.sprite,
        };
        let (frame_width, frame_height) = sprite.frame_size();
        let transform = Transform2D::IDENTITY
            .scale(
                self.size / frame_width as f32,
                self.size / frame_height as f32,
            )
            .translate(self.position.x, self.position.y);
        sprite.draw(target, &DrawParams::with_transform(transform));
    }
}

fn axis(input: &InputSnapshot, negative: InputAction, positive: InputAction) -> i8 {
    input.is_down(positive) as i8 - input.is_down(negative) as i8
}
