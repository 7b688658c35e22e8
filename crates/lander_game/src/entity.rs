//! Entities: the lander, the platforms and the scenery.
//!
//! Every entity carries an explicit `EntityKind`; platform behaviour is read
//! from that tag, never inferred from the texture it happens to use.

use glam::{Vec2, Vec3};
use lander_core::animation::{Direction, SpriteAnimation};
use lander_render::{SpriteQuad, TextureId};

use crate::collision::Aabb;
use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    Good,
    Bad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Platform(PlatformKind),
    Decorative,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: EntityKind,
    pub position: Vec3,
    /// Horizontal steering intent, length at most 1.
    pub movement: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub speed: f32,
    pub texture: TextureId,
    pub animation: Option<SpriteAnimation>,
    pub active: bool,
    width: f32,
    height: f32,
    collided_with: Option<usize>,
}

impl Entity {
    pub fn new(
        kind: EntityKind,
        position: Vec3,
        width: f32,
        height: f32,
        texture: TextureId,
    ) -> Result<Self, GameError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(GameError::InvalidEntity(format!(
                "{:?} size must be positive, got {}x{}",
                kind, width, height
            )));
        }
        Ok(Self {
            kind,
            position,
            movement: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            speed: 1.0,
            texture,
            animation: None,
            active: true,
            width,
            height,
            collided_with: None,
        })
    }

    pub fn with_animation(mut self, animation: SpriteAnimation) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn platform_kind(&self) -> Option<PlatformKind> {
        match self.kind {
            EntityKind::Platform(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            center_x: self.position.x,
            center_y: self.position.y,
            half_w: self.width * 0.5,
            half_h: self.height * 0.5,
        }
    }

    /// Index of the platform the last `update` ended up overlapping.
    pub fn collided_with(&self) -> Option<usize> {
        self.collided_with
    }

    /// Set the steering intent, scaled back to unit length if it is longer.
    pub fn set_movement(&mut self, movement: Vec3) {
        self.movement = if movement.length() > 1.0 {
            movement.normalize()
        } else {
            movement
        };
    }

    pub fn move_left(&mut self) {
        self.set_movement(Vec3::NEG_X);
        self.face(Direction::Left);
    }

    pub fn move_right(&mut self) {
        self.set_movement(Vec3::X);
        self.face(Direction::Right);
    }

    pub fn stop(&mut self) {
        self.movement = Vec3::ZERO;
    }

    pub fn face(&mut self, direction: Direction) {
        if let Some(animation) = self.animation.as_mut() {
            animation.set_direction(direction);
        }
    }

    /// Advance one fixed step: steer, integrate (semi-implicit Euler), animate,
    /// then record the first overlapping platform.
    pub fn update(&mut self, dt: f32, platforms: &[Entity]) {
        if !self.active {
            return;
        }

        self.velocity.x = self.movement.x;
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * self.speed * dt;

        if let Some(animation) = self.animation.as_mut() {
            animation.tick(seconds_to_us(dt));
        }

        self.collided_with = self.check_collision(platforms);
    }

    /// First platform (in array order) whose box overlaps this entity's box.
    /// Inactive entities and anything that is not a platform are skipped.
    pub fn check_collision(&self, platforms: &[Entity]) -> Option<usize> {
        let own = self.aabb();
        platforms.iter().position(|platform| {
            platform.active
                && platform.platform_kind().is_some()
                && own.overlaps(&platform.aabb())
        })
    }

    /// Stop all motion for good.
    pub fn freeze(&mut self) {
        self.acceleration = Vec3::ZERO;
        self.velocity = Vec3::ZERO;
        self.movement = Vec3::ZERO;
        self.active = false;
    }

    pub fn quad(&self) -> SpriteQuad {
        let mut quad = SpriteQuad::full(
            self.texture,
            self.position.truncate(),
            Vec2::new(self.width, self.height),
        );
        if let Some(animation) = &self.animation {
            let (uv_min, uv_size) = animation.uv_rect();
            quad.uv_min = uv_min;
            quad.uv_size = uv_size;
        }
        quad
    }
}

fn seconds_to_us(dt: f32) -> u64 {
    (f64::from(dt) * 1_000_000.0).round().max(0.0) as u64
}
