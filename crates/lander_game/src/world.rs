//! The level: one player, a row of platforms and some scenery.

use glam::Vec3;
use lander_core::animation::SpriteAnimation;
use lander_render::{SpriteQuad, TextureId};

use crate::collision::{resolve_outcome, GamePhase, Landing};
use crate::config::GameConfig;
use crate::entity::{Entity, EntityKind, PlatformKind};
use crate::error::GameError;

/// Texture handles the level is built with. `decorations` lines up with
/// `GameConfig::decorations`.
#[derive(Debug, Clone)]
pub struct LevelTextures {
    pub sprite_sheet: TextureId,
    pub good_platform: TextureId,
    pub bad_platform: TextureId,
    pub decorations: Vec<TextureId>,
}

#[derive(Debug)]
pub struct World {
    pub player: Entity,
    pub platforms: Vec<Entity>,
    pub decorations: Vec<Entity>,
    phase: GamePhase,
    landing: Option<Landing>,
}

impl World {
    pub fn new(config: &GameConfig, textures: &LevelTextures) -> Result<Self, GameError> {
        if textures.decorations.len() != config.decorations.len() {
            return Err(GameError::InvalidConfig(format!(
                "{} decorations configured but {} textures supplied",
                config.decorations.len(),
                textures.decorations.len()
            )));
        }

        let player_cfg = &config.player;
        let frame_duration_us = player_cfg.frame_duration_ms.checked_mul(1000).ok_or_else(|| {
            GameError::InvalidConfig(format!(
                "player.frame_duration_ms {} is too large",
                player_cfg.frame_duration_ms
            ))
        })?;
        let animation =
            SpriteAnimation::new(player_cfg.frames, player_cfg.sheet, frame_duration_us)
                .map_err(GameError::InvalidConfig)?;
        let mut player = Entity::new(
            EntityKind::Player,
            Vec3::from_array(player_cfg.spawn),
            player_cfg.width,
            player_cfg.height,
            textures.sprite_sheet,
        )?
        .with_animation(animation);
        player.speed = player_cfg.speed;
        player.acceleration = config.physics.acceleration();
        player.face(player_cfg.facing);

        let layout = &config.platforms;
        let mut platforms = Vec::with_capacity(layout.count);
        for i in 0..layout.count {
            let (kind, y, texture) = if i % layout.bad_every == 0 {
                (PlatformKind::Bad, layout.bad_y, textures.bad_platform)
            } else {
                (PlatformKind::Good, layout.good_y, textures.good_platform)
            };
            let x = layout.x_start + i as f32 * layout.spacing;
            platforms.push(Entity::new(
                EntityKind::Platform(kind),
                Vec3::new(x, y, layout.z),
                layout.width,
                layout.height,
                texture,
            )?);
        }

        let decorations = config
            .decorations
            .iter()
            .zip(&textures.decorations)
            .map(|(decoration, &texture)| {
                Entity::new(
                    EntityKind::Decorative,
                    Vec3::from_array(decoration.position),
                    decoration.width,
                    decoration.height,
                    texture,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "World built: {} platforms, {} decorations",
            platforms.len(),
            decorations.len()
        );

        Ok(Self {
            player,
            platforms,
            decorations,
            phase: GamePhase::Running,
            landing: None,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn landing(&self) -> Option<Landing> {
        self.landing
    }

    /// Turn a horizontal axis value (-1, 0 or 1) into steering.
    pub fn apply_input(&mut self, move_x: f32) {
        if move_x < 0.0 {
            self.player.move_left();
        } else if move_x > 0.0 {
            self.player.move_right();
        } else {
            self.player.stop();
        }
    }

    /// Advance the player one fixed step. Returns true once the player is
    /// touching a platform, at which point no further steps should run.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.phase.is_terminal() {
            return true;
        }
        self.player.update(dt, &self.platforms);
        self.player.collided_with().is_some()
    }

    /// Settle the round if the player is on a platform. Returns the landing
    /// only on the transition out of `Running`.
    pub fn resolve(&mut self) -> Option<Landing> {
        if self.phase.is_terminal() {
            return None;
        }
        let landing = resolve_outcome(&mut self.player, &self.platforms)?;
        self.phase = landing.phase;
        self.landing = Some(landing);
        Some(landing)
    }

    pub fn set_platform_texture(&mut self, index: usize, texture: TextureId) {
        if let Some(platform) = self.platforms.get_mut(index) {
            platform.texture = texture;
        }
    }

    /// Draw order: player, platforms, decorations.
    pub fn quads(&self) -> Vec<SpriteQuad> {
        std::iter::once(&self.player)
            .chain(&self.platforms)
            .chain(&self.decorations)
            .map(Entity::quad)
            .collect()
    }
}
