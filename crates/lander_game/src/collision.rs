//! Axis-aligned overlap tests and the landing outcome they produce.
//!
//! The lander never slides or bounces: the first platform it overlaps ends the
//! round. The resolver therefore only needs to know *which* platform was hit
//! (first in array order when several overlap in the same step) and what kind
//! it is.

use crate::entity::{Entity, PlatformKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center_x: f32,
    pub center_y: f32,
    pub half_w: f32,
    pub half_h: f32,
}

impl Aabb {
    /// Strict overlap on both axes. Touching edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let x_gap = (self.center_x - other.center_x).abs() - (self.half_w + other.half_w);
        let y_gap = (self.center_y - other.center_y).abs() - (self.half_h + other.half_h);
        x_gap < 0.0 && y_gap < 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GamePhase {
    #[default]
    Running,
    Won,
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

impl From<PlatformKind> for GamePhase {
    fn from(kind: PlatformKind) -> Self {
        match kind {
            PlatformKind::Good => Self::Won,
            PlatformKind::Bad => Self::Lost,
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which platform ended the round and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub platform: usize,
    pub kind: PlatformKind,
    pub phase: GamePhase,
}

/// Check the player against every platform. On contact the player is frozen
/// (no acceleration, velocity or movement, and inactive) and the landing is
/// returned; the caller owns the phase transition.
pub fn resolve_outcome(player: &mut Entity, platforms: &[Entity]) -> Option<Landing> {
    let index = player.check_collision(platforms)?;
    let kind = platforms[index].platform_kind()?;
    player.freeze();
    Some(Landing {
        platform: index,
        kind,
        phase: GamePhase::from(kind),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use glam::Vec3;
    use lander_render::TextureId;

    fn aabb(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb {
            center_x: x,
            center_y: y,
            half_w: w * 0.5,
            half_h: h * 0.5,
        }
    }

    fn platform(kind: PlatformKind, x: f32, y: f32) -> Entity {
        Entity::new(
            EntityKind::Platform(kind),
            Vec3::new(x, y, 1.0),
            1.0,
            1.0,
            TextureId::from_raw(1),
        )
        .expect("valid platform")
    }

    fn player_at(x: f32, y: f32) -> Entity {
        let mut player = Entity::new(
            EntityKind::Player,
            Vec3::new(x, y, 0.0),
            0.9,
            0.9,
            TextureId::from_raw(0),
        )
        .expect("valid player");
        player.acceleration = Vec3::new(0.0, -0.13, 0.0);
        player
    }

    #[test]
    fn overlap_requires_both_axes() {
        let a = aabb(0.0, 0.0, 1.0, 1.0);
        assert!(a.overlaps(&aabb(0.5, 0.5, 1.0, 1.0)));
        assert!(!a.overlaps(&aabb(0.5, 2.0, 1.0, 1.0)));
        assert!(!a.overlaps(&aabb(2.0, 0.5, 1.0, 1.0)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = aabb(0.0, 0.0, 1.0, 1.0);
        assert!(!a.overlaps(&aabb(1.0, 0.0, 1.0, 1.0)));
        assert!(!a.overlaps(&aabb(0.0, -1.0, 1.0, 1.0)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let boxes = [
            aabb(0.0, 0.0, 1.0, 1.0),
            aabb(0.9, 0.1, 0.9, 0.9),
            aabb(-4.3, -0.1, 0.9, 0.9),
            aabb(-4.5, -1.0, 1.0, 1.0),
            aabb(3.0, 3.0, 2.0, 0.5),
            aabb(2.0, 2.9, 0.1, 0.1),
            aabb(1.0, 0.0, 1.0, 1.0),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn bad_first_platform_loses_and_freezes_player() {
        let platforms = vec![
            platform(PlatformKind::Bad, -4.5, -1.0),
            platform(PlatformKind::Good, -3.5, -3.0),
        ];
        let mut player = player_at(-4.3, -0.2);
        player.move_right();

        let landing = resolve_outcome(&mut player, &platforms).expect("player overlaps");
        assert_eq!(landing.platform, 0);
        assert_eq!(landing.phase, GamePhase::Lost);
        assert_eq!(player.acceleration, Vec3::ZERO);
        assert_eq!(player.velocity, Vec3::ZERO);
        assert_eq!(player.movement, Vec3::ZERO);

        let frozen_at = player.position;
        for _ in 0..60 {
            player.update(1.0 / 60.0, &platforms);
        }
        assert_eq!(player.position, frozen_at);
    }

    #[test]
    fn good_first_platform_wins() {
        let platforms = vec![
            platform(PlatformKind::Good, -4.5, -1.0),
            platform(PlatformKind::Bad, 4.5, -1.0),
        ];
        let mut player = player_at(-4.3, -0.2);
        let landing = resolve_outcome(&mut player, &platforms).expect("player overlaps");
        assert_eq!(landing.platform, 0);
        assert_eq!(landing.kind, PlatformKind::Good);
        assert_eq!(landing.phase, GamePhase::Won);
    }

    #[test]
    fn colliding_platform_decides_not_first_platform() {
        let platforms = vec![
            platform(PlatformKind::Bad, -4.5, -1.0),
            platform(PlatformKind::Good, -2.5, -3.0),
        ];
        let mut player = player_at(-2.6, -2.2);
        let landing = resolve_outcome(&mut player, &platforms).expect("player overlaps");
        assert_eq!(landing.platform, 1);
        assert_eq!(landing.phase, GamePhase::Won);
    }

    #[test]
    fn first_in_array_wins_tie() {
        let platforms = vec![
            platform(PlatformKind::Good, -3.5, -3.0),
            platform(PlatformKind::Bad, -2.5, -3.0),
        ];
        // Straddles both platforms.
        let mut player = player_at(-3.0, -2.2);
        let landing = resolve_outcome(&mut player, &platforms).expect("player overlaps");
        assert_eq!(landing.platform, 0);
        assert_eq!(landing.phase, GamePhase::Won);
    }

    #[test]
    fn no_contact_leaves_player_untouched() {
        let platforms = vec![platform(PlatformKind::Bad, -4.5, -1.0)];
        let mut player = player_at(-4.3, 3.0);
        assert!(resolve_outcome(&mut player, &platforms).is_none());
        assert!(player.active);
        assert_eq!(player.acceleration, Vec3::new(0.0, -0.13, 0.0));
    }

    #[test]
    fn phase_from_kind_and_terminality() {
        assert_eq!(GamePhase::from(PlatformKind::Bad), GamePhase::Lost);
        assert_eq!(GamePhase::from(PlatformKind::Good), GamePhase::Won);
        assert!(!GamePhase::Running.is_terminal());
        assert!(GamePhase::Won.is_terminal());
        assert!(GamePhase::Lost.is_terminal());
        assert_eq!(GamePhase::Lost.to_string(), "lost");
    }
}
