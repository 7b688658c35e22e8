//! Scripted input runs against a headless `World`.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::collision::{GamePhase, Landing};
use crate::world::World;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub move_x: f32,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// Where a replay ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayResult {
    pub steps: usize,
    pub phase: GamePhase,
    pub landing: Option<Landing>,
    pub position: [f32; 3],
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<f32> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame.move_x.clamp(-1.0, 1.0));
            }
        }
        out
    }

    /// Feed the inputs one per fixed step, stopping at the first contact.
    pub fn run(&self, world: &mut World) -> ReplayResult {
        let mut steps = 0;
        for move_x in self.expanded_inputs() {
            world.apply_input(move_x);
            steps += 1;
            if world.step(self.fixed_dt) {
                break;
            }
        }
        world.resolve();
        ReplayResult {
            steps,
            phase: world.phase(),
            landing: world.landing(),
            position: world.player.position.to_array(),
        }
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entity::PlatformKind;
    use crate::world::tests::stock_textures;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "lander_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn stock_world() -> World {
        let config = GameConfig::stock();
        World::new(&config, &stock_textures(&config)).expect("stock world")
    }

    fn replay(frames: &[(f32, u32)]) -> ReplaySequence {
        ReplaySequence {
            fixed_dt: default_dt(),
            frames: frames
                .iter()
                .map(|&(move_x, repeat)| ReplayFrame { move_x, repeat })
                .collect(),
        }
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "move_x": 1.0, "repeat": 3 },
                { "move_x": -4.0 },
                { "repeat": 2 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        assert_eq!(replay.expanded_inputs(), vec![1.0, 1.0, 1.0, -1.0, 0.0, 0.0]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn idle_descent_loses_on_first_platform() {
        let result = replay(&[(0.0, 2000)]).run(&mut stock_world());
        assert_eq!(result.phase, GamePhase::Lost);
        let landing = result.landing.expect("landed");
        assert_eq!(landing.platform, 0);
        assert_eq!(landing.kind, PlatformKind::Bad);
        // About seven seconds of falling at 1/60 s per step.
        assert!((380..450).contains(&result.steps), "steps {}", result.steps);
    }

    #[test]
    fn steering_right_then_dropping_wins() {
        let result = replay(&[(1.0, 90), (0.0, 2000)]).run(&mut stock_world());
        assert_eq!(result.phase, GamePhase::Won);
        let landing = result.landing.expect("landed");
        assert_eq!(landing.kind, PlatformKind::Good);
        // Straddles platforms 1 and 2; the lower index decides.
        assert_eq!(landing.platform, 1);
    }

    #[test]
    fn replays_are_deterministic() {
        let script = replay(&[(1.0, 40), (-1.0, 25), (0.0, 10), (1.0, 60), (0.0, 2000)]);
        let first = script.run(&mut stock_world());
        let second = script.run(&mut stock_world());
        assert_eq!(first, second);
        assert!(first.phase.is_terminal());
    }

    #[test]
    fn short_replay_leaves_world_running() {
        let result = replay(&[(1.0, 30)]).run(&mut stock_world());
        assert_eq!(result.phase, GamePhase::Running);
        assert!(result.landing.is_none());
        assert_eq!(result.steps, 30);
        assert!((result.position[0] - (-4.3 + 0.5)).abs() < 1e-3);
    }
}
