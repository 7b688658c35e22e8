//! Keyboard state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every frame the key
//!   is physically down. Used for continuous actions like thrusting sideways.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only until
//!   `end_frame()` runs. The game loop calls it once per rendered frame after
//!   the simulation and the quit/restart handling have seen the transition.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Escape,
    Q,
    R,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// -1.0 while `negative` is held, otherwise 1.0 while `positive` is held,
    /// otherwise 0.0. With both held, `negative` takes priority.
    pub fn axis(&self, negative: Key, positive: Key) -> f32 {
        if self.is_held(negative) {
            -1.0
        } else if self.is_held(positive) {
            1.0
        } else {
            0.0
        }
    }

    /// Drop every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        for key in self.held.drain() {
            self.just_released.insert(key);
        }
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        assert!(input.is_held(Key::Left));
        assert!(input.is_just_pressed(Key::Left));
    }

    #[test]
    fn test_key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_up(Key::Left);
        assert!(!input.is_held(Key::Left));
        assert!(input.is_just_released(Key::Left));
    }

    #[test]
    fn test_key_down_repeat_does_not_double_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::R);
        input.end_frame();
        // OS key repeat: the key is still held, so no new edge.
        input.key_down(Key::R);
        assert!(input.is_held(Key::R));
        assert!(!input.is_just_pressed(Key::R));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::Q);
        assert!(!input.is_just_released(Key::Q));
        assert!(!input.is_held(Key::Q));
    }

    #[test]
    fn test_end_frame_clears_transient_state() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::Escape);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::Left));
        assert!(!input.is_just_pressed(Key::Escape));
        assert!(input.is_held(Key::Left));
        assert!(input.is_held(Key::Escape));
    }

    #[test]
    fn test_axis_covers_every_key_combination() {
        let mut input = InputState::new();
        assert_eq!(input.axis(Key::Left, Key::Right), 0.0);

        input.key_down(Key::Left);
        assert_eq!(input.axis(Key::Left, Key::Right), -1.0);

        input.key_down(Key::Right);
        assert_eq!(input.axis(Key::Left, Key::Right), -1.0);

        input.key_up(Key::Left);
        assert_eq!(input.axis(Key::Left, Key::Right), 1.0);

        input.key_up(Key::Right);
        assert_eq!(input.axis(Key::Left, Key::Right), 0.0);
    }

    #[test]
    fn test_axis_negative_key_wins_regardless_of_press_order() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        input.key_down(Key::Left);
        assert_eq!(input.axis(Key::Left, Key::Right), -1.0);
        assert_eq!(input.axis(Key::Right, Key::Left), -1.0);
    }

    #[test]
    fn test_release_all_reports_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::Right);
        input.release_all();
        assert!(!input.is_held(Key::Left));
        assert!(!input.is_held(Key::Right));
        assert!(input.is_just_released(Key::Left));
        assert!(input.is_just_released(Key::Right));
    }

    #[test]
    fn test_default_state_is_empty() {
        let input = InputState::new();
        assert!(!input.is_held(Key::Left));
        assert!(!input.is_just_pressed(Key::Left));
        assert!(!input.is_just_released(Key::Left));
    }
}
