//! Sprite-sheet walk animation with one fixed frame list per facing direction.
//!
//! Timing uses integer microseconds (`u64`) so that advancing by the fixed step
//! is exact and deterministic, with no floating-point drift across platforms.
//! The frame lists live in a fixed-size table indexed by `Direction`.

use glam::Vec2;
use serde::Deserialize;

pub const FRAMES_PER_DIRECTION: usize = 4;
pub const DIRECTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    #[default]
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; DIRECTION_COUNT] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Up => 2,
            Self::Down => 3,
        }
    }
}

/// Sprite-sheet cell indices for each direction, `FRAMES_PER_DIRECTION` each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "FrameTableJson")]
pub struct FrameTable {
    frames: [[usize; FRAMES_PER_DIRECTION]; DIRECTION_COUNT],
}

impl FrameTable {
    pub fn new(
        left: [usize; FRAMES_PER_DIRECTION],
        right: [usize; FRAMES_PER_DIRECTION],
        up: [usize; FRAMES_PER_DIRECTION],
        down: [usize; FRAMES_PER_DIRECTION],
    ) -> Self {
        Self {
            frames: [left, right, up, down],
        }
    }

    pub fn frames(&self, direction: Direction) -> &[usize; FRAMES_PER_DIRECTION] {
        &self.frames[direction.index()]
    }

    pub fn max_cell(&self) -> usize {
        self.frames.iter().flatten().copied().max().unwrap_or(0)
    }
}

impl Default for FrameTable {
    /// Layout of a 4x4 RPG-maker style walk sheet: one column per direction.
    fn default() -> Self {
        Self::new([1, 5, 9, 13], [3, 7, 11, 15], [2, 6, 10, 14], [0, 4, 8, 12])
    }
}

#[derive(Debug, Deserialize)]
struct FrameTableJson {
    left: [usize; FRAMES_PER_DIRECTION],
    right: [usize; FRAMES_PER_DIRECTION],
    up: [usize; FRAMES_PER_DIRECTION],
    down: [usize; FRAMES_PER_DIRECTION],
}

impl From<FrameTableJson> for FrameTable {
    fn from(json: FrameTableJson) -> Self {
        Self::new(json.left, json.right, json.up, json.down)
    }
}

/// A uniform grid of cells on one texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SpriteSheet {
    pub cols: u32,
    pub rows: u32,
}

impl SpriteSheet {
    pub fn cell_count(&self) -> usize {
        (self.cols * self.rows) as usize
    }

    /// Top-left UV corner and UV size of `cell`.
    pub fn uv_rect(&self, cell: usize) -> (Vec2, Vec2) {
        let cols = self.cols as usize;
        let column = cell % cols;
        let row = cell / cols;
        let size = Vec2::new(1.0 / self.cols as f32, 1.0 / self.rows as f32);
        let min = Vec2::new(column as f32 * size.x, row as f32 * size.y);
        (min, size)
    }
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self { cols: 4, rows: 4 }
    }
}

/// Runtime walk-cycle state for one entity.
#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    table: FrameTable,
    sheet: SpriteSheet,
    direction: Direction,
    frame_index: usize,
    elapsed_us: u64,
    frame_duration_us: u64,
}

impl SpriteAnimation {
    pub fn new(
        table: FrameTable,
        sheet: SpriteSheet,
        frame_duration_us: u64,
    ) -> Result<Self, String> {
        if sheet.cols == 0 || sheet.rows == 0 {
            return Err(format!(
                "Animation validation failed: sprite sheet grid {}x{} must be non-empty",
                sheet.cols, sheet.rows
            ));
        }
        if frame_duration_us == 0 {
            return Err("Animation validation failed: frame duration is zero".to_string());
        }
        if table.max_cell() >= sheet.cell_count() {
            return Err(format!(
                "Animation validation failed: frame {} outside {}x{} sprite sheet",
                table.max_cell(),
                sheet.cols,
                sheet.rows
            ));
        }
        Ok(Self {
            table,
            sheet,
            direction: Direction::default(),
            frame_index: 0,
            elapsed_us: 0,
            frame_duration_us,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Position within the current direction's frame list.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }

    /// Switch to another direction's frame list. The position within the list
    /// carries over so a turn does not restart the walk cycle.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Advance by `dt_us`, wrapping through the direction's frame list.
    pub fn tick(&mut self, dt_us: u64) {
        self.elapsed_us += dt_us;
        while self.elapsed_us >= self.frame_duration_us {
            self.elapsed_us -= self.frame_duration_us;
            self.frame_index = (self.frame_index + 1) % FRAMES_PER_DIRECTION;
        }
    }

    /// Sprite-sheet cell currently shown.
    pub fn current_cell(&self) -> usize {
        self.table.frames(self.direction)[self.frame_index]
    }

    pub fn uv_rect(&self) -> (Vec2, Vec2) {
        self.sheet.uv_rect(self.current_cell())
    }
}
