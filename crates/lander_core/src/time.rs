//! Fixed-timestep scheduling.
//!
//! Wall-clock time is fed into an accumulator once per rendered frame; the
//! simulation then drains it in `fixed_dt` slices via `should_step()`. The
//! sub-step remainder stays in the accumulator for the next frame, so physics
//! advances identically regardless of the render rate. Every measured second
//! is eventually simulated: long frames are reported, never truncated.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

pub const DEFAULT_FIXED_DT: f64 = 1.0 / 60.0;
/// Frames longer than this are logged as hitches.
pub const DEFAULT_SLOW_FRAME_DT: f64 = 0.25;

pub struct TimeState {
    pub fixed_dt: f64,
    pub slow_frame_dt: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,
    pub interpolation_alpha: f64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_fixed_dt(DEFAULT_FIXED_DT)
    }

    pub fn with_fixed_dt(fixed_dt: f64) -> Self {
        Self {
            fixed_dt,
            slow_frame_dt: DEFAULT_SLOW_FRAME_DT,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            interpolation_alpha: 0.0,
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    /// Measure wall-clock time since the previous frame and accumulate it.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.accumulate(real_dt);
    }

    /// Feed an explicit frame delta into the accumulator.
    pub fn accumulate(&mut self, real_dt: f64) {
        self.real_dt = real_dt.max(0.0);

        if self.real_dt > self.slow_frame_dt {
            log::warn!(
                "Slow frame: {:.1}ms, catching up {} fixed steps",
                self.real_dt * 1000.0,
                ((self.accumulator + self.real_dt) / self.fixed_dt).floor()
            );
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn end_frame(&mut self) {
        self.interpolation_alpha = self.accumulator / self.fixed_dt;
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Forget any banked time, e.g. after a restart, and restart the wall clock.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.interpolation_alpha = 0.0;
        self.last_instant = Instant::now();
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
