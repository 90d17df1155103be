use crate::time::{pacing_wait, FrameBudget, Ticks};

pub struct Telemetry {
    /// Estimated rate of the frame being rendered, including its pending delay.
    pub fps: u32,
    pub frame_ms: u64,
    pub logic_steps: u32,
    pub frames: u64,

    fps_last: Option<Ticks>,
    fps_frames: u32,
    fps_period_ms: u64,
    fps_enabled: bool,
}

impl Telemetry {
    pub fn new() -> Self {
        Self {
            fps: 0,
            frame_ms: 0,
            logic_steps: 0,
            frames: 0,
            fps_last: None,
            fps_frames: 0,
            fps_period_ms: 1000,
            fps_enabled: true,
        }
    }

    pub fn configure_fps_logging(&mut self, enabled: bool, period_ms: u32) {
        self.fps_enabled = enabled;
        self.fps_period_ms = u64::from(period_ms).max(250);
    }

    #[inline]
    pub fn record_logic_steps(&mut self, steps: u32) {
        self.logic_steps = steps;
    }

    /// Records a rendered frame. Fast frames are estimated as if the pacing
    /// delay had already happened.
    pub fn frame_tick(&mut self, now: Ticks, sample: Ticks, budget: FrameBudget) {
        let pending = pacing_wait(sample, now, budget);
        self.frame_ms = now.saturating_sub(sample) + pending;
        if self.frame_ms != 0 {
            self.fps = (1000 / self.frame_ms) as u32;
        }
        self.frames += 1;

        if !self.fps_enabled {
            return;
        }

        let last = *self.fps_last.get_or_insert(now);
        self.fps_frames += 1;
        let elapsed = now.saturating_sub(last);

        if elapsed >= self.fps_period_ms {
            let measured = f64::from(self.fps_frames) * 1000.0 / elapsed as f64;
            log::info!(
                "fps={:.1} est_fps={} frame_ms={} logic_steps={} frames={}",
                measured,
                self.fps,
                self.frame_ms,
                self.logic_steps,
                self.frames
            );

            self.fps_frames = 0;
            self.fps_last = Some(now);
        }
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_frame_estimates_full_budget() {
        let mut t = Telemetry::new();
        t.frame_tick(105, 100, FrameBudget::from_millis(17));
        assert_eq!(t.frame_ms, 17);
        assert_eq!(t.fps, 58);
    }

    #[test]
    fn slow_frame_estimates_actual_duration() {
        let mut t = Telemetry::new();
        t.frame_tick(125, 100, FrameBudget::from_millis(17));
        assert_eq!(t.frame_ms, 25);
        assert_eq!(t.fps, 40);
        assert_eq!(t.frames, 1);
    }

    #[test]
    fn zero_budget_frame_keeps_previous_estimate() {
        let mut t = Telemetry::new();
        t.frame_tick(110, 100, FrameBudget::from_millis(10));
        t.frame_tick(200, 200, FrameBudget::from_millis(0));
        assert_eq!(t.frame_ms, 0);
        assert_eq!(t.fps, 100);
    }
}
