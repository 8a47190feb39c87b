//! Frames-per-second over one-second windows.

/// Minimum window length before a new FPS figure is published.
pub const FPS_WINDOW_SECONDS: f64 = 1.0;

/// Accumulates frame times and publishes an FPS average once per window.
#[derive(Clone, Debug, Default)]
pub struct FrameStats {
    window_time: f64,
    window_frames: u32,
    fps: f64,
    total_frames: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame that took `frame_seconds`.
    ///
    /// Returns the new FPS figure when the current window reaches
    /// [`FPS_WINDOW_SECONDS`], and starts the next window.
    pub fn record_frame(&mut self, frame_seconds: f64) -> Option<f64> {
        self.total_frames += 1;
        self.window_frames += 1;
        self.window_time += frame_seconds.max(0.0);

        if self.window_time < FPS_WINDOW_SECONDS {
            return None;
        }
        self.fps = self.window_frames as f64 / self.window_time;
        self.window_time = 0.0;
        self.window_frames = 0;
        Some(self.fps)
    }

    /// Most recently published FPS, zero before the first window closes.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_figure_before_first_window() {
        let mut stats = FrameStats::new();
        for _ in 0..59 {
            assert!(stats.record_frame(1.0 / 60.0).is_none());
        }
        assert_eq!(stats.fps(), 0.0);
        assert_eq!(stats.total_frames(), 59);
    }

    #[test]
    fn test_publishes_average_after_one_second() {
        let mut stats = FrameStats::new();
        let mut published = None;
        for _ in 0..8 {
            if let Some(fps) = stats.record_frame(0.125) {
                published = Some(fps);
            }
        }
        let fps = published.expect("window should have closed");
        assert!((fps - 8.0).abs() < 1e-9, "fps = {fps}");
        assert_eq!(stats.fps(), fps);
    }

    #[test]
    fn test_slow_frame_closes_window_alone() {
        let mut stats = FrameStats::new();
        let fps = stats.record_frame(2.0).unwrap();
        assert!((fps - 0.5).abs() < 1e-12);
        assert!(stats.record_frame(0.1).is_none());
    }

    #[test]
    fn test_negative_frame_time_ignored() {
        let mut stats = FrameStats::new();
        assert!(stats.record_frame(-5.0).is_none());
        assert!(stats.record_frame(1.0).is_some());
        assert!((stats.fps() - 2.0).abs() < 1e-12);
    }
}
