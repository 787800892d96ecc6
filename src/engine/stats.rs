//! Frame rate tracking

/// Window of frame timestamps used for the FPS estimate
const FPS_WINDOW: usize = 60;

/// Rolling frame statistics
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
    /// Frames that ran the full clear/tick/render pass
    pub rendered: u64,
    /// Frames skipped because the surface was not ready
    pub skipped: u64,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
            rendered: 0,
            skipped: 0,
        }
    }
}

impl FrameStats {
    /// Record a frame timestamp (milliseconds)
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest slot is the next one to be overwritten
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn total(&self) -> u64 {
        self.rendered + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_at_steady_60hz() {
        let mut stats = FrameStats::default();
        let step = 1000.0 / 60.0;
        for i in 1..=120 {
            stats.record(i as f64 * step);
        }
        assert_eq!(stats.fps(), 60);
    }

    #[test]
    fn test_fps_zero_until_window_fills() {
        let mut stats = FrameStats::default();
        for i in 1..10 {
            stats.record(i as f64 * 16.0);
        }
        assert_eq!(stats.fps(), 0);
    }
}
