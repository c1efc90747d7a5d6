/// Frame pacing for the demo
///
/// One physics step runs per frame, with the frame's delta time clamped to
/// a maximum so a long stall (tab switch, debugger) doesn't produce one huge
/// step that tunnels boxes through the floor.
use std::time::Duration;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// Game loop timing state
pub struct GameLoop {
    /// Largest delta handed to the simulation
    max_delta: Duration,

    /// Frame timing history for FPS calculation
    frame_times: Vec<Duration>,

    /// Current frame number
    frame_count: u64,

    /// Simulated time covered by those steps
    simulated: Duration,

    /// Current FPS (updated periodically)
    current_fps: f32,
}

impl GameLoop {
    /// Create a new game loop
    pub fn new(max_delta: Duration) -> Self {
        Self {
            max_delta,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            simulated: Duration::ZERO,
            current_fps: 0.0,
        }
    }

    /// Begin a frame that took `frame_time`, returns the step to simulate in seconds
    pub fn advance(&mut self, frame_time: Duration) -> f32 {
        self.frame_count += 1;

        // Store frame time for FPS calculation
        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }

        // Update FPS counter every 10 frames
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        let dt = frame_time.min(self.max_delta);
        self.simulated += dt;
        dt.as_secs_f32()
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Get total number of frames seen
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Simulated time in seconds
    pub fn simulated_secs(&self) -> f32 {
        self.simulated.as_secs_f32()
    }

    /// Update FPS calculation
    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        // Calculate average frame time
        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        // Convert to FPS
        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}
