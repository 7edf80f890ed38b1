//! # Frame Timer
//!
//! Counts whole frames of a fixed duration.

/// Advances a frame counter every `speed` seconds.
///
/// # Examples
///
/// ```
/// use pixelfw::Timer;
///
/// let mut timer = Timer::new(0.1);
/// assert_eq!(timer.tick(0.06), 0);
/// assert_eq!(timer.tick(0.06), 0);
/// assert_eq!(timer.frame(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    /// Seconds per frame
    pub speed: f32,
    frame: u32,
    time: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl Timer {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            frame: 0,
            time: 0.0,
        }
    }

    /// Adds `dt` and returns the frame index from before the advance.
    ///
    /// Leftover time is discarded when a frame completes, so at most one frame advances
    /// per tick.
    pub fn tick(&mut self, dt: f32) -> u32 {
        let frame = self.frame;
        self.time += dt;
        if self.time >= self.speed {
            self.time = 0.0;
            self.frame += 1;
        }
        frame
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Progress through the current frame, 0.0 to 1.0.
    pub fn normalized(&self) -> f32 {
        if self.speed <= 0.0 {
            return 0.0;
        }
        self.time / self.speed
    }

    pub fn reset(&mut self) {
        self.frame = 0;
        self.time = 0.0;
    }
}
