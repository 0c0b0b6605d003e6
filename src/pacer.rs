//! Busy-wait frame pacing and windowed rate estimation.
//!
//! The pacer spins on the clock; it never sleeps and never yields.

/// Default length of the rate-estimation window.
pub const DEFAULT_WINDOW_MS: u32 = 2000;

/// Monotonic millisecond clock measured from an arbitrary start point.
pub trait Clock {
    /// Milliseconds elapsed since the clock's reference instant.
    fn elapsed_ms(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn elapsed_ms(&self) -> f64 {
        (**self).elapsed_ms()
    }
}

/// Wall clock backed by [`std::time::Instant`], started on construction.
#[cfg(feature = "std")]
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock { start: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for MonotonicClock {
    fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Throttles a loop to a target iteration rate and reports the rate it
/// actually achieved.
#[derive(Debug)]
pub struct FramePacer<C: Clock> {
    clock: C,
    frame_count: u64,
    window_ms: u32,
    window_frames: u32,
    last_window_pos: u32,
    observed_rate: u32,
    late_frames: u64,
}

impl<C: Clock> FramePacer<C> {
    pub fn new(clock: C) -> Self {
        Self::with_window(clock, DEFAULT_WINDOW_MS)
    }

    /// `window_ms` is clamped to at least 1.
    pub fn with_window(clock: C, window_ms: u32) -> Self {
        FramePacer {
            clock,
            frame_count: 0,
            window_ms: window_ms.max(1),
            window_frames: 0,
            last_window_pos: 0,
            observed_rate: 0,
            late_frames: 0,
        }
    }

    /// Wait for the next frame boundary at `target_rate` Hz, then count the
    /// frame. A rate of zero disables waiting.
    ///
    /// Returns the observed rate of the last completed window (zero until
    /// the first window completes).
    pub fn advance(&mut self, target_rate: u32) -> u32 {
        if target_rate > 0 {
            let mut target_frame = self.target_frame(target_rate);
            if target_frame > self.frame_count {
                self.late_frames += 1;
                log::trace!(
                    "frame {} late: schedule already at {}",
                    self.frame_count,
                    target_frame
                );
            }
            while target_frame < self.frame_count {
                core::hint::spin_loop();
                target_frame = self.target_frame(target_rate);
            }
        }
        self.frame_count += 1;
        self.update_rate();
        self.observed_rate
    }

    fn target_frame(&self, target_rate: u32) -> u64 {
        // Float-to-int casts saturate, so a negative reading maps to frame 0.
        libm::floor(self.clock.elapsed_ms() * target_rate as f64 / 1000.0) as u64
    }

    fn update_rate(&mut self) {
        let elapsed = libm::floor(self.clock.elapsed_ms()) as u64;
        let window_pos = (elapsed % self.window_ms as u64) as u32;
        if window_pos < self.last_window_pos {
            self.observed_rate =
                (self.window_frames as u64 * 1000 / self.window_ms as u64) as u32;
            self.window_frames = 0;
        }
        self.last_window_pos = window_pos;
        self.window_frames = self.window_frames.saturating_add(1);
    }

    pub fn frame_count(&self) -> u64 { self.frame_count }
    pub fn observed_rate(&self) -> u32 { self.observed_rate }
    /// Frames that found the schedule already ahead of them.
    pub fn late_frames(&self) -> u64 { self.late_frames }
    pub fn window_ms(&self) -> u32 { self.window_ms }
}
