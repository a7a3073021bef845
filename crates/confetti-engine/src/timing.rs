//! Fixed-timestep tick driver.
//!
//! Particle systems advance in fixed steps of `1 / tps` seconds. The host
//! feeds real frame time into [`TickClock::accumulate`] and runs that many
//! updates.

use std::time::Instant;

/// Most ticks run for a single frame.
pub const MAX_TICKS_PER_FRAME: u32 = 10;

/// Largest frame delta accepted before clamping (seconds).
const MAX_FRAME_DT: f32 = 0.25;

/// Fixed-timestep accumulator.
#[derive(Debug)]
pub struct TickClock {
    tps: u32,
    fixed_dt: f32,
    accumulator: f32,
    last_frame: Instant,
    total_ticks: u64,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl TickClock {
    /// Creates a clock ticking `tps` times per second (at least once).
    #[must_use]
    pub fn new(tps: u32) -> Self {
        let tps = tps.max(1);
        Self {
            tps,
            fixed_dt: 1.0 / tps as f32,
            accumulator: 0.0,
            last_frame: Instant::now(),
            total_ticks: 0,
        }
    }

    /// Ticks per second.
    #[must_use]
    pub fn tps(&self) -> u32 {
        self.tps
    }

    /// Seconds per tick.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Ticks handed out so far.
    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Real time since the previous call, clamped to 250ms.
    pub fn frame_delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt.min(MAX_FRAME_DT)
    }

    /// Adds `dt` seconds and returns how many fixed ticks to run.
    ///
    /// At most [`MAX_TICKS_PER_FRAME`]; if the clock is still more than two
    /// ticks behind after that, the backlog is dropped.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut count = 0;
        while self.accumulator >= self.fixed_dt && count < MAX_TICKS_PER_FRAME {
            self.accumulator -= self.fixed_dt;
            count += 1;
        }

        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        self.total_ticks += u64::from(count);
        count
    }

    /// Fraction of a tick left in the accumulator (0.0-1.0).
    #[must_use]
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.fixed_dt).clamp(0.0, 1.0)
    }

    /// Drops any accumulated time (after a pause or a load).
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_frame = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_dt_from_tps() {
        let clock = TickClock::new(50);
        assert!((clock.fixed_dt() - 0.02).abs() < 1e-6);
        assert_eq!(TickClock::new(0).tps(), 1);
    }

    #[test]
    fn test_accumulate_counts_ticks() {
        let mut clock = TickClock::new(10);
        assert_eq!(clock.accumulate(0.05), 0);
        assert_eq!(clock.accumulate(0.06), 1);
        assert_eq!(clock.accumulate(0.2), 2);
        assert_eq!(clock.total_ticks(), 3);
    }

    #[test]
    fn test_accumulate_caps_and_drops_backlog() {
        let mut clock = TickClock::new(100);
        assert_eq!(clock.accumulate(1.0), MAX_TICKS_PER_FRAME);
        assert_eq!(clock.alpha(), 0.0);
        assert_eq!(clock.accumulate(0.0), 0);
    }

    #[test]
    fn test_reset() {
        let mut clock = TickClock::new(10);
        clock.accumulate(0.05);
        assert!(clock.alpha() > 0.0);
        clock.reset();
        assert_eq!(clock.alpha(), 0.0);
    }
}
