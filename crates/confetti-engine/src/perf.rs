//! Rolling performance metrics across all systems.

use std::collections::VecDeque;

/// Rolling averages of per-frame update and build cost.
#[derive(Debug)]
pub struct PerfMetrics {
    update_times: VecDeque<f32>,
    build_times: VecDeque<f32>,
    particle_counts: VecDeque<usize>,
    history_size: usize,
    system_count: usize,
}

impl Default for PerfMetrics {
    fn default() -> Self {
        Self::new(120)
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, value: T, limit: usize) {
    queue.push_back(value);
    if queue.len() > limit {
        queue.pop_front();
    }
}

fn mean(queue: &VecDeque<f32>) -> f32 {
    if queue.is_empty() {
        return 0.0;
    }
    queue.iter().sum::<f32>() / queue.len() as f32
}

impl PerfMetrics {
    /// Creates a collector keeping `history_size` samples.
    #[must_use]
    pub fn new(history_size: usize) -> Self {
        let history_size = history_size.max(1);
        Self {
            update_times: VecDeque::with_capacity(history_size),
            build_times: VecDeque::with_capacity(history_size),
            particle_counts: VecDeque::with_capacity(history_size),
            history_size,
            system_count: 0,
        }
    }

    /// Records one frame.
    ///
    /// # Arguments
    /// * `update_us` - Summed update time of all systems in microseconds
    /// * `build_us` - Summed batch build time in microseconds
    /// * `particles` - Active particles across all systems
    /// * `systems` - Live systems
    pub fn record_frame(&mut self, update_us: u64, build_us: u64, particles: usize, systems: usize) {
        let limit = self.history_size;
        push_bounded(&mut self.update_times, update_us as f32 / 1000.0, limit);
        push_bounded(&mut self.build_times, build_us as f32 / 1000.0, limit);
        push_bounded(&mut self.particle_counts, particles, limit);
        self.system_count = systems;
    }

    /// Average update time in milliseconds.
    #[must_use]
    pub fn avg_update_ms(&self) -> f32 {
        mean(&self.update_times)
    }

    /// Average build time in milliseconds.
    #[must_use]
    pub fn avg_build_ms(&self) -> f32 {
        mean(&self.build_times)
    }

    /// Peak active particle count in the window.
    #[must_use]
    pub fn peak_particles(&self) -> usize {
        self.particle_counts.iter().copied().max().unwrap_or(0)
    }

    /// Frames currently in the window.
    #[must_use]
    pub fn samples(&self) -> usize {
        self.update_times.len()
    }

    /// Snapshot for logging.
    #[must_use]
    pub fn summary(&self) -> PerfSummary {
        PerfSummary {
            update_ms: self.avg_update_ms(),
            build_ms: self.avg_build_ms(),
            particles: self.particle_counts.back().copied().unwrap_or(0),
            peak_particles: self.peak_particles(),
            systems: self.system_count,
        }
    }

    /// Drops all samples.
    pub fn clear(&mut self) {
        self.update_times.clear();
        self.build_times.clear();
        self.particle_counts.clear();
    }
}

/// Averaged metrics at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerfSummary {
    /// Average update time (ms)
    pub update_ms: f32,
    /// Average build time (ms)
    pub build_ms: f32,
    /// Active particles in the latest frame
    pub particles: usize,
    /// Peak active particles in the window
    pub peak_particles: usize,
    /// Live systems
    pub systems: usize,
}

impl std::fmt::Display for PerfSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} systems, {} particles (peak {}), update {:.3}ms, build {:.3}ms",
            self.systems, self.particles, self.peak_particles, self.update_ms, self.build_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metrics() {
        let perf = PerfMetrics::default();
        assert_eq!(perf.avg_update_ms(), 0.0);
        assert_eq!(perf.peak_particles(), 0);
        assert_eq!(perf.summary(), PerfSummary::default());
    }

    #[test]
    fn test_rolling_window() {
        let mut perf = PerfMetrics::new(2);
        perf.record_frame(1000, 500, 10, 1);
        perf.record_frame(3000, 500, 30, 2);
        perf.record_frame(5000, 1500, 20, 2);
        assert_eq!(perf.samples(), 2);
        assert!((perf.avg_update_ms() - 4.0).abs() < 1e-5);
        assert!((perf.avg_build_ms() - 1.0).abs() < 1e-5);
        assert_eq!(perf.peak_particles(), 30);

        let summary = perf.summary();
        assert_eq!(summary.particles, 20);
        assert_eq!(summary.systems, 2);
        assert!(summary.to_string().contains("20 particles"));
    }

    #[test]
    fn test_clear() {
        let mut perf = PerfMetrics::new(4);
        perf.record_frame(1000, 1000, 1, 1);
        perf.clear();
        assert_eq!(perf.samples(), 0);
    }
}
