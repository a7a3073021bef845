//! Headless tick loop.
//!
//! Preloads one effect, spawns it and drives the manager for a fixed number
//! of ticks, building batches every tick as a renderer would.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use confetti_common::{ConfettiError, ConfettiResult, ImageId, ShaderId};
use confetti_kernel::ImageHandle;
use glam::Vec2;
use tracing::{info, warn};

use crate::loader::ConfigLoader;
use crate::manager::EffectManager;
use crate::perf::{PerfMetrics, PerfSummary};
use crate::settings::RunnerConfig;
use crate::timing::TickClock;

/// Size of the placeholder quad when no image is configured.
const PLACEHOLDER_SIZE: u32 = 16;

/// What a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    /// Ticks simulated
    pub ticks: u64,
    /// Simulated seconds
    pub sim_time: f32,
    /// Quads handed to the renderer over the whole run
    pub quads_drawn: u64,
    /// Metrics at the end of the run
    pub perf: PerfSummary,
}

/// Reads the pixel size of an image file.
pub fn image_handle(path: &Path) -> ConfettiResult<ImageHandle> {
    let (width, height) = image::image_dimensions(path).map_err(|e| match e {
        image::ImageError::IoError(e) => ConfettiError::Io(e),
        other => ConfettiError::Io(io::Error::new(io::ErrorKind::InvalidData, other)),
    })?;
    Ok(ImageHandle::new(ImageId::new(0), width, height))
}

/// Runs the configured effect.
pub fn run(settings: &RunnerConfig) -> ConfettiResult<RunSummary> {
    let image = match &settings.image {
        Some(path) => image_handle(path)?,
        None => ImageHandle::new(ImageId::new(0), PLACEHOLDER_SIZE, PLACEHOLDER_SIZE),
    };

    let loader = Arc::new(ConfigLoader::new().with_assets_root(&settings.effects_dir));
    let mut manager = EffectManager::new(loader, Some(image), Some(ShaderId::new(0)));
    if let Some(seed) = settings.seed {
        manager = manager.with_seed(seed);
    }

    manager.preload(&settings.effect, settings.effect_path())?;
    let position = Vec2::new(settings.emitter_x, settings.emitter_y);
    let id = match settings.one_shot_ticks {
        Some(life) => manager.spawn_one_shot(&settings.effect, position, life)?,
        None => manager.spawn_loop(&settings.effect, position)?,
    };
    info!(
        "Running '{}' as {id} for {} ticks at {} tps",
        settings.effect, settings.ticks, settings.tps
    );

    let mut clock = TickClock::new(settings.tps);
    let mut perf = PerfMetrics::default();
    let mut summary = RunSummary::default();
    let mut next_log = settings.log_interval_secs;
    let dt = clock.fixed_dt();

    while summary.ticks < u64::from(settings.ticks) {
        let due = if settings.realtime {
            let frame = clock.frame_delta();
            clock.accumulate(frame)
        } else {
            1
        };
        let due = u64::from(due).min(u64::from(settings.ticks) - summary.ticks);

        for _ in 0..due {
            manager.update(dt);
            let quads: usize = manager.build_batches().map(|(_, b)| b.quad_count()).sum();
            summary.quads_drawn += quads as u64;
            summary.ticks += 1;
            summary.sim_time += dt;

            let stats = manager.frame_stats();
            perf.record_frame(stats.update_us, stats.build_us, stats.particles, stats.systems);

            if summary.sim_time >= next_log {
                info!("t={:.1}s {}", summary.sim_time, perf.summary());
                next_log += settings.log_interval_secs;
            }
        }

        if manager.is_empty() {
            info!("All effects finished after {} ticks", summary.ticks);
            break;
        }
        if settings.realtime && due == 0 {
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    if summary.quads_drawn == 0 {
        warn!("Run drew nothing; check spawn.interval and the effect's duration");
    }
    summary.perf = perf.summary();
    Ok(summary)
}
