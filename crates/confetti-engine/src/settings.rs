//! Runner settings.
//!
//! Loaded from `confetti.toml` next to the binary. A missing or broken file
//! never stops the runner; it falls back to defaults and logs why.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings file name.
pub const SETTINGS_FILE: &str = "confetti.toml";

/// Settings for the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Simulation ticks per second
    pub tps: u32,
    /// Ticks to run before exiting
    pub ticks: u32,
    /// Directory holding effect configs
    pub effects_dir: PathBuf,
    /// Effect to preload and spawn (file stem inside `effects_dir`)
    pub effect: String,
    /// Spawn position X
    pub emitter_x: f32,
    /// Spawn position Y
    pub emitter_y: f32,
    /// Spawn as one-shot with this lifetime in ticks (None = loop)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_shot_ticks: Option<i32>,
    /// PNG used for the particle quad size (None = 16x16 placeholder)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
    /// Fixed RNG seed for reproducible runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Simulated seconds between metric log lines
    pub log_interval_secs: f32,
    /// Pace ticks against the wall clock instead of running flat out
    pub realtime: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tps: 60,
            ticks: 600,
            effects_dir: PathBuf::from(crate::loader::DEFAULT_EFFECTS_PATH),
            effect: "sparkle".to_string(),
            emitter_x: 320.0,
            emitter_y: 240.0,
            one_shot_ticks: None,
            image: None,
            seed: None,
            log_interval_secs: 1.0,
            realtime: false,
        }
    }
}

impl RunnerConfig {
    /// Loads `confetti.toml` from the working directory.
    pub fn load() -> Self {
        Self::load_from(SETTINGS_FILE)
    }

    /// Loads settings from `path`, falling back to defaults if the file is
    /// missing or invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Settings file {} not found, using defaults", path.display());
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read settings file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded settings from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse settings file: {e}");
                Self::default()
            },
        }
    }

    /// Saves settings to `path`, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Clamps values to usable ranges.
    pub fn validate(&mut self) {
        self.tps = self.tps.clamp(1, 1000);
        self.log_interval_secs = self.log_interval_secs.max(0.1);
        if let Some(life) = self.one_shot_ticks.as_mut() {
            *life = (*life).max(1);
        }
    }

    /// Path of the configured effect file.
    #[must_use]
    pub fn effect_path(&self) -> PathBuf {
        crate::loader::with_toml_extension(&self.effects_dir.join(&self.effect))
    }
}
