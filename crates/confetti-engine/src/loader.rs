//! Effect config loading and caching.
//!
//! This module provides:
//! - Loading effect configs from files, strings or the assets directory
//! - Validation on load (a config that fails never enters the cache)
//! - A shared cache keyed by path or name, behind a readers-writer lock
//! - Saving and listing configs through a [`Storage`] backend

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use confetti_common::ConfigResult;
use confetti_kernel::ParticleSystemConfig;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::storage::{parse_config, FileStorage, Storage, CONFIG_EXTENSION};

/// Default asset path for effect configs.
pub const DEFAULT_EFFECTS_PATH: &str = "assets/particles/effects";

/// Appends `.toml` unless the path already has it.
#[must_use]
pub fn with_toml_extension(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == CONFIG_EXTENSION) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(CONFIG_EXTENSION);
        PathBuf::from(name)
    }
}

/// Loads, validates and caches effect configs.
pub struct ConfigLoader {
    cache: RwLock<AHashMap<String, Arc<ParticleSystemConfig>>>,
    storage: Box<dyn Storage>,
    assets_root: PathBuf,
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("cached", &self.cache.read().len())
            .field("assets_root", &self.assets_root)
            .finish_non_exhaustive()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader reading files from disk.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(Box::new(FileStorage))
    }

    /// Creates a loader over another storage backend.
    #[must_use]
    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        Self {
            cache: RwLock::new(AHashMap::new()),
            storage,
            assets_root: PathBuf::from(DEFAULT_EFFECTS_PATH),
        }
    }

    /// Changes the directory [`load_from_assets`](Self::load_from_assets) reads.
    #[must_use]
    pub fn with_assets_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets_root = root.into();
        self
    }

    /// Assets directory.
    #[must_use]
    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }

    /// Loads the config at `path`, or returns the cached copy.
    ///
    /// The cache key is the path as given.
    pub fn load_config(&self, path: impl AsRef<Path>) -> ConfigResult<Arc<ParticleSystemConfig>> {
        let path = path.as_ref();
        let key = path.display().to_string();
        if let Some(config) = self.get(&key) {
            return Ok(config);
        }

        let config = self.storage.load(path)?;
        config.validate()?;
        info!("Loaded effect '{}' from {}", config.name, path.display());
        Ok(self.insert(key, config))
    }

    /// Parses and caches a config from TOML text under `name`.
    pub fn load_from_str(&self, text: &str, name: &str) -> ConfigResult<Arc<ParticleSystemConfig>> {
        if let Some(config) = self.get(name) {
            return Ok(config);
        }

        let config = parse_config(text, name)?;
        config.validate()?;
        debug!("Loaded effect '{}' from memory as '{name}'", config.name);
        Ok(self.insert(name.to_string(), config))
    }

    /// Loads `name` from the assets directory, adding `.toml` if missing.
    pub fn load_from_assets(&self, name: &str) -> ConfigResult<Arc<ParticleSystemConfig>> {
        let path = with_toml_extension(&self.assets_root.join(name));
        self.load_config(path)
    }

    /// Cached config for a path or name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<ParticleSystemConfig>> {
        self.cache.read().get(key).cloned()
    }

    /// Validates `config`, saves it to `path` and replaces the cached copy.
    ///
    /// An invalid config is neither written nor cached.
    pub fn save_config(
        &self,
        path: impl AsRef<Path>,
        config: ParticleSystemConfig,
    ) -> ConfigResult<Arc<ParticleSystemConfig>> {
        let path = path.as_ref();
        config.validate()?;
        self.storage.save(path, &config)?;
        info!("Saved effect '{}' to {}", config.name, path.display());

        let config = Arc::new(config);
        self.cache
            .write()
            .insert(path.display().to_string(), Arc::clone(&config));
        Ok(config)
    }

    /// Config files directly inside `dir`.
    pub fn list_configs(&self, dir: impl AsRef<Path>) -> ConfigResult<Vec<PathBuf>> {
        self.storage.list(dir.as_ref())
    }

    /// Drops every cached config.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.write();
        debug!("Clearing {} cached effect configs", cache.len());
        cache.clear();
    }

    /// Number of cached configs.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.cache.read().len()
    }

    fn insert(&self, key: String, config: ParticleSystemConfig) -> Arc<ParticleSystemConfig> {
        // Another caller may have loaded the same key meanwhile; keep the first.
        Arc::clone(
            self.cache
                .write()
                .entry(key)
                .or_insert_with(|| Arc::new(config)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use confetti_common::ConfigError;
    use std::fs;
    use tempfile::TempDir;

    const SPARKLE: &str = r#"
        name = "sparkle"

        [animation.duration]
        value = 0.8

        [spawn]
        interval = 2
        particles_per_spawn = 3
        max_particles = 64
    "#;

    #[test]
    fn test_toml_extension() {
        assert_eq!(with_toml_extension(Path::new("a/b")), PathBuf::from("a/b.toml"));
        assert_eq!(with_toml_extension(Path::new("a/b.toml")), PathBuf::from("a/b.toml"));
    }

    #[test]
    fn test_load_from_str_caches() {
        let loader = ConfigLoader::new();
        let a = loader.load_from_str(SPARKLE, "sparkle").expect("load");
        assert_eq!(a.spawn.max_particles, 64);
        // Second call hits the cache, even with different text.
        let b = loader.load_from_str("garbage", "sparkle").expect("cached");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(loader.cached_count(), 1);

        loader.clear_cache();
        assert!(loader.get("sparkle").is_none());
    }

    #[test]
    fn test_invalid_config_not_cached() {
        let loader = ConfigLoader::new();
        let err = loader
            .load_from_str("name = \"x\"\n[spawn]\nmax_particles = 0\n", "x")
            .expect_err("should fail");
        assert!(matches!(err, ConfigError::Validation { .. }));
        assert!(loader.get("x").is_none());

        let err = loader.load_from_str("name = ", "y").expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_config_from_disk() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("sparkle.toml");
        fs::write(&path, SPARKLE).expect("write");

        let loader = ConfigLoader::new();
        let config = loader.load_config(&path).expect("load");
        assert_eq!(config.name, "sparkle");
        assert!(loader.get(&path.display().to_string()).is_some());
    }

    #[test]
    fn test_load_from_assets() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("sparkle.toml"), SPARKLE).expect("write");

        let loader = ConfigLoader::new().with_assets_root(dir.path());
        assert_eq!(loader.load_from_assets("sparkle").expect("load").name, "sparkle");
        assert_eq!(loader.load_from_assets("sparkle.toml").expect("load").name, "sparkle");
        assert!(matches!(
            loader.load_from_assets("missing"),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_save_and_list() {
        let loader = ConfigLoader::with_storage(Box::new(MemoryStorage::new()));
        let config = ParticleSystemConfig {
            name: "smoke".into(),
            ..ParticleSystemConfig::default()
        };
        let saved = loader.save_config("fx/smoke.toml", config).expect("save");
        assert_eq!(saved.name, "smoke");
        assert!(loader.get("fx/smoke.toml").is_some());

        loader.clear_cache();
        let loaded = loader.load_config("fx/smoke.toml").expect("reload");
        assert_eq!(*loaded, *saved);
        assert_eq!(
            loader.list_configs("fx").expect("list"),
            vec![PathBuf::from("fx/smoke.toml")]
        );
    }

    #[test]
    fn test_save_rejects_invalid_config() {
        let loader = ConfigLoader::with_storage(Box::new(MemoryStorage::new()));
        let good = ParticleSystemConfig {
            name: "smoke".into(),
            ..ParticleSystemConfig::default()
        };
        let saved = loader.save_config("fx/smoke.toml", good.clone()).expect("save");

        let mut bad = good;
        bad.spawn.max_particles = 0;
        let err = loader
            .save_config("fx/smoke.toml", bad)
            .expect_err("should fail");
        assert!(matches!(err, ConfigError::Validation { .. }));

        let cached = loader.get("fx/smoke.toml").expect("still cached");
        assert!(Arc::ptr_eq(&cached, &saved));
        assert_eq!(cached.spawn.max_particles, 100);

        // The stored document is still the valid one.
        loader.clear_cache();
        let reloaded = loader.load_config("fx/smoke.toml").expect("reload");
        assert_eq!(reloaded.spawn.max_particles, 100);
    }

    #[test]
    fn test_shipped_effects_are_valid() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(DEFAULT_EFFECTS_PATH);
        let loader = ConfigLoader::new();
        let paths = loader.list_configs(&root).expect("list shipped effects");
        assert!(!paths.is_empty());
        for path in paths {
            loader.load_config(&path).expect("shipped effect loads");
        }
    }
}
