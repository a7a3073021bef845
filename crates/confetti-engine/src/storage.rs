//! Persistence backends for effect configs.

use std::fs;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use confetti_common::{ConfigError, ConfigResult};
use confetti_kernel::ParticleSystemConfig;
use parking_lot::RwLock;
use tracing::{debug, warn};

/// Extension used for effect files.
pub const CONFIG_EXTENSION: &str = "toml";

/// Where effect configs are read from and written to.
pub trait Storage: Send + Sync {
    /// Writes `config` to `path`.
    fn save(&self, path: &Path, config: &ParticleSystemConfig) -> ConfigResult<()>;

    /// Reads and parses the config at `path`. Does not validate.
    fn load(&self, path: &Path) -> ConfigResult<ParticleSystemConfig>;

    /// Lists config files directly inside `dir`, sorted.
    fn list(&self, dir: &Path) -> ConfigResult<Vec<PathBuf>>;
}

/// Parses a TOML effect document; `name` labels errors.
pub fn parse_config(text: &str, name: &str) -> ConfigResult<ParticleSystemConfig> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        name: name.to_string(),
        source,
    })
}

fn is_config_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == CONFIG_EXTENSION)
}

/// Plain files on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileStorage;

impl Storage for FileStorage {
    fn save(&self, path: &Path, config: &ParticleSystemConfig) -> ConfigResult<()> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(config)?;
        fs::write(path, text).map_err(io_err)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn load(&self, path: &Path) -> ConfigResult<ParticleSystemConfig> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_config(&text, &path.display().to_string())
    }

    fn list(&self, dir: &Path) -> ConfigResult<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && is_config_file(&path) {
                        paths.push(path);
                    }
                },
                Err(e) => warn!("Skipping unreadable entry in {}: {e}", dir.display()),
            }
        }
        paths.sort();
        Ok(paths)
    }
}

/// In-memory documents keyed by path. Used where there is no writable disk,
/// and in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RwLock<AHashMap<PathBuf, String>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw document, replacing any previous one.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.write().insert(path.into(), text.into());
    }

    /// Raw document at `path`.
    #[must_use]
    pub fn raw(&self, path: &Path) -> Option<String> {
        self.files.read().get(path).cloned()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, path: &Path, config: &ParticleSystemConfig) -> ConfigResult<()> {
        let text = toml::to_string_pretty(config)?;
        self.insert(path, text);
        Ok(())
    }

    fn load(&self, path: &Path) -> ConfigResult<ParticleSystemConfig> {
        let files = self.files.read();
        let text = files
            .get(path)
            .ok_or_else(|| ConfigError::NotFound(path.to_path_buf()))?;
        parse_config(text, &path.display().to_string())
    }

    fn list(&self, dir: &Path) -> ConfigResult<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = self
            .files
            .read()
            .keys()
            .filter(|p| p.parent() == Some(dir) && is_config_file(p))
            .cloned()
            .collect();
        paths.sort();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ParticleSystemConfig {
        ParticleSystemConfig {
            name: "sparkle".into(),
            description: "test effect".into(),
            ..ParticleSystemConfig::default()
        }
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("effects").join("sparkle.toml");
        let storage = FileStorage;

        storage.save(&path, &sample()).expect("save");
        let loaded = storage.load(&path).expect("load");
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_file_storage_missing() {
        let err = FileStorage.load(Path::new("/nonexistent/x.toml")).expect_err("should fail");
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_file_storage_parse_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("bad.toml");
        fs::write(&path, "name = [").expect("write");
        let err = FileStorage.load(&path).expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_file_storage_list_filters_and_sorts() {
        let dir = TempDir::new().expect("temp dir");
        for name in ["b.toml", "a.toml", "notes.txt"] {
            fs::write(dir.path().join(name), "name = \"x\"").expect("write");
        }
        fs::create_dir(dir.path().join("nested.toml")).expect("mkdir");

        let listed = FileStorage.list(dir.path()).expect("list");
        let names: Vec<_> = listed
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, ["a.toml", "b.toml"]);
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        let path = Path::new("fx/sparkle.toml");
        storage.save(path, &sample()).expect("save");
        storage.insert("fx/readme.md", "hi");
        storage.insert("other/x.toml", "name = \"x\"");

        assert_eq!(storage.load(path).expect("load"), sample());
        assert!(storage.raw(path).is_some_and(|t| t.contains("sparkle")));
        assert_eq!(storage.list(Path::new("fx")).expect("list"), vec![path.to_path_buf()]);
        assert!(matches!(
            storage.load(Path::new("fx/none.toml")),
            Err(ConfigError::NotFound(_))
        ));
    }
}
