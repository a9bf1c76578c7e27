use crate::game::repository::{Repository, StorageKey};
use crate::game::storage::PersistenceError;
use crate::model::Difficulty;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const SETTINGS_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default)]
    pub muted: bool,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: SETTINGS_VERSION,
            difficulty: Difficulty::default(),
            muted: false,
        }
    }
}

impl Settings {
    pub fn load(repository: &Repository) -> Self {
        if let Some(mut settings) = repository.try_load::<Settings>(StorageKey::Settings) {
            settings.migrate();
            return settings;
        }
        Settings::default()
    }

    pub fn save(&self, repository: &Repository) -> Result<(), PersistenceError> {
        repository.save(StorageKey::Settings, self)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    fn migrate(&mut self) {
        if self.version < SETTINGS_VERSION {
            self.version = SETTINGS_VERSION;
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    /// Deck seed forced through `SEED`; unparsable values are ignored.
    pub fn seed_from_env() -> Option<u64> {
        let raw = std::env::var("SEED").ok()?;
        match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(err) => {
                warn!(target: "settings", "Ignoring SEED={:?}: {}", raw, err);
                None
            }
        }
    }

    pub fn data_dir_from_env() -> Option<PathBuf> {
        std::env::var_os("FLIPPY_DATA_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::storage::MemoryStore;
    use serial_test::serial;

    #[test]
    fn test_missing_fields_take_defaults() {
        let repository = Repository::new(MemoryStore::with_entries([(
            "flippy-settings",
            r#"{"version":0,"difficulty":"hard"}"#,
        )]));
        let settings = Settings::load(&repository);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert!(!settings.muted);
        assert_eq!(settings.version(), SETTINGS_VERSION);
    }

    #[test]
    fn test_save_and_reload() {
        let repository = Repository::new(MemoryStore::new());
        assert_eq!(Settings::load(&repository), Settings::default());

        let settings = Settings {
            difficulty: Difficulty::Medium,
            muted: true,
            ..Settings::default()
        };
        settings.save(&repository).unwrap();
        assert_eq!(Settings::load(&repository), settings);
    }

    #[test]
    #[serial]
    fn test_seed_from_env() {
        std::env::set_var("SEED", "1234");
        assert_eq!(Settings::seed_from_env(), Some(1234));
        std::env::set_var("SEED", "not-a-number");
        assert_eq!(Settings::seed_from_env(), None);
        std::env::remove_var("SEED");
        assert_eq!(Settings::seed_from_env(), None);
    }

    #[test]
    #[serial]
    fn test_data_dir_from_env() {
        std::env::set_var("FLIPPY_DATA_DIR", "/tmp/flippy-data");
        assert_eq!(
            Settings::data_dir_from_env(),
            Some(PathBuf::from("/tmp/flippy-data"))
        );
        std::env::set_var("FLIPPY_DATA_DIR", "");
        assert_eq!(Settings::data_dir_from_env(), None);
        std::env::remove_var("FLIPPY_DATA_DIR");
    }
}
