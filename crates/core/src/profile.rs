//! Connection profile management
//!
//! A profile names everything needed to talk to the service as one user:
//! the service-account key file, the subject to impersonate, and transfer
//! tuning. Profiles live in a TOML file under the user config directory;
//! `DC_CONFIG_DIR` overrides the location for tests and CI.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

const CONFIG_DIR_ENV: &str = "DC_CONFIG_DIR";
const PROFILES_FILE: &str = "profiles.toml";

fn default_chunk_size() -> u64 {
    // Resumable uploads require chunks in 256 KiB multiples.
    8 * 1024 * 1024
}

fn default_retry_base_ms() -> u64 {
    1000
}

/// One named connection profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Path to the service-account JSON key file
    pub key_file: PathBuf,

    /// Email address of the user to impersonate
    pub subject: String,

    /// Transfer chunk size in bytes; must be a multiple of 256 KiB
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    /// Base backoff delay in milliseconds for transient upload failures
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
}

impl Profile {
    pub fn new(key_file: impl Into<PathBuf>, subject: impl Into<String>) -> Self {
        Self {
            key_file: key_file.into(),
            subject: subject.into(),
            chunk_size: default_chunk_size(),
            retry_base_ms: default_retry_base_ms(),
        }
    }

    /// Retry policy derived from this profile's tuning
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(self.retry_base_ms), 5)
    }
}

/// On-disk shape of the profiles file
#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfilesFile {
    #[serde(default)]
    profiles: BTreeMap<String, Profile>,
}

/// Loads, stores, and persists named profiles
#[derive(Debug)]
pub struct ProfileManager {
    path: PathBuf,
    profiles: BTreeMap<String, Profile>,
}

impl ProfileManager {
    /// Open the default profile store, honoring `DC_CONFIG_DIR`
    pub fn new() -> Result<Self> {
        let dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::Config("no user config directory".into()))?
                .join("drivectl"),
        };
        Self::with_config_dir(&dir)
    }

    /// Open a profile store rooted at an explicit directory
    pub fn with_config_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(PROFILES_FILE);
        let profiles = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let file: ProfilesFile = toml::from_str(&raw)
                .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
            file.profiles
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, profiles })
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> Result<Profile> {
        self.profiles
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Add or replace a profile and persist the store
    pub fn set(&mut self, name: &str, profile: Profile) -> Result<()> {
        self.profiles.insert(name.to_string(), profile);
        self.save()
    }

    /// Remove a profile and persist the store
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if self.profiles.remove(name).is_none() {
            return Err(Error::ProfileNotFound(name.to_string()));
        }
        self.save()
    }

    /// All profiles, sorted by name
    pub fn list(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn save(&self) -> Result<()> {
        let file = ProfilesFile {
            profiles: self.profiles.clone(),
        };
        let raw = toml::to_string_pretty(&file)
            .map_err(|e| Error::Config(format!("serializing profiles: {e}")))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ProfileManager::with_config_dir(dir.path()).unwrap();

        let profile = Profile::new("/secrets/sa.json", "user@example.com");
        manager.set("work", profile.clone()).unwrap();
        assert_eq!(manager.get("work").unwrap(), profile);

        // A fresh manager sees the persisted profile.
        let reloaded = ProfileManager::with_config_dir(dir.path()).unwrap();
        assert_eq!(reloaded.get("work").unwrap(), profile);

        let mut manager = reloaded;
        manager.remove("work").unwrap();
        assert!(matches!(
            manager.get("work"),
            Err(Error::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_missing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ProfileManager::with_config_dir(dir.path()).unwrap();

        assert!(matches!(
            manager.get("absent"),
            Err(Error::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_defaults_applied_on_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROFILES_FILE),
            r#"
[profiles.minimal]
key_file = "/secrets/sa.json"
subject = "user@example.com"
"#,
        )
        .unwrap();

        let manager = ProfileManager::with_config_dir(dir.path()).unwrap();
        let profile = manager.get("minimal").unwrap();
        assert_eq!(profile.chunk_size, 8 * 1024 * 1024);
        assert_eq!(
            profile.retry_policy().base_delay,
            Duration::from_millis(1000)
        );
    }
}
