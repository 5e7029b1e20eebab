/// User profile store
///
/// Key/value settings grouped into named bundles. Services write their
/// settings into a bundle of their own and read it back on load. The whole
/// profile serializes to a JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProfileError;

/// Profile shared between the publisher of save/load events and handlers
pub type SharedProfile = Arc<RwLock<UserProfile>>;

/// Named group of settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle {
    #[serde(skip)]
    name: String,
    data: BTreeMap<String, Value>,
}

impl Bundle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store a value, replacing any previous value for the key
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Read a typed value; fails if absent or of another type
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, ProfileError> {
        let value = self.data.get(key).ok_or_else(|| ProfileError::MissingKey {
            bundle: self.name.clone(),
            key: key.to_string(),
        })?;

        T::deserialize(value).map_err(|source| ProfileError::TypeMismatch {
            bundle: self.name.clone(),
            key: key.to_string(),
            source,
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Dump the bundle contents at debug level
    pub fn log(&self) {
        tracing::debug!("Bundle '{}' ({} entries)", self.name, self.data.len());
        for (key, value) in &self.data {
            tracing::debug!("  {} = {}", key, value);
        }
    }
}

/// Settings of one user of one application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub app_title: String,
    pub app_version: String,
    #[serde(default)]
    bundles: BTreeMap<String, Bundle>,
}

impl UserProfile {
    pub fn new(app_title: impl Into<String>, app_version: impl Into<String>) -> Self {
        Self {
            app_title: app_title.into(),
            app_version: app_version.into(),
            bundles: BTreeMap::new(),
        }
    }

    /// Wrap the profile for use in save/load events
    pub fn into_shared(self) -> SharedProfile {
        Arc::new(RwLock::new(self))
    }

    /// Store a bundle under its name, replacing any previous one
    pub fn put_bundle(&mut self, bundle: Bundle) {
        self.bundles.insert(bundle.name.clone(), bundle);
    }

    pub fn get_bundle(&self, name: &str) -> Result<&Bundle, ProfileError> {
        self.bundles
            .get(name)
            .ok_or_else(|| ProfileError::MissingBundle(name.to_string()))
    }

    pub fn remove_bundle(&mut self, name: &str) -> Option<Bundle> {
        self.bundles.remove(name)
    }

    pub fn bundle_names(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }

    /// Whether this profile was written by the given application version
    pub fn is_compatible(&self, app_title: &str, app_version: &str) -> bool {
        self.app_title == app_title && self.app_version == app_version
    }

    /// Save the profile as pretty JSON, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<(), ProfileError> {
        let io_err = |source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| ProfileError::Format {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)?;

        tracing::debug!("Saved profile to: {}", path.display());
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ProfileError> {
        let json = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut profile: UserProfile =
            serde_json::from_str(&json).map_err(|source| ProfileError::Format {
                path: path.display().to_string(),
                source,
            })?;

        // bundle names are only stored as map keys
        for (name, bundle) in profile.bundles.iter_mut() {
            bundle.name = name.clone();
        }

        tracing::debug!("Loaded profile from: {}", path.display());
        Ok(profile)
    }
}
