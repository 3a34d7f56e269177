use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::keys;
use crate::interfaces::{PersistentStore, StoreError};

use super::models::{parse_sleep_secs, DeviceConfig};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigStoreError {
    #[error("config storage unavailable: {0}")]
    Unavailable(String),
    #[error("config document corrupt: {0}")]
    Corrupt(String),
}

impl From<StoreError> for ConfigStoreError {
    fn from(e: StoreError) -> Self {
        ConfigStoreError::Unavailable(e.to_string())
    }
}

/// Where the configuration returned by [`ConfigStore::load`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Stored,
    /// Nothing stored yet; factory defaults
    Absent,
    /// Storage failed; factory defaults
    Degraded(ConfigStoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: DeviceConfig,
    pub source: ConfigSource,
}

/// On-storage document layout. All values are strings.
#[derive(Debug, Default, Deserialize, Serialize)]
struct StoredDocument {
    #[serde(rename = "deepSleepSecs", default, skip_serializing_if = "Option::is_none")]
    deep_sleep_secs: Option<String>,
    #[serde(rename = "sensorID", default, skip_serializing_if = "Option::is_none")]
    sensor_id: Option<String>,
    #[serde(rename = "GScriptID", default, skip_serializing_if = "Option::is_none")]
    gscript_id: Option<String>,
}

impl StoredDocument {
    fn from_config(config: &DeviceConfig) -> Self {
        StoredDocument {
            deep_sleep_secs: Some(config.sleep_interval_secs().to_string()),
            sensor_id: Some(config.sensor_label().to_string()),
            gscript_id: Some(config.endpoint_id().to_string()),
        }
    }

    /// Missing or invalid fields keep their factory default.
    fn into_config(self) -> DeviceConfig {
        let mut config = DeviceConfig::factory();

        if let Some(raw) = self.deep_sleep_secs {
            let applied = parse_sleep_secs(&raw).and_then(|secs| config.set_sleep_interval_secs(secs));
            if let Err(e) = applied {
                log::warn!("Stored {}; using default", e);
            }
        }
        if let Some(label) = self.sensor_id {
            if let Err(e) = config.set_sensor_label(label) {
                log::warn!("Stored {}; using default", e);
            }
        }
        if let Some(id) = self.gscript_id {
            if let Err(e) = config.set_endpoint_id(id) {
                log::warn!("Stored {}; using default", e);
            }
        }
        config
    }
}

/// Loads and saves [`DeviceConfig`] as a flat JSON document in the persistent store.
pub struct ConfigStore {
    store: Box<dyn PersistentStore>,
}

impl ConfigStore {
    pub fn new(store: Box<dyn PersistentStore>) -> Self {
        ConfigStore { store }
    }

    /// Never fails: any storage problem yields factory defaults with the
    /// problem reported in [`LoadedConfig::source`].
    pub fn load(&self) -> LoadedConfig {
        match self.read_document() {
            Ok(Some(doc)) => LoadedConfig {
                config: doc.into_config(),
                source: ConfigSource::Stored,
            },
            Ok(None) => LoadedConfig {
                config: DeviceConfig::factory(),
                source: ConfigSource::Absent,
            },
            Err(e) => LoadedConfig {
                config: DeviceConfig::factory(),
                source: ConfigSource::Degraded(e),
            },
        }
    }

    fn read_document(&self) -> Result<Option<StoredDocument>, ConfigStoreError> {
        if !self.store.exists(keys::CONFIG_DOCUMENT)? {
            return Ok(None);
        }
        let Some(raw) = self.store.read_all(keys::CONFIG_DOCUMENT)? else {
            return Ok(None);
        };
        log::debug!("Stored config: {}", String::from_utf8_lossy(&raw));
        serde_json::from_slice::<StoredDocument>(&raw)
            .map(Some)
            .map_err(|e| ConfigStoreError::Corrupt(e.to_string()))
    }

    pub fn save(&mut self, config: &DeviceConfig) -> Result<(), ConfigStoreError> {
        let doc = serde_json::to_vec(&StoredDocument::from_config(config))
            .map_err(|e| ConfigStoreError::Corrupt(e.to_string()))?;
        self.store.write_all(keys::CONFIG_DOCUMENT, &doc)?;
        log::info!("Saved config: {}", String::from_utf8_lossy(&doc));
        Ok(())
    }
}
