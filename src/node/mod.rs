//! Power-cycle control sequence of the sensor node.
//!
//! One wake cycle runs [`sequencer::BootSequencer`] once: load configuration,
//! make sure the network is provisioned, measure, report, persist changed
//! configuration and suspend. Nothing but the persisted configuration
//! survives the suspend.

use thiserror::Error;

pub mod config_store;
pub mod models;
pub mod provisioning;
pub mod sampler;
pub mod scheduler;
pub mod sequencer;
pub mod telemetry;

pub use config_store::{ConfigSource, ConfigStore, ConfigStoreError, LoadedConfig};
pub use models::{DeviceConfig, FieldError, Measurement, SensorReading, WakeOutcome};
pub use provisioning::{ProvisionOutcome, ProvisioningGate};
pub use sampler::SensorSampler;
pub use scheduler::{next_sleep_secs, PowerScheduler};
pub use sequencer::{BootContext, BootSequencer, CycleReport, Stage};
pub use telemetry::{Endpoint, ReportError, TelemetryReporter, TelemetryRequest};

/// Every fault a wake cycle can meet. All are recovered locally; the cycle
/// always ends in a suspend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeFault {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("stored configuration corrupt: {0}")]
    StorageCorrupt(String),
    #[error("provisioning timed out")]
    ProvisioningTimedOut,
    #[error("sensor returned an invalid reading")]
    SensorInvalidReading,
    #[error("telemetry transport failure: {0}")]
    TransportFailure(String),
}

impl From<ConfigStoreError> for NodeFault {
    fn from(e: ConfigStoreError) -> Self {
        match e {
            ConfigStoreError::Unavailable(reason) => NodeFault::StorageUnavailable(reason),
            ConfigStoreError::Corrupt(reason) => NodeFault::StorageCorrupt(reason),
        }
    }
}
