use thiserror::Error;

use crate::constants::{defaults, keys};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{field}: '{value}' is not a sleep interval in seconds")]
    NotAnInterval { field: &'static str, value: String },
    #[error("{field}: value must not be empty")]
    Empty { field: &'static str },
    #[error("{field}: value is {len} chars, limit is {max}")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Persisted node configuration.
///
/// Every constructed value satisfies the stored field bounds, so whatever is
/// written back to storage can be read again unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    sleep_interval_secs: u32,
    sensor_label: String,
    endpoint_id: String,
}

impl DeviceConfig {
    pub fn new(
        sleep_interval_secs: u32,
        sensor_label: impl Into<String>,
        endpoint_id: impl Into<String>,
    ) -> Result<Self, FieldError> {
        Ok(DeviceConfig {
            sleep_interval_secs: check_interval(sleep_interval_secs)?,
            sensor_label: check_sensor_label(sensor_label.into())?,
            endpoint_id: check_endpoint_id(endpoint_id.into())?,
        })
    }

    pub fn factory() -> Self {
        DeviceConfig {
            sleep_interval_secs: defaults::DEEP_SLEEP_SECS,
            sensor_label: defaults::SENSOR_ID.to_string(),
            endpoint_id: defaults::GSCRIPT_ID.to_string(),
        }
    }

    pub fn sleep_interval_secs(&self) -> u32 {
        self.sleep_interval_secs
    }

    pub fn sensor_label(&self) -> &str {
        &self.sensor_label
    }

    pub fn endpoint_id(&self) -> &str {
        &self.endpoint_id
    }

    pub fn set_sleep_interval_secs(&mut self, secs: u32) -> Result<(), FieldError> {
        self.sleep_interval_secs = check_interval(secs)?;
        Ok(())
    }

    pub fn set_sensor_label(&mut self, label: impl Into<String>) -> Result<(), FieldError> {
        self.sensor_label = check_sensor_label(label.into())?;
        Ok(())
    }

    pub fn set_endpoint_id(&mut self, id: impl Into<String>) -> Result<(), FieldError> {
        self.endpoint_id = check_endpoint_id(id.into())?;
        Ok(())
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig::factory()
    }
}

/// Parse the string-encoded sleep interval as stored and as typed into the portal.
pub fn parse_sleep_secs(raw: &str) -> Result<u32, FieldError> {
    let raw = raw.trim();
    let not_an_interval = || FieldError::NotAnInterval {
        field: keys::DEEP_SLEEP_SECS,
        value: raw.to_string(),
    };
    if raw.len() > defaults::DEEP_SLEEP_SECS_MAX_LEN {
        return Err(not_an_interval());
    }
    let secs = raw.parse::<u32>().map_err(|_| not_an_interval())?;
    check_interval(secs)
}

fn check_interval(secs: u32) -> Result<u32, FieldError> {
    // Must fit the 7-char stored field
    if secs == 0 || secs.to_string().len() > defaults::DEEP_SLEEP_SECS_MAX_LEN {
        return Err(FieldError::NotAnInterval {
            field: keys::DEEP_SLEEP_SECS,
            value: secs.to_string(),
        });
    }
    Ok(secs)
}

fn check_sensor_label(value: String) -> Result<String, FieldError> {
    check_bounded(keys::SENSOR_ID, value, defaults::SENSOR_ID_MAX_LEN)
}

fn check_endpoint_id(value: String) -> Result<String, FieldError> {
    check_bounded(keys::GSCRIPT_ID, value, defaults::GSCRIPT_ID_MAX_LEN)
}

fn check_bounded(field: &'static str, value: String, max: usize) -> Result<String, FieldError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(FieldError::Empty { field });
    }
    if len > max {
        return Err(FieldError::TooLong { field, len, max });
    }
    Ok(value)
}

/// Outcome of one atomic sensor transaction. A reading where either quantity
/// failed carries neither.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Measurement {
    Valid {
        temperature_f: f32,
        humidity_pct: f32,
    },
    Invalid,
}

impl Measurement {
    /// Combine the two raw driver values; NaN in either marks the whole reading invalid.
    pub fn from_raw(temperature_f: f32, humidity_pct: f32) -> Self {
        if temperature_f.is_nan() || humidity_pct.is_nan() {
            Measurement::Invalid
        } else {
            Measurement::Valid {
                temperature_f,
                humidity_pct,
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Measurement::Valid { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorReading {
    pub measurement: Measurement,
    /// Milliseconds since the start of the wake cycle
    pub timestamp_millis: u64,
}

impl SensorReading {
    pub fn is_valid(&self) -> bool {
        self.measurement.is_valid()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WakeOutcome {
    ProvisionTimedOut,
    Completed,
}
