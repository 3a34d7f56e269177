use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{defaults, envvars};
use crate::helpers::base_path;
use crate::interfaces::{HttpSettings, SuspendMode};
use crate::node::Endpoint;

const TELEMETRY_PATH_PREFIX: &str = "/macros/s";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings of the host platform, read from the environment.
#[derive(Clone, Debug)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub endpoint: Endpoint,
    pub http: HttpSettings,
    pub portal_timeout: Duration,
    pub wifi_connect_cmd: Option<String>,
    pub iio_device_dir: PathBuf,
    pub battery_adc_path: PathBuf,
    pub sensor_power_path: PathBuf,
    pub sensor_warmup: Duration,
    pub override_path: PathBuf,
    pub override_active_low: bool,
    pub suspend_mode: SuspendMode,
}

fn var(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn parsed<T>(name: &'static str, default: T) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|e| SettingsError::Invalid {
            var: name,
            reason: e.to_string(),
            value,
        }),
    }
}

/// Whole seconds within `1..=max`.
fn bounded_secs(name: &'static str, default: Duration, max: u64) -> Result<Duration, SettingsError> {
    let secs: u64 = parsed(name, default.as_secs())?;
    if !(1..=max).contains(&secs) {
        return Err(SettingsError::Invalid {
            var: name,
            value: secs.to_string(),
            reason: format!("expected 1 to {max} seconds"),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn flag(name: &'static str, default: bool) -> Result<bool, SettingsError> {
    match var(name).map(|v| v.to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if ["1", "true", "yes", "on"].contains(&v.as_str()) => Ok(true),
        Some(v) if ["0", "false", "no", "off"].contains(&v.as_str()) => Ok(false),
        Some(value) => Err(SettingsError::Invalid {
            var: name,
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn path_or(name: &'static str, default: &str) -> PathBuf {
    var(name).unwrap_or_else(|| default.to_string()).into()
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let scheme = var(envvars::TELEMETRY_SCHEME)
            .unwrap_or_else(|| defaults::TELEMETRY_SCHEME.to_string())
            .to_ascii_lowercase();
        if scheme != "https" && scheme != "http" {
            return Err(SettingsError::Invalid {
                var: envvars::TELEMETRY_SCHEME,
                value: scheme,
                reason: "expected 'http' or 'https'".to_string(),
            });
        }

        Ok(Settings {
            data_dir: base_path::data_dir(),
            endpoint: Endpoint {
                host: var(envvars::TELEMETRY_HOST)
                    .unwrap_or_else(|| defaults::TELEMETRY_HOST.to_string()),
                port: parsed(envvars::TELEMETRY_PORT, defaults::TELEMETRY_PORT)?,
                path_prefix: TELEMETRY_PATH_PREFIX.to_string(),
            },
            http: HttpSettings {
                scheme,
                timeout: bounded_secs(
                    envvars::HTTP_TIMEOUT_SECS,
                    defaults::HTTP_TIMEOUT,
                    defaults::HTTP_TIMEOUT_MAX_SECS,
                )?,
                max_redirects: parsed(envvars::MAX_REDIRECTS, defaults::MAX_REDIRECTS)?,
            },
            portal_timeout: bounded_secs(
                envvars::PORTAL_TIMEOUT_SECS,
                defaults::PORTAL_TIMEOUT,
                defaults::PORTAL_TIMEOUT_MAX_SECS,
            )?,
            wifi_connect_cmd: var(envvars::WIFI_CONNECT_CMD),
            iio_device_dir: path_or(envvars::IIO_DEVICE_DIR, defaults::IIO_DEVICE_DIR),
            battery_adc_path: path_or(envvars::BATTERY_ADC_PATH, defaults::BATTERY_ADC_PATH),
            sensor_power_path: path_or(envvars::SENSOR_POWER_PATH, defaults::SENSOR_POWER_PATH),
            sensor_warmup: Duration::from_millis(parsed(
                envvars::SENSOR_WARMUP_MS,
                defaults::SENSOR_WARMUP.as_millis() as u64,
            )?),
            override_path: path_or(envvars::OVERRIDE_PATH, defaults::OVERRIDE_PATH),
            override_active_low: flag(envvars::OVERRIDE_ACTIVE_LOW, true)?,
            suspend_mode: parsed(envvars::SUSPEND_MODE, SuspendMode::RtcWake)?,
        })
    }
}
