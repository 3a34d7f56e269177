use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HardwareError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unexpected value '{value}' in {path}")]
    Parse { path: PathBuf, value: String },
}

pub trait DigitalInput {
    fn is_high(&mut self) -> Result<bool, HardwareError>;
}

pub trait DigitalOutput {
    fn set_high(&mut self) -> Result<(), HardwareError>;
    fn set_low(&mut self) -> Result<(), HardwareError>;
}

/// Combined relative-humidity / temperature sensor driver.
pub trait HumidityTemperatureSensor {
    /// Relative humidity in percent
    fn read_humidity(&mut self) -> Result<f32, HardwareError>;
    /// Temperature in degrees Fahrenheit
    fn read_temperature_f(&mut self) -> Result<f32, HardwareError>;
}

/// Raw ADC sample proportional to the supply voltage.
pub trait BatteryMonitor {
    fn sample(&mut self) -> Result<i32, HardwareError>;
}

fn read_trimmed(path: &Path) -> Result<String, HardwareError> {
    fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|source| HardwareError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn read_number<T: std::str::FromStr>(path: &Path) -> Result<T, HardwareError> {
    let value = read_trimmed(path)?;
    value.parse::<T>().map_err(|_| HardwareError::Parse {
        path: path.to_path_buf(),
        value,
    })
}

/// GPIO line exposed through a sysfs `value` file.
#[derive(Debug, Clone)]
pub struct SysfsLine {
    path: PathBuf,
}

impl SysfsLine {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SysfsLine { path: path.into() }
    }

    fn write(&self, value: &[u8]) -> Result<(), HardwareError> {
        fs::write(&self.path, value).map_err(|source| HardwareError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl DigitalInput for SysfsLine {
    fn is_high(&mut self) -> Result<bool, HardwareError> {
        match read_trimmed(&self.path)?.as_str() {
            "1" => Ok(true),
            "0" => Ok(false),
            other => Err(HardwareError::Parse {
                path: self.path.clone(),
                value: other.to_string(),
            }),
        }
    }
}

impl DigitalOutput for SysfsLine {
    fn set_high(&mut self) -> Result<(), HardwareError> {
        self.write(b"1")
    }

    fn set_low(&mut self) -> Result<(), HardwareError> {
        self.write(b"0")
    }
}

/// Physical credential-reset control, sampled once per boot.
pub struct OverrideSwitch {
    line: Box<dyn DigitalInput>,
    active_low: bool,
}

impl OverrideSwitch {
    pub fn new(line: Box<dyn DigitalInput>, active_low: bool) -> Self {
        OverrideSwitch { line, active_low }
    }

    /// An unreadable line counts as not asserted.
    pub fn is_asserted(&mut self) -> bool {
        match self.line.is_high() {
            Ok(high) => high != self.active_low,
            Err(e) => {
                log::warn!("Override input unreadable, treating as released: {}", e);
                false
            }
        }
    }
}

/// Humidity/temperature sensor exposed by the Linux IIO subsystem.
pub struct IioHumiditySensor {
    dir: PathBuf,
}

impl IioHumiditySensor {
    const TEMP_FILE: &'static str = "in_temp_input";
    const HUMIDITY_FILE: &'static str = "in_humidityrelative_input";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        IioHumiditySensor { dir: dir.into() }
    }
}

impl HumidityTemperatureSensor for IioHumiditySensor {
    fn read_humidity(&mut self) -> Result<f32, HardwareError> {
        // milli-percent
        let raw: i64 = read_number(&self.dir.join(Self::HUMIDITY_FILE))?;
        Ok(raw as f32 / 1000.0)
    }

    fn read_temperature_f(&mut self) -> Result<f32, HardwareError> {
        // milli-degrees Celsius
        let raw: i64 = read_number(&self.dir.join(Self::TEMP_FILE))?;
        Ok(raw as f32 / 1000.0 * 9.0 / 5.0 + 32.0)
    }
}

/// Single IIO ADC channel (`in_voltageN_raw`).
pub struct IioAdc {
    path: PathBuf,
}

impl IioAdc {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        IioAdc { path: path.into() }
    }
}

impl BatteryMonitor for IioAdc {
    fn sample(&mut self) -> Result<i32, HardwareError> {
        read_number(&self.path)
    }
}
