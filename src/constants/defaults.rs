use std::time::Duration;

pub const LOG_LEVEL: &str = "INFO";

// Factory configuration
pub const DEEP_SLEEP_SECS: u32 = 1200;
pub const SENSOR_ID: &str = "sensor1";
pub const GSCRIPT_ID: &str = "unset-script-id";

// Stored field bounds, in characters
pub const DEEP_SLEEP_SECS_MAX_LEN: usize = 7;
pub const SENSOR_ID_MAX_LEN: usize = 15;
pub const GSCRIPT_ID_MAX_LEN: usize = 60;

pub const TELEMETRY_HOST: &str = "script.google.com";
pub const TELEMETRY_PORT: u16 = 443;
pub const TELEMETRY_SCHEME: &str = "https";
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
pub const HTTP_TIMEOUT_MAX_SECS: u64 = 3_600;
pub const MAX_REDIRECTS: u32 = 5;

pub const PORTAL_TIMEOUT: Duration = Duration::from_secs(90);
pub const PORTAL_TIMEOUT_MAX_SECS: u64 = 86_400;
pub const PORTAL_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub const SENSOR_WARMUP: Duration = Duration::from_millis(2000);
pub const IIO_DEVICE_DIR: &str = "/sys/bus/iio/devices/iio:device0";
pub const BATTERY_ADC_PATH: &str = "/sys/bus/iio/devices/iio:device1/in_voltage0_raw";
pub const SENSOR_POWER_PATH: &str = "/sys/class/gpio/gpio5/value";
pub const OVERRIDE_PATH: &str = "/sys/class/gpio/gpio0/value";

/// Sent in place of the battery sample when the ADC cannot be read
pub const BATTERY_UNAVAILABLE: i32 = -1;
