pub const LOG_LEVEL: &str = "LOG_LEVEL";

pub const DATA_DIR: &str = "SNODE_DATA_DIR";

pub const TELEMETRY_HOST: &str = "SNODE_TELEMETRY_HOST";
pub const TELEMETRY_PORT: &str = "SNODE_TELEMETRY_PORT";
pub const TELEMETRY_SCHEME: &str = "SNODE_TELEMETRY_SCHEME";
pub const HTTP_TIMEOUT_SECS: &str = "SNODE_HTTP_TIMEOUT_SECS";
pub const MAX_REDIRECTS: &str = "SNODE_MAX_REDIRECTS";

pub const PORTAL_TIMEOUT_SECS: &str = "SNODE_PORTAL_TIMEOUT_SECS";
pub const WIFI_CONNECT_CMD: &str = "SNODE_WIFI_CONNECT_CMD";

pub const IIO_DEVICE_DIR: &str = "SNODE_IIO_DEVICE_DIR";
pub const BATTERY_ADC_PATH: &str = "SNODE_BATTERY_ADC_PATH";
pub const SENSOR_POWER_PATH: &str = "SNODE_SENSOR_POWER_PATH";
pub const SENSOR_WARMUP_MS: &str = "SNODE_SENSOR_WARMUP_MS";
pub const OVERRIDE_PATH: &str = "SNODE_OVERRIDE_PATH";
pub const OVERRIDE_ACTIVE_LOW: &str = "SNODE_OVERRIDE_ACTIVE_LOW";

pub const SUSPEND_MODE: &str = "SNODE_SUSPEND_MODE";
