// Persistent store keys
pub const CONFIG_DOCUMENT: &str = "/config.json";
pub const NETWORK_CREDENTIALS: &str = "network_credentials";

// Config document fields
pub const DEEP_SLEEP_SECS: &str = "deepSleepSecs";
pub const SENSOR_ID: &str = "sensorID";
pub const GSCRIPT_ID: &str = "GScriptID";
