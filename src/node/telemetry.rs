use thiserror::Error;
use url::{form_urlencoded, Url};

use crate::interfaces::{TransportError, TransportFactory};

use super::models::{DeviceConfig, Measurement, SensorReading};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("reading is invalid; nothing sent")]
    InvalidReading,
    #[error("could not connect to {host}:{port}")]
    ConnectFailed { host: String, port: u16 },
    #[error("cannot build request path: {0}")]
    Path(#[from] url::ParseError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

// Only the path of this base is used
const PATH_BASE: &str = "http://localhost/";

/// Fixed ingestion endpoint.
#[derive(Clone, Debug)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    /// Prepended to `/<endpoint id>/exec`
    pub path_prefix: String,
}

/// Read-only view of one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRequest<'a> {
    pub endpoint_id: &'a str,
    pub sensor_label: &'a str,
    pub temperature_f: f32,
    pub humidity_pct: f32,
    pub battery: i32,
}

impl<'a> TelemetryRequest<'a> {
    /// `None` for an invalid reading; no value is ever substituted.
    pub fn build(config: &'a DeviceConfig, reading: &SensorReading, battery: i32) -> Option<Self> {
        match reading.measurement {
            Measurement::Valid {
                temperature_f,
                humidity_pct,
            } => Some(TelemetryRequest {
                endpoint_id: config.endpoint_id(),
                sensor_label: config.sensor_label(),
                temperature_f,
                humidity_pct,
                battery,
            }),
            Measurement::Invalid => None,
        }
    }

    pub fn query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("tab", self.sensor_label)
            .append_pair("temp", &format!("{:.2}", self.temperature_f))
            .append_pair("humidity", &format!("{:.2}", self.humidity_pct))
            .append_pair("batt", &self.battery.to_string())
            .finish()
    }

    /// `<prefix>/<endpoint id>/exec?<query>`, the endpoint id encoded as a
    /// single path segment.
    pub fn path(&self, prefix: &str) -> Result<String, url::ParseError> {
        let mut url = Url::parse(PATH_BASE)?;
        url.set_path(prefix);
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(self.endpoint_id)
            .push("exec");
        Ok(format!("{}?{}", url.path(), self.query()))
    }
}

/// Sends one reading per wake cycle. Failures are returned, never retried.
pub struct TelemetryReporter {
    open_transport: TransportFactory,
    endpoint: Endpoint,
}

impl TelemetryReporter {
    pub fn new(open_transport: TransportFactory, endpoint: Endpoint) -> Self {
        TelemetryReporter {
            open_transport,
            endpoint,
        }
    }

    /// Returns the final HTTP status on delivery.
    pub fn send(
        &self,
        config: &DeviceConfig,
        reading: &SensorReading,
        battery: i32,
    ) -> Result<u16, ReportError> {
        let request =
            TelemetryRequest::build(config, reading, battery).ok_or(ReportError::InvalidReading)?;
        let path = request.path(&self.endpoint.path_prefix)?;

        // Transport lives for this call only
        let mut transport = (self.open_transport)();
        if !(transport.connect(&self.endpoint.host, self.endpoint.port) && transport.is_connected()) {
            return Err(ReportError::ConnectFailed {
                host: self.endpoint.host.clone(),
                port: self.endpoint.port,
            });
        }
        log::info!("Requesting {}", path);
        let status = transport.get(&path, &self.endpoint.host)?;
        log::info!("Telemetry delivered (status {})", status);
        Ok(status)
    }
}
