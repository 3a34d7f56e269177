use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use thiserror::Error;
use ureq::tls::{TlsConfig, TlsProvider};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("no connection to {0}")]
    NotConnected(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Request(String),
}

/// Outbound HTTP(S) client collaborator. Redirects are followed internally.
pub trait Transport {
    fn connect(&mut self, host: &str, port: u16) -> bool;
    fn is_connected(&self) -> bool;
    /// Issue a GET for `path` on `host`; returns the final 2xx status.
    fn get(&mut self, path: &str, host: &str) -> Result<u16, TransportError>;
}

/// Creates a fresh transport for one report; the handle is dropped when the
/// report step ends.
pub type TransportFactory = Box<dyn Fn() -> Box<dyn Transport>>;

#[derive(Clone, Debug)]
pub struct HttpSettings {
    pub scheme: String,
    pub timeout: Duration,
    pub max_redirects: u32,
}

pub struct UreqTransport {
    settings: HttpSettings,
    agent: Option<ureq::Agent>,
    endpoint: Option<(String, u16)>,
}

impl UreqTransport {
    pub fn new(settings: HttpSettings) -> Self {
        UreqTransport {
            settings,
            agent: None,
            endpoint: None,
        }
    }

    pub fn factory(settings: HttpSettings) -> TransportFactory {
        Box::new(move || Box::new(UreqTransport::new(settings.clone())) as Box<dyn Transport>)
    }

    fn build_agent(&self) -> ureq::Agent {
        let mut config = ureq::Agent::config_builder()
            .timeout_global(Some(self.settings.timeout))
            .max_redirects(self.settings.max_redirects);
        if self.settings.scheme == "https" {
            config = config.tls_config(
                TlsConfig::builder()
                    .provider(TlsProvider::NativeTls)
                    .build(),
            );
        }
        config.build().into()
    }
}

fn probe(host: &str, port: u16, timeout: Duration) -> Result<(), String> {
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| format!("cannot resolve {host}: {e}"))?;
    let mut last_err = format!("{host} resolved to no addresses");
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(_) => return Ok(()),
            Err(e) => last_err = format!("{addr}: {e}"),
        }
    }
    Err(last_err)
}

impl Transport for UreqTransport {
    fn connect(&mut self, host: &str, port: u16) -> bool {
        match probe(host, port, self.settings.timeout) {
            Ok(()) => {
                log::debug!("Connected to {}:{}", host, port);
                self.agent = Some(self.build_agent());
                self.endpoint = Some((host.to_string(), port));
                true
            }
            Err(e) => {
                log::warn!("Connection to {}:{} failed: {}", host, port, e);
                self.agent = None;
                self.endpoint = None;
                false
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.agent.is_some()
    }

    fn get(&mut self, path: &str, host: &str) -> Result<u16, TransportError> {
        let (agent, port) = match (&self.agent, &self.endpoint) {
            (Some(agent), Some((connected_host, port))) if connected_host == host => (agent, *port),
            _ => return Err(TransportError::NotConnected(host.to_string())),
        };
        let url = format!("{}://{}:{}{}", self.settings.scheme, host, port, path);
        log::debug!("GET {}", url);

        match agent.get(url.as_str()).call() {
            Ok(resp) => {
                let status = resp.status().as_u16();
                if (200..300).contains(&status) {
                    Ok(status)
                } else {
                    Err(TransportError::Status(status))
                }
            }
            Err(ureq::Error::StatusCode(code)) => Err(TransportError::Status(code)),
            Err(e) => Err(TransportError::Request(e.to_string())),
        }
    }
}

impl Drop for UreqTransport {
    fn drop(&mut self) {
        if let Some((host, port)) = self.endpoint.take() {
            log::debug!("Releasing connection to {}:{}", host, port);
        }
    }
}
