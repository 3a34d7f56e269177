use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::helpers::run_command;

use super::store::KvsStore;

/// The custom fields collected by the portal, as the user typed them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PortalFields {
    #[serde(rename = "deepSleepSecs")]
    pub deep_sleep_secs: String,
    #[serde(rename = "sensorID")]
    pub sensor_id: String,
    #[serde(rename = "GScriptID")]
    pub gscript_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortalOutcome {
    /// The user submitted the form and the node joined the network
    Submitted(PortalFields),
    TimedOut,
}

/// Network-provisioning collaborator. Owns the network credentials; the core
/// only asks whether it is connected and when to run the portal.
pub trait NetworkProvisioner {
    fn reset_credentials(&mut self);
    /// Join the network with the stored credentials
    fn connect_stored(&mut self) -> bool;
    fn is_connected(&self) -> bool;
    /// Block until the user submits the form or `timeout` elapses.
    fn run_portal(&mut self, timeout: Duration, existing: &PortalFields) -> PortalOutcome;
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct NetworkCredentials {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct PortalSubmission {
    #[serde(flatten)]
    credentials: NetworkCredentials,
    #[serde(flatten)]
    fields: PortalFields,
}

/// Host provisioner: credentials live in the persistent store, the portal is
/// a directory exchange (`current.json` out, `submission.json` in).
pub struct HostProvisioner {
    store: KvsStore,
    portal_dir: PathBuf,
    connect_cmd: Option<String>,
    poll_interval: Duration,
    connected: bool,
}

impl HostProvisioner {
    const CURRENT_FILE: &'static str = "current.json";
    const SUBMISSION_FILE: &'static str = "submission.json";

    pub fn new(
        store: KvsStore,
        portal_dir: impl Into<PathBuf>,
        connect_cmd: Option<String>,
        poll_interval: Duration,
    ) -> Self {
        HostProvisioner {
            store,
            portal_dir: portal_dir.into(),
            connect_cmd,
            poll_interval,
            connected: false,
        }
    }

    fn join(&self, credentials: &NetworkCredentials) -> bool {
        let Some(cmd) = &self.connect_cmd else {
            return true;
        };
        run_command(
            "sh",
            &["-c", cmd],
            &[
                ("SSID", credentials.ssid.as_str()),
                ("PSK", credentials.password.as_str()),
            ],
        )
        .is_ok()
    }

    fn publish_current(&self, existing: &PortalFields) -> io::Result<()> {
        fs::create_dir_all(&self.portal_dir)?;
        fs::write(
            self.portal_dir.join(Self::CURRENT_FILE),
            serde_json::to_vec_pretty(existing)?,
        )
    }

    fn take_submission(&self) -> Option<PortalSubmission> {
        let path = self.portal_dir.join(Self::SUBMISSION_FILE);
        let raw = fs::read(&path).ok()?;
        if let Err(e) = fs::remove_file(&path) {
            log::warn!("Could not remove {}: {}", path.display(), e);
        }
        match serde_json::from_slice::<PortalSubmission>(&raw) {
            Ok(submission) => Some(submission),
            Err(e) => {
                log::warn!("Ignoring malformed portal submission: {}", e);
                None
            }
        }
    }

    fn close_portal(&self) {
        remove_if_present(&self.portal_dir.join(Self::CURRENT_FILE));
    }
}

fn remove_if_present(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            log::warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}

impl NetworkProvisioner for HostProvisioner {
    fn reset_credentials(&mut self) {
        self.connected = false;
        match self.store.remove(keys::NETWORK_CREDENTIALS) {
            Ok(true) => log::info!("Stored network credentials erased"),
            Ok(false) => log::info!("No stored network credentials to erase"),
            Err(e) => log::error!("Failed to erase network credentials: {}", e),
        }
    }

    fn connect_stored(&mut self) -> bool {
        self.connected = match self.store.get::<NetworkCredentials>(keys::NETWORK_CREDENTIALS) {
            Ok(Some(credentials)) => {
                log::info!("Joining network '{}'", credentials.ssid);
                self.join(&credentials)
            }
            Ok(None) => {
                log::info!("No stored network credentials");
                false
            }
            Err(e) => {
                log::warn!("Stored network credentials unreadable: {}", e);
                false
            }
        };
        self.connected
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn run_portal(&mut self, timeout: Duration, existing: &PortalFields) -> PortalOutcome {
        if let Err(e) = self.publish_current(existing) {
            log::warn!("Could not publish current portal fields: {}", e);
        }
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            log::error!("Portal timeout {:?} out of range; closing portal", timeout);
            self.close_portal();
            return PortalOutcome::TimedOut;
        };

        loop {
            if let Some(submission) = self.take_submission() {
                if let Err(e) = self
                    .store
                    .set(keys::NETWORK_CREDENTIALS, &submission.credentials)
                {
                    log::error!("Failed to store network credentials: {}", e);
                }
                if self.connect_stored() {
                    self.close_portal();
                    return PortalOutcome::Submitted(submission.fields);
                }
                log::warn!(
                    "Could not join '{}' with submitted credentials; portal stays open",
                    submission.credentials.ssid
                );
            }

            let now = Instant::now();
            if now >= deadline {
                self.close_portal();
                return PortalOutcome::TimedOut;
            }
            thread::sleep(self.poll_interval.min(deadline - now));
        }
    }
}
