use std::time::Duration;

use crate::interfaces::{NetworkProvisioner, OverrideSwitch, PortalFields, PortalOutcome};

use super::models::{parse_sleep_secs, DeviceConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Network is up. `dirty` is set when `config` differs from the one passed in.
    Connected { config: DeviceConfig, dirty: bool },
    TimedOut,
}

/// Decides whether the node may proceed with a network, running the
/// configuration portal when stored credentials do not work.
pub struct ProvisioningGate {
    provisioner: Box<dyn NetworkProvisioner>,
    override_switch: OverrideSwitch,
}

impl ProvisioningGate {
    pub fn new(provisioner: Box<dyn NetworkProvisioner>, override_switch: OverrideSwitch) -> Self {
        ProvisioningGate {
            provisioner,
            override_switch,
        }
    }

    pub fn ensure_connected(&mut self, current: &DeviceConfig, timeout: Duration) -> ProvisionOutcome {
        if self.override_switch.is_asserted() {
            log::warn!("Override input asserted; discarding stored network credentials");
            self.provisioner.reset_credentials();
        } else if self.provisioner.is_connected() {
            log::info!("Network already up");
            return ProvisionOutcome::Connected {
                config: current.clone(),
                dirty: false,
            };
        } else if self.provisioner.connect_stored() {
            log::info!("Connected with stored network credentials");
            return ProvisionOutcome::Connected {
                config: current.clone(),
                dirty: false,
            };
        } else {
            log::info!("Stored network credentials did not connect");
        }

        log::info!(
            "Entered configuration portal (timeout {}s)",
            timeout.as_secs()
        );
        match self.provisioner.run_portal(timeout, &portal_fields(current)) {
            PortalOutcome::Submitted(fields) => {
                let config = apply_submission(current, &fields);
                let dirty = config != *current;
                if dirty {
                    log::info!("Portal submission changed the configuration; it will be saved");
                } else {
                    log::info!("Portal submission left the configuration unchanged");
                }
                ProvisionOutcome::Connected { config, dirty }
            }
            PortalOutcome::TimedOut => {
                log::warn!("Configuration portal timed out without a submission");
                ProvisionOutcome::TimedOut
            }
        }
    }
}

/// Pre-fill values shown in the portal form.
pub fn portal_fields(config: &DeviceConfig) -> PortalFields {
    PortalFields {
        deep_sleep_secs: config.sleep_interval_secs().to_string(),
        sensor_id: config.sensor_label().to_string(),
        gscript_id: config.endpoint_id().to_string(),
    }
}

/// Apply submitted form values; an invalid field keeps its current value.
pub fn apply_submission(current: &DeviceConfig, fields: &PortalFields) -> DeviceConfig {
    let mut config = current.clone();

    let interval = parse_sleep_secs(&fields.deep_sleep_secs)
        .and_then(|secs| config.set_sleep_interval_secs(secs));
    if let Err(e) = interval {
        log::warn!("Rejected submitted {}", e);
    }
    if let Err(e) = config.set_sensor_label(fields.sensor_id.trim()) {
        log::warn!("Rejected submitted {}", e);
    }
    if let Err(e) = config.set_endpoint_id(fields.gscript_id.trim()) {
        log::warn!("Rejected submitted {}", e);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::interfaces::{DigitalInput, HardwareError};

    struct Level(bool);

    impl DigitalInput for Level {
        fn is_high(&mut self) -> Result<bool, HardwareError> {
            Ok(self.0)
        }
    }

    #[derive(Default)]
    struct Calls {
        resets: u32,
        connects: u32,
        portals: u32,
    }

    struct Scripted {
        calls: Rc<RefCell<Calls>>,
        stored_works: bool,
        connected: bool,
        portal: PortalOutcome,
    }

    impl NetworkProvisioner for Scripted {
        fn reset_credentials(&mut self) {
            self.calls.borrow_mut().resets += 1;
            self.stored_works = false;
            self.connected = false;
        }

        fn connect_stored(&mut self) -> bool {
            self.calls.borrow_mut().connects += 1;
            self.connected = self.stored_works;
            self.connected
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn run_portal(&mut self, _timeout: Duration, _existing: &PortalFields) -> PortalOutcome {
            self.calls.borrow_mut().portals += 1;
            self.portal.clone()
        }
    }

    fn gate(
        override_high: bool,
        stored_works: bool,
        portal: PortalOutcome,
    ) -> (ProvisioningGate, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let provisioner = Scripted {
            calls: calls.clone(),
            stored_works,
            connected: false,
            portal,
        };
        // Active-high so a high level means asserted
        let switch = OverrideSwitch::new(Box::new(Level(override_high)), false);
        (ProvisioningGate::new(Box::new(provisioner), switch), calls)
    }

    fn kitchen() -> DeviceConfig {
        DeviceConfig::new(1200, "kitchen", "abc").unwrap()
    }

    fn fields(secs: &str, sensor: &str, script: &str) -> PortalFields {
        PortalFields {
            deep_sleep_secs: secs.into(),
            sensor_id: sensor.into(),
            gscript_id: script.into(),
        }
    }

    #[test]
    fn stored_credentials_skip_the_portal() {
        let (mut gate, calls) = gate(false, true, PortalOutcome::TimedOut);
        let outcome = gate.ensure_connected(&kitchen(), Duration::from_secs(90));
        assert_eq!(
            outcome,
            ProvisionOutcome::Connected {
                config: kitchen(),
                dirty: false
            }
        );
        assert_eq!(calls.borrow().portals, 0);
        assert_eq!(calls.borrow().resets, 0);
    }

    #[test]
    fn live_link_needs_no_reconnect() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let provisioner = Scripted {
            calls: calls.clone(),
            stored_works: true,
            connected: true,
            portal: PortalOutcome::TimedOut,
        };
        let switch = OverrideSwitch::new(Box::new(Level(false)), false);
        let mut gate = ProvisioningGate::new(Box::new(provisioner), switch);

        assert_eq!(
            gate.ensure_connected(&kitchen(), Duration::from_secs(90)),
            ProvisionOutcome::Connected {
                config: kitchen(),
                dirty: false
            }
        );
        let calls = calls.borrow();
        assert_eq!((calls.connects, calls.portals, calls.resets), (0, 0, 0));
    }

    #[test]
    fn override_resets_even_a_live_link() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let provisioner = Scripted {
            calls: calls.clone(),
            stored_works: true,
            connected: true,
            portal: PortalOutcome::TimedOut,
        };
        let switch = OverrideSwitch::new(Box::new(Level(true)), false);
        let mut gate = ProvisioningGate::new(Box::new(provisioner), switch);

        assert_eq!(
            gate.ensure_connected(&kitchen(), Duration::from_secs(90)),
            ProvisionOutcome::TimedOut
        );
        assert_eq!(calls.borrow().resets, 1);
        assert_eq!(calls.borrow().portals, 1);
    }

    #[test]
    fn override_resets_even_working_credentials() {
        let (mut gate, calls) = gate(true, true, PortalOutcome::TimedOut);
        let outcome = gate.ensure_connected(&kitchen(), Duration::from_secs(90));
        assert_eq!(outcome, ProvisionOutcome::TimedOut);
        let calls = calls.borrow();
        assert_eq!(calls.resets, 1);
        assert_eq!(calls.connects, 0);
        assert_eq!(calls.portals, 1);
    }

    #[test]
    fn failed_connect_opens_portal_and_applies_submission() {
        let submitted = fields("600", "attic", "xyz");
        let (mut gate, calls) = gate(false, false, PortalOutcome::Submitted(submitted));
        let outcome = gate.ensure_connected(&kitchen(), Duration::from_secs(90));
        assert_eq!(
            outcome,
            ProvisionOutcome::Connected {
                config: DeviceConfig::new(600, "attic", "xyz").unwrap(),
                dirty: true
            }
        );
        assert_eq!(calls.borrow().portals, 1);
    }

    #[test]
    fn unchanged_submission_is_not_dirty() {
        let (mut gate, _) = gate(
            false,
            false,
            PortalOutcome::Submitted(fields("1200", "kitchen", "abc")),
        );
        assert_eq!(
            gate.ensure_connected(&kitchen(), Duration::from_secs(90)),
            ProvisionOutcome::Connected {
                config: kitchen(),
                dirty: false
            }
        );
    }

    #[test]
    fn invalid_submitted_fields_keep_current_values() {
        let config = apply_submission(&kitchen(), &fields("0", "", "new-script"));
        assert_eq!(config, DeviceConfig::new(1200, "kitchen", "new-script").unwrap());

        let config = apply_submission(&kitchen(), &fields("12345678", &"s".repeat(16), ""));
        assert_eq!(config, kitchen());
    }

    #[test]
    fn portal_is_prefilled_with_current_values() {
        assert_eq!(portal_fields(&kitchen()), fields("1200", "kitchen", "abc"));
    }
}
