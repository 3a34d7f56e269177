#![allow(dead_code)]
// Shared across integration test binaries; not every binary uses every stub

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use snode::helpers::BootClock;
use snode::interfaces::{
    BatteryMonitor, DeepSleep, DigitalInput, DigitalOutput, HardwareError,
    HumidityTemperatureSensor, NetworkProvisioner, OverrideSwitch, PersistentStore, PortalFields,
    PortalOutcome, StoreError, Transport, TransportError, TransportFactory,
};
use snode::node::{
    BootContext, ConfigStore, DeviceConfig, Endpoint, PowerScheduler, ProvisioningGate,
    SensorSampler, TelemetryReporter,
};

pub const CONFIG_KEY: &str = "/config.json";

#[derive(Clone, Default)]
pub struct MemoryStore {
    pub data: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    pub writes: Rc<RefCell<u32>>,
    pub unmounted: bool,
}

impl MemoryStore {
    pub fn with_config(config: &DeviceConfig) -> Self {
        let store = MemoryStore::default();
        ConfigStore::new(Box::new(store.clone()))
            .save(config)
            .unwrap();
        *store.writes.borrow_mut() = 0;
        store
    }

    pub fn raw_config(&self) -> Option<Vec<u8>> {
        self.data.borrow().get(CONFIG_KEY).cloned()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unmounted {
            return Err(StoreError::Unmounted("memory store".into()));
        }
        Ok(())
    }
}

impl PersistentStore for MemoryStore {
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.data.borrow().contains_key(key))
    }

    fn read_all(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.check()?;
        Ok(self.data.borrow().get(key).cloned())
    }

    fn write_all(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.check()?;
        *self.writes.borrow_mut() += 1;
        self.data.borrow_mut().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[derive(Default, Debug)]
pub struct ProvisionerCalls {
    pub resets: u32,
    pub connects: u32,
    pub portals: Vec<(Duration, PortalFields)>,
}

pub struct ScriptedProvisioner {
    pub calls: Rc<RefCell<ProvisionerCalls>>,
    pub credentials_valid: bool,
    pub connected: bool,
    pub portal: PortalOutcome,
}

impl NetworkProvisioner for ScriptedProvisioner {
    fn reset_credentials(&mut self) {
        self.calls.borrow_mut().resets += 1;
        self.credentials_valid = false;
        self.connected = false;
    }

    fn connect_stored(&mut self) -> bool {
        self.calls.borrow_mut().connects += 1;
        self.connected = self.credentials_valid;
        self.connected
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn run_portal(&mut self, timeout: Duration, existing: &PortalFields) -> PortalOutcome {
        self.calls
            .borrow_mut()
            .portals
            .push((timeout, existing.clone()));
        if let PortalOutcome::Submitted(_) = self.portal {
            self.credentials_valid = true;
            self.connected = true;
        }
        self.portal.clone()
    }
}

pub struct Level(pub bool);

impl DigitalInput for Level {
    fn is_high(&mut self) -> Result<bool, HardwareError> {
        Ok(self.0)
    }
}

pub struct FakeSensor {
    pub temperature_f: f32,
    pub humidity_pct: f32,
}

impl HumidityTemperatureSensor for FakeSensor {
    fn read_humidity(&mut self) -> Result<f32, HardwareError> {
        Ok(self.humidity_pct)
    }

    fn read_temperature_f(&mut self) -> Result<f32, HardwareError> {
        Ok(self.temperature_f)
    }
}

pub struct RailRecorder(pub Rc<RefCell<Vec<bool>>>);

impl DigitalOutput for RailRecorder {
    fn set_high(&mut self) -> Result<(), HardwareError> {
        self.0.borrow_mut().push(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), HardwareError> {
        self.0.borrow_mut().push(false);
        Ok(())
    }
}

pub struct FixedBattery {
    pub value: i32,
    pub samples: Rc<RefCell<u32>>,
}

impl BatteryMonitor for FixedBattery {
    fn sample(&mut self) -> Result<i32, HardwareError> {
        *self.samples.borrow_mut() += 1;
        Ok(self.value)
    }
}

#[derive(Default, Debug)]
pub struct TransportCalls {
    pub opened: u32,
    pub connects: Vec<(String, u16)>,
    pub requests: Vec<(String, String)>,
}

struct FakeTransport {
    calls: Rc<RefCell<TransportCalls>>,
    reachable: bool,
    connected: bool,
}

impl Transport for FakeTransport {
    fn connect(&mut self, host: &str, port: u16) -> bool {
        self.calls
            .borrow_mut()
            .connects
            .push((host.to_string(), port));
        self.connected = self.reachable;
        self.connected
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn get(&mut self, path: &str, host: &str) -> Result<u16, TransportError> {
        self.calls
            .borrow_mut()
            .requests
            .push((path.to_string(), host.to_string()));
        Ok(200)
    }
}

pub struct RecordingSuspend(pub Rc<RefCell<Vec<Duration>>>);

impl DeepSleep for RecordingSuspend {
    fn deep_sleep(&mut self, duration: Duration) {
        self.0.borrow_mut().push(duration);
    }
}

/// A scripted node: collaborators to hand to one wake cycle plus handles to
/// observe what the cycle did with them.
pub struct Rig {
    pub store: MemoryStore,
    pub override_asserted: bool,
    pub credentials_valid: bool,
    pub portal: PortalOutcome,
    pub temperature_f: f32,
    pub humidity_pct: f32,
    pub network_reachable: bool,
    pub provisioner_calls: Rc<RefCell<ProvisionerCalls>>,
    pub rail: Rc<RefCell<Vec<bool>>>,
    pub battery_samples: Rc<RefCell<u32>>,
    pub transport_calls: Rc<RefCell<TransportCalls>>,
    pub sleeps: Rc<RefCell<Vec<Duration>>>,
}

impl Rig {
    pub fn new(store: MemoryStore) -> Self {
        Rig {
            store,
            override_asserted: false,
            credentials_valid: true,
            portal: PortalOutcome::TimedOut,
            temperature_f: 72.3,
            humidity_pct: 41.0,
            network_reachable: true,
            provisioner_calls: Default::default(),
            rail: Default::default(),
            battery_samples: Default::default(),
            transport_calls: Default::default(),
            sleeps: Default::default(),
        }
    }

    pub fn context(&self) -> BootContext {
        let provisioner = ScriptedProvisioner {
            calls: self.provisioner_calls.clone(),
            credentials_valid: self.credentials_valid,
            connected: false,
            portal: self.portal.clone(),
        };
        let transport_calls = self.transport_calls.clone();
        let reachable = self.network_reachable;
        let factory: TransportFactory = Box::new(move || {
            transport_calls.borrow_mut().opened += 1;
            Box::new(FakeTransport {
                calls: transport_calls.clone(),
                reachable,
                connected: false,
            }) as Box<dyn Transport>
        });

        BootContext {
            config_store: ConfigStore::new(Box::new(self.store.clone())),
            gate: ProvisioningGate::new(
                Box::new(provisioner),
                OverrideSwitch::new(Box::new(Level(self.override_asserted)), false),
            ),
            sampler: SensorSampler::new(
                Box::new(FakeSensor {
                    temperature_f: self.temperature_f,
                    humidity_pct: self.humidity_pct,
                }),
                Box::new(RailRecorder(self.rail.clone())),
                Duration::ZERO,
                BootClock::start(),
            ),
            battery: Box::new(FixedBattery {
                value: 873,
                samples: self.battery_samples.clone(),
            }),
            reporter: TelemetryReporter::new(
                factory,
                Endpoint {
                    host: "script.google.com".into(),
                    port: 443,
                    path_prefix: "/macros/s".into(),
                },
            ),
            scheduler: PowerScheduler::new(Box::new(RecordingSuspend(self.sleeps.clone()))),
            portal_timeout: Duration::from_secs(90),
        }
    }
}
