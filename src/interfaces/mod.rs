pub mod hardware;
pub mod provisioner;
pub mod store;
pub mod suspend;
pub mod transport;

pub use hardware::{
    BatteryMonitor, DigitalInput, DigitalOutput, HardwareError, HumidityTemperatureSensor,
    IioAdc, IioHumiditySensor, OverrideSwitch, SysfsLine,
};
pub use provisioner::{HostProvisioner, NetworkProvisioner, PortalFields, PortalOutcome};
pub use store::{KvsStore, PersistentStore, StoreError};
pub use suspend::{DeepSleep, HostSuspend, SuspendMode};
pub use transport::{HttpSettings, Transport, TransportError, TransportFactory, UreqTransport};
