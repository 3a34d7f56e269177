//! Wiring of the Linux host collaborators into a [`BootContext`].

use std::path::Path;

use crate::constants::defaults;
use crate::helpers::{base_path, BootClock};
use crate::interfaces::{
    HostProvisioner, HostSuspend, IioAdc, IioHumiditySensor, KvsStore, OverrideSwitch, SysfsLine,
    UreqTransport,
};
use crate::node::{
    BootContext, ConfigStore, PowerScheduler, ProvisioningGate, SensorSampler, TelemetryReporter,
};
use crate::settings::Settings;

fn mount_store(data_dir: &Path) -> KvsStore {
    KvsStore::mount(base_path::kvs_path(data_dir))
}

/// Build the context for one wake cycle. Collaborators are created fresh, as
/// after a cold boot; only the store contents carry over.
pub fn boot_context(settings: &Settings, clock: BootClock) -> BootContext {
    let provisioner = HostProvisioner::new(
        mount_store(&settings.data_dir),
        base_path::portal_dir(&settings.data_dir),
        settings.wifi_connect_cmd.clone(),
        defaults::PORTAL_POLL_INTERVAL,
    );
    let override_switch = OverrideSwitch::new(
        Box::new(SysfsLine::new(&settings.override_path)),
        settings.override_active_low,
    );

    BootContext {
        config_store: ConfigStore::new(Box::new(mount_store(&settings.data_dir))),
        gate: ProvisioningGate::new(Box::new(provisioner), override_switch),
        sampler: SensorSampler::new(
            Box::new(IioHumiditySensor::new(&settings.iio_device_dir)),
            Box::new(SysfsLine::new(&settings.sensor_power_path)),
            settings.sensor_warmup,
            clock,
        ),
        battery: Box::new(IioAdc::new(&settings.battery_adc_path)),
        reporter: TelemetryReporter::new(
            UreqTransport::factory(settings.http.clone()),
            settings.endpoint.clone(),
        ),
        scheduler: PowerScheduler::new(Box::new(HostSuspend::new(settings.suspend_mode))),
        portal_timeout: settings.portal_timeout,
    }
}
