use std::time::Duration;

use crate::constants::defaults;
use crate::interfaces::BatteryMonitor;

use super::config_store::{ConfigSource, ConfigStore};
use super::models::{DeviceConfig, SensorReading, WakeOutcome};
use super::provisioning::{ProvisionOutcome, ProvisioningGate};
use super::sampler::SensorSampler;
use super::scheduler::PowerScheduler;
use super::telemetry::{ReportError, TelemetryReporter};
use super::NodeFault;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Boot,
    LoadConfig,
    Provision,
    Measure,
    Report,
    SaveConfigIfDirty,
    ShortSleep,
    FullSleep,
}

/// Everything one wake cycle works with. Built fresh at every boot.
pub struct BootContext {
    pub config_store: ConfigStore,
    pub gate: ProvisioningGate,
    pub sampler: SensorSampler,
    pub battery: Box<dyn BatteryMonitor>,
    pub reporter: TelemetryReporter,
    pub scheduler: PowerScheduler,
    pub portal_timeout: Duration,
}

/// What happened during a wake cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub stages: Vec<Stage>,
    pub outcome: WakeOutcome,
    pub sleep_secs: u32,
    /// Configuration in effect at the end of the cycle
    pub config: DeviceConfig,
    pub saved: bool,
    pub reading: Option<SensorReading>,
    pub delivery: Option<Result<u16, ReportError>>,
    pub faults: Vec<NodeFault>,
}

pub struct BootSequencer {
    ctx: BootContext,
    stages: Vec<Stage>,
    faults: Vec<NodeFault>,
}

impl BootSequencer {
    pub fn new(ctx: BootContext) -> Self {
        BootSequencer {
            ctx,
            stages: Vec::new(),
            faults: Vec::new(),
        }
    }

    fn enter(&mut self, stage: Stage) {
        log::info!("-> {:?}", stage);
        self.stages.push(stage);
    }

    fn fault(&mut self, fault: NodeFault) {
        log::warn!("Recovered from fault: {}", fault);
        self.faults.push(fault);
    }

    /// Run one wake cycle to its suspend call.
    pub fn run(mut self) -> CycleReport {
        self.enter(Stage::Boot);

        self.enter(Stage::LoadConfig);
        let loaded = self.ctx.config_store.load();
        match loaded.source {
            ConfigSource::Stored => log::info!("Loaded stored config"),
            ConfigSource::Absent => log::info!("No stored config; using factory defaults"),
            ConfigSource::Degraded(e) => self.fault(e.into()),
        }
        let loaded_config = loaded.config;
        log::info!(
            "Config: interval {}s, sensor '{}', endpoint '{}'",
            loaded_config.sleep_interval_secs(),
            loaded_config.sensor_label(),
            loaded_config.endpoint_id()
        );

        self.enter(Stage::Provision);
        let timeout = self.ctx.portal_timeout;
        let (config, dirty) = match self.ctx.gate.ensure_connected(&loaded_config, timeout) {
            ProvisionOutcome::Connected { config, dirty } => (config, dirty),
            ProvisionOutcome::TimedOut => {
                self.fault(NodeFault::ProvisioningTimedOut);
                self.enter(Stage::ShortSleep);
                return self.finish(WakeOutcome::ProvisionTimedOut, loaded_config, false, None, None);
            }
        };

        self.enter(Stage::Measure);
        let reading = self.ctx.sampler.read();
        if !reading.is_valid() {
            self.fault(NodeFault::SensorInvalidReading);
        }

        self.enter(Stage::Report);
        // ADC only sampled when there is something to send
        let battery = if reading.is_valid() {
            self.ctx.battery.sample().unwrap_or_else(|e| {
                log::warn!("Battery sample unavailable: {}", e);
                defaults::BATTERY_UNAVAILABLE
            })
        } else {
            defaults::BATTERY_UNAVAILABLE
        };
        let delivery = self.ctx.reporter.send(&config, &reading, battery);
        match &delivery {
            Ok(_) | Err(ReportError::InvalidReading) => {}
            Err(e) => self.fault(NodeFault::TransportFailure(e.to_string())),
        }

        self.enter(Stage::SaveConfigIfDirty);
        let saved = dirty
            && match self.ctx.config_store.save(&config) {
                Ok(()) => true,
                Err(e) => {
                    self.fault(e.into());
                    false
                }
            };

        self.enter(Stage::FullSleep);
        self.finish(WakeOutcome::Completed, config, saved, Some(reading), Some(delivery))
    }

    fn finish(
        self,
        outcome: WakeOutcome,
        config: DeviceConfig,
        saved: bool,
        reading: Option<SensorReading>,
        delivery: Option<Result<u16, ReportError>>,
    ) -> CycleReport {
        let sleep_secs = self
            .ctx
            .scheduler
            .sleep(outcome, config.sleep_interval_secs());
        CycleReport {
            stages: self.stages,
            outcome,
            sleep_secs,
            config,
            saved,
            reading,
            delivery,
            faults: self.faults,
        }
    }
}
