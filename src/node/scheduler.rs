use std::time::Duration;

use crate::interfaces::DeepSleep;

use super::models::WakeOutcome;

/// Full interval after a completed cycle; half of it when provisioning timed
/// out so an operator gets another portal sooner. Never zero.
pub fn next_sleep_secs(outcome: WakeOutcome, configured_interval: u32) -> u32 {
    match outcome {
        WakeOutcome::ProvisionTimedOut => (configured_interval / 2).max(1),
        WakeOutcome::Completed => configured_interval.max(1),
    }
}

pub struct PowerScheduler {
    suspend: Box<dyn DeepSleep>,
}

impl PowerScheduler {
    pub fn new(suspend: Box<dyn DeepSleep>) -> Self {
        PowerScheduler { suspend }
    }

    /// Hand the node to the platform suspend. Consumes the scheduler: nothing
    /// runs after this within the cycle.
    pub fn sleep(mut self, outcome: WakeOutcome, configured_interval: u32) -> u32 {
        let secs = next_sleep_secs(outcome, configured_interval);
        log::info!("Wake outcome {:?}; going to deep sleep for {}s", outcome, secs);
        self.suspend.deep_sleep(Duration::from_secs(u64::from(secs)));
        secs
    }
}
