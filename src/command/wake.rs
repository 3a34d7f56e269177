use anyhow::Result;

use snode::helpers::BootClock;
use snode::host;
use snode::node::BootSequencer;
use snode::settings::Settings;

/// Run wake cycles back to back, each from a fresh context as after a cold
/// boot. With `once`, stop after the first suspend returns.
pub fn run_wake_cycles(once: bool) -> Result<()> {
    let settings = Settings::from_env()?;
    log::debug!("Settings: {:?}", settings);

    loop {
        let clock = BootClock::start();
        let report = BootSequencer::new(host::boot_context(&settings, clock)).run();
        log::info!(
            "Wake cycle finished in {} ms: {:?}, slept {}s, config saved: {}, faults: {}",
            clock.millis(),
            report.outcome,
            report.sleep_secs,
            report.saved,
            report.faults.len()
        );
        if once {
            return Ok(());
        }
    }
}
