use std::str::FromStr;
use std::thread;
use std::time::Duration;

use crate::helpers::run_command;

/// Platform low-power suspend. On the device the call ends the process
/// lifetime; execution resumes from a cold boot.
pub trait DeepSleep {
    fn deep_sleep(&mut self, duration: Duration);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuspendMode {
    /// Suspend to RAM with an RTC wake alarm
    RtcWake,
    /// Block the process for the duration
    Sleep,
    /// Log the decision only
    Log,
}

impl FromStr for SuspendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rtcwake" => Ok(SuspendMode::RtcWake),
            "sleep" => Ok(SuspendMode::Sleep),
            "log" => Ok(SuspendMode::Log),
            other => Err(format!(
                "unknown suspend mode '{other}', expected one of 'rtcwake', 'sleep', 'log'"
            )),
        }
    }
}

pub struct HostSuspend {
    mode: SuspendMode,
}

impl HostSuspend {
    const RTCWAKE_CMD: &'static str = "rtcwake";

    pub fn new(mode: SuspendMode) -> Self {
        HostSuspend { mode }
    }
}

impl DeepSleep for HostSuspend {
    fn deep_sleep(&mut self, duration: Duration) {
        let secs = duration.as_secs();
        match self.mode {
            SuspendMode::RtcWake => {
                log::info!("Suspending to RAM for {}s", secs);
                let secs_arg = secs.to_string();
                if let Err(e) = run_command(Self::RTCWAKE_CMD, &["-m", "mem", "-s", &secs_arg], &[]) {
                    log::error!("rtcwake failed ({}); idling for {}s instead", e, secs);
                    thread::sleep(duration);
                }
            }
            SuspendMode::Sleep => {
                log::info!("Sleeping for {}s", secs);
                thread::sleep(duration);
            }
            SuspendMode::Log => log::info!("Deep sleep requested for {}s", secs),
        }
    }
}
