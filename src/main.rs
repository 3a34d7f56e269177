mod command;

use anyhow::{anyhow, Result};
use env_logger::Env;

use snode::constants::{defaults, envvars};
use snode::helpers::load_dotenv;

const FLAG_ONCE: &str = "--once";

fn main() -> Result<()> {
    load_dotenv();
    env_logger::Builder::from_env(Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL))
        .init();

    let mut args = pico_args::Arguments::from_env();
    let once = args.contains(FLAG_ONCE);
    let remaining = args.finish();
    if !remaining.is_empty() {
        return Err(anyhow!(
            "Unexpected arguments {:?}; usage: snode [{}]",
            remaining,
            FLAG_ONCE
        ));
    }

    command::run_wake_cycles(once)
}
