use std::io;
use std::process::{Command, Output};

/// Run `program` with `args` and extra environment, logging the outcome.
///
/// A non-zero exit status is turned into an error carrying stderr.
pub fn run_command(program: &str, args: &[&str], envs: &[(&str, &str)]) -> io::Result<Output> {
    log::debug!("Running command: {} {}", program, args.join(" "));
    let output = Command::new(program)
        .args(args)
        .envs(envs.iter().copied())
        .output()?;

    if !output.status.success() {
        let message = format!(
            "{} returned {}; stderr: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim_end()
        );
        log::warn!("{}", message);
        return Err(io::Error::other(message));
    }
    log::trace!(
        "Command {} stdout: {}",
        program,
        String::from_utf8_lossy(&output.stdout)
    );
    Ok(output)
}
