mod wake;

pub use wake::run_wake_cycles;
