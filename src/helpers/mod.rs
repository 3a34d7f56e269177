mod clock;
mod commands;
mod load_dotenv;

pub use clock::BootClock;
pub use commands::run_command;
pub use load_dotenv::load_dotenv;

pub mod base_path;
