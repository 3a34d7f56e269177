pub mod constants;
pub mod helpers;
pub mod host;
pub mod interfaces;
pub mod node;
pub mod settings;
