pub mod cli;
pub mod config;
pub mod inputs;
pub mod output;
pub mod progress;

pub use cli::{Cli, Commands, ConfigCommands};
pub use config::{flag_or, Config};
pub use inputs::resolve_inputs;
pub use output::OutputFormatter;
pub use progress::ProgressReporter;
