pub mod clean;
pub mod config;
pub mod errors;
pub mod host_interfaces;
pub mod inventory;
pub mod logger;
pub mod parse_output;
pub mod utils;

pub use clean::{clean_configs, CleanProfile, ConfigCleanerConfig};
pub use config::ToolkitConfig;
pub use errors::ToolkitError;
