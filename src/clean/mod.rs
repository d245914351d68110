pub mod catalog;
pub mod cleaner;

pub use catalog::{build_rules, CleanProfile, TerminAttrSettings};
pub use cleaner::{
    clean_configs, BasicConfigCleaner, CleanSummary, ConfigCleaner, ConfigCleanerConfig,
};
