//! Statutory tax table configuration.
//!
//! This module loads SARS tax tables from YAML files (or from the copies
//! compiled into the crate) and exposes them through a year-keyed registry
//! that falls back to the default year for unknown keys.
//!
//! # Example
//!
//! ```no_run
//! use paye_engine::config::ConfigLoader;
//!
//! let registry = ConfigLoader::load("./config/sars").unwrap();
//! println!("Default tax year: {}", registry.default_table().label);
//! ```

mod loader;
mod registry;
mod types;

pub use loader::ConfigLoader;
pub use registry::TaxTableRegistry;
pub use types::{
    MedicalAidCredits, RegistryMetadata, TaxBracket, TaxTable, TaxYearOption, YearKey,
};
