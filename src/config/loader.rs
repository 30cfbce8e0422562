//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for building a
//! [`TaxTableRegistry`] from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::registry::TaxTableRegistry;
use super::types::{RegistryMetadata, TaxTable};

const BUILTIN_REGISTRY: &str = include_str!("../../config/sars/registry.yaml");

const BUILTIN_TAX_YEARS: [(&str, &str); 3] = [
    (
        "tax_years/2024.yaml",
        include_str!("../../config/sars/tax_years/2024.yaml"),
    ),
    (
        "tax_years/2025.yaml",
        include_str!("../../config/sars/tax_years/2025.yaml"),
    ),
    (
        "tax_years/2026.yaml",
        include_str!("../../config/sars/tax_years/2026.yaml"),
    ),
];

/// Loads statutory tax tables.
///
/// # Directory Structure
///
/// A configuration directory has the following structure:
/// ```text
/// config/sars/
/// ├── registry.yaml        # Publisher metadata and default year
/// └── tax_years/
///     ├── 2024.yaml        # One table per tax year
///     ├── 2025.yaml
///     └── 2026.yaml
/// ```
///
/// The tables shipped under `config/sars` are also compiled into the crate
/// and available through [`ConfigLoader::builtin`].
///
/// # Example
///
/// ```no_run
/// use paye_engine::config::ConfigLoader;
///
/// let registry = ConfigLoader::load("./config/sars")?;
/// let table = registry.resolve(2026);
/// println!("Primary rebate for {}: R{}", table.label, table.primary_rebate);
/// # Ok::<(), paye_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a registry from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/sars")
    ///
    /// # Returns
    ///
    /// Returns a `TaxTableRegistry` on success, or an error if:
    /// - `registry.yaml` or the `tax_years` directory is missing
    /// - Any file contains invalid YAML
    /// - Any table breaks the structural rules checked by [`TaxTable::validate`]
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<TaxTableRegistry> {
        let path = path.as_ref();

        let registry_path = path.join("registry.yaml");
        let metadata = Self::load_yaml::<RegistryMetadata>(&registry_path)?;

        let tax_years_dir = path.join("tax_years");
        let tables = Self::load_tax_years(&tax_years_dir)?;

        debug!(
            path = %path.display(),
            tables = tables.len(),
            default_year = metadata.default_year,
            "Loaded tax table configuration"
        );

        TaxTableRegistry::new(metadata, tables)
    }

    /// Builds the registry from the tables compiled into the crate.
    ///
    /// # Example
    ///
    /// ```
    /// use paye_engine::config::ConfigLoader;
    ///
    /// let registry = ConfigLoader::builtin()?;
    /// assert_eq!(registry.default_year(), 2026);
    /// # Ok::<(), paye_engine::error::EngineError>(())
    /// ```
    pub fn builtin() -> EngineResult<TaxTableRegistry> {
        let metadata = Self::parse_yaml::<RegistryMetadata>("registry.yaml", BUILTIN_REGISTRY)?;
        let tables = BUILTIN_TAX_YEARS
            .iter()
            .map(|(name, content)| Self::parse_yaml::<TaxTable>(name, content))
            .collect::<EngineResult<Vec<_>>>()?;

        TaxTableRegistry::new(metadata, tables)
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&path_str, &content)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(path: &str, content: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Loads every table from the tax years directory.
    fn load_tax_years(tax_years_dir: &Path) -> EngineResult<Vec<TaxTable>> {
        let dir_str = tax_years_dir.display().to_string();

        if !tax_years_dir.exists() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(tax_years_dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                tables.push(Self::load_yaml::<TaxTable>(&path)?);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tax year files found)", dir_str),
            });
        }

        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/sars"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let registry = result.unwrap();
        assert_eq!(registry.default_year(), 2026);
        assert_eq!(registry.available_tax_years().len(), 3);
    }

    #[test]
    fn test_directory_and_builtin_tables_agree() {
        let from_disk = ConfigLoader::load(config_path()).unwrap();
        let builtin = ConfigLoader::builtin().unwrap();

        let disk_tables: Vec<_> = from_disk.tables().collect();
        let builtin_tables: Vec<_> = builtin.tables().collect();
        assert_eq!(disk_tables, builtin_tables);
    }

    #[test]
    fn test_metadata_loaded_correctly() {
        let registry = ConfigLoader::builtin().unwrap();
        let metadata = registry.metadata();

        assert!(metadata.name.contains("South African Revenue Service"));
        assert!(metadata.source_url.starts_with("https://www.sars.gov.za/"));
        assert_eq!(metadata.default_year, 2026);
    }

    #[test]
    fn test_2026_table_values() {
        let registry = ConfigLoader::builtin().unwrap();
        let table = registry.resolve(2026);

        assert_eq!(table.label, "2026/2027");
        assert_eq!(table.primary_rebate, dec("17235"));
        assert_eq!(table.secondary_rebate, dec("9444"));
        assert_eq!(table.tertiary_rebate, dec("3145"));
        assert_eq!(table.medical_aid_credit.main_member, dec("364"));
        assert_eq!(table.medical_aid_credit.first_dependent, dec("364"));
        assert_eq!(table.medical_aid_credit.additional_dependents, dec("246"));
        assert_eq!(table.uif_cap, dec("177.12"));
        assert_eq!(table.uif_rate, dec("0.01"));
        assert_eq!(table.sdl_rate, dec("0.01"));

        assert_eq!(table.brackets.len(), 6);
        assert_eq!(table.brackets[1].min, dec("255001"));
        assert_eq!(table.brackets[1].cumulative_base, dec("45900"));
        assert_eq!(table.brackets[5].min, dec("922601"));
        assert_eq!(table.brackets[5].max, None);
        assert_eq!(table.brackets[5].rate, dec("0.45"));
        assert_eq!(table.brackets[5].cumulative_base, dec("270145"));
    }

    #[test]
    fn test_each_year_has_its_own_brackets() {
        let registry = ConfigLoader::builtin().unwrap();

        assert_eq!(registry.resolve(2024).brackets[0].max, Some(dec("237100")));
        assert_eq!(registry.resolve(2025).brackets[0].max, Some(dec("246000")));
        assert_eq!(registry.resolve(2026).brackets[0].max, Some(dec("255000")));
        assert_eq!(
            registry.resolve(2024).brackets[5].cumulative_base,
            dec("251258")
        );
        assert_eq!(
            registry.resolve(2025).brackets[5].cumulative_base,
            dec("260381")
        );
    }

    #[test]
    fn test_shipped_brackets_are_contiguous_and_open_ended() {
        let registry = ConfigLoader::builtin().unwrap();

        for table in registry.tables() {
            for pair in table.brackets.windows(2) {
                assert_eq!(pair[0].max.unwrap() + Decimal::ONE, pair[1].min);
            }
            assert_eq!(table.brackets[0].min, Decimal::ZERO);
            assert!(table.brackets.last().unwrap().max.is_none());
        }
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("registry.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_parse_error_reports_path() {
        let result = ConfigLoader::parse_yaml::<TaxTable>("tax_years/bad.yaml", "year: [oops");
        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert_eq!(path, "tax_years/bad.yaml");
            }
            _ => panic!("Expected ConfigParseError"),
        }
    }
}
