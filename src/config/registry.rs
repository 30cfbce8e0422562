//! Year-keyed lookup of statutory tax tables.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{EngineError, EngineResult};

use super::types::{RegistryMetadata, TaxTable, TaxYearOption, YearKey};

/// An immutable store of tax tables keyed by the year the tax year starts in.
///
/// The registry is built once at startup and only read afterwards, so it can
/// be shared freely between threads.
///
/// # Example
///
/// ```
/// use paye_engine::config::ConfigLoader;
///
/// let registry = ConfigLoader::builtin()?;
/// assert_eq!(registry.resolve(2025).label, "2025/2026");
///
/// // Unknown years fall back to the default year instead of failing.
/// assert_eq!(registry.resolve(1999).year, registry.default_year());
/// # Ok::<(), paye_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TaxTableRegistry {
    metadata: RegistryMetadata,
    tables: BTreeMap<i32, TaxTable>,
}

impl TaxTableRegistry {
    /// Creates a registry from its metadata and tables.
    ///
    /// Every table is validated, years must be unique, and the default year
    /// must be one of the registered years.
    pub fn new(metadata: RegistryMetadata, tables: Vec<TaxTable>) -> EngineResult<Self> {
        let mut by_year = BTreeMap::new();
        for table in tables {
            table.validate()?;
            let year = table.year;
            if by_year.insert(year, table).is_some() {
                return Err(EngineError::InvalidTaxTable {
                    year,
                    message: "year is registered more than once".to_string(),
                });
            }
        }

        if !by_year.contains_key(&metadata.default_year) {
            return Err(EngineError::InvalidTaxTable {
                year: metadata.default_year,
                message: "default year has no table".to_string(),
            });
        }

        Ok(Self {
            metadata,
            tables: by_year,
        })
    }

    /// Returns the registry metadata.
    pub fn metadata(&self) -> &RegistryMetadata {
        &self.metadata
    }

    /// Returns the year used when a requested year is not registered.
    pub fn default_year(&self) -> i32 {
        self.metadata.default_year
    }

    /// Returns the table for the default year.
    pub fn default_table(&self) -> &TaxTable {
        // `new` guarantees the default year is present.
        &self.tables[&self.metadata.default_year]
    }

    /// Looks up a table without falling back.
    pub fn get(&self, key: impl Into<YearKey>) -> Option<&TaxTable> {
        key.into().year().and_then(|year| self.tables.get(&year))
    }

    /// Returns true if a table is registered under the key.
    pub fn contains(&self, key: impl Into<YearKey>) -> bool {
        self.get(key).is_some()
    }

    /// Resolves a table, falling back to the default year for unknown keys.
    ///
    /// The fallback is logged at `warn` level and is never an error.
    pub fn resolve(&self, key: impl Into<YearKey>) -> &TaxTable {
        let key = key.into();
        match key.year().and_then(|year| self.tables.get(&year)) {
            Some(table) => table,
            None => {
                warn!(
                    requested = %key,
                    default_year = self.metadata.default_year,
                    "Tax table not found, falling back to default year"
                );
                self.default_table()
            }
        }
    }

    /// Lists the registered tax years in ascending order.
    pub fn available_tax_years(&self) -> Vec<TaxYearOption> {
        self.tables
            .values()
            .map(|table| TaxYearOption {
                value: table.year,
                label: table.label.clone(),
            })
            .collect()
    }

    /// Iterates over the registered tables in ascending year order.
    pub fn tables(&self) -> impl Iterator<Item = &TaxTable> {
        self.tables.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;

    fn registry() -> TaxTableRegistry {
        ConfigLoader::builtin().unwrap()
    }

    #[test]
    fn test_resolve_registered_years() {
        let registry = registry();
        assert_eq!(registry.resolve(2024).label, "2024/2025");
        assert_eq!(registry.resolve(2025).label, "2025/2026");
        assert_eq!(registry.resolve(2026).label, "2026/2027");
    }

    #[test]
    fn test_resolve_accepts_string_keys() {
        let registry = registry();
        assert_eq!(registry.resolve("2024").year, 2024);
        assert_eq!(registry.resolve(" 2025 ").year, 2025);
        assert_eq!(registry.resolve("2026".to_string()).year, 2026);
    }

    #[test]
    fn test_unknown_year_falls_back_to_default() {
        let registry = registry();
        assert_eq!(registry.resolve(1999), registry.resolve(2026));
        assert_eq!(registry.resolve("not a year").year, 2026);
    }

    #[test]
    fn test_get_does_not_fall_back() {
        let registry = registry();
        assert!(registry.get(1999).is_none());
        assert!(registry.get("2025").is_some());
        assert!(registry.contains(2024));
        assert!(!registry.contains("abc"));
    }

    #[test]
    fn test_available_tax_years_are_ascending() {
        let years = registry().available_tax_years();
        assert_eq!(
            years,
            vec![
                TaxYearOption {
                    value: 2024,
                    label: "2024/2025".to_string()
                },
                TaxYearOption {
                    value: 2025,
                    label: "2025/2026".to_string()
                },
                TaxYearOption {
                    value: 2026,
                    label: "2026/2027".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_default_year_must_be_registered() {
        let registry = registry();
        let mut metadata = registry.metadata().clone();
        metadata.default_year = 2030;
        let tables: Vec<TaxTable> = registry.tables().cloned().collect();

        match TaxTableRegistry::new(metadata, tables) {
            Err(EngineError::InvalidTaxTable { year, message }) => {
                assert_eq!(year, 2030);
                assert!(message.contains("default year"));
            }
            other => panic!("Expected InvalidTaxTable, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_years_are_rejected() {
        let registry = registry();
        let table = registry.resolve(2026).clone();
        let result = TaxTableRegistry::new(
            registry.metadata().clone(),
            vec![table.clone(), table],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TaxTableRegistry>();
    }
}
