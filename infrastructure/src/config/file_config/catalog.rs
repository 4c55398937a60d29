//! Test price overrides from TOML (`[catalog]` section)

use dxo_domain::TestCatalog;
use dxo_domain::deliberation::catalog::DEFAULT_FALLBACK_COST;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ```toml
/// [catalog]
/// fallback_cost = 750
///
/// [catalog.tests]
/// cbc = 250
/// dengue_ns1 = 600
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// Cost of any test id the catalog does not list
    pub fallback_cost: u32,
    /// Extra or overriding entries, appended after the built-in ones
    pub tests: BTreeMap<String, u32>,
}

impl Default for FileCatalogConfig {
    fn default() -> Self {
        Self {
            fallback_cost: DEFAULT_FALLBACK_COST,
            tests: BTreeMap::new(),
        }
    }
}

impl FileCatalogConfig {
    pub fn to_catalog(&self) -> TestCatalog {
        self.tests.iter().fold(
            TestCatalog::default().with_fallback_cost(self.fallback_cost),
            |catalog, (id, cost)| catalog.with_test(id.trim(), *cost),
        )
    }
}
