//! Test price catalog

use serde::{Deserialize, Serialize};

/// Cost charged for a test id that is not in the catalog
pub const DEFAULT_FALLBACK_COST: u32 = 500;

const DEFAULT_TESTS: &[(&str, u32)] = &[
    // Blood tests
    ("cbc", 200),
    ("complete_blood_count", 200),
    ("hemoglobin", 100),
    ("esr", 150),
    ("crp", 400),
    ("liver_function_test", 600),
    ("kidney_function_test", 500),
    ("lipid_profile", 500),
    ("thyroid_profile", 800),
    ("hba1c", 400),
    ("blood_sugar_fasting", 100),
    ("blood_sugar_pp", 100),
    // Imaging
    ("chest_xray", 300),
    ("ultrasound_abdomen", 800),
    ("ct_scan", 3000),
    ("mri_brain", 5000),
    ("ecg", 150),
    ("echo", 2000),
    // Specialized
    ("troponin", 1500),
    ("d_dimer", 1200),
    ("tumor_markers", 3000),
    ("autoimmune_panel", 5000),
    // Procedures
    ("endoscopy", 3000),
    ("colonoscopy", 5000),
    ("biopsy", 2000),
];

/// Static mapping from test id to a fixed cost
///
/// Entries keep their declaration order, which is also the order in which
/// [`TestCatalog::extract_tests`] reports matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCatalog {
    entries: Vec<(String, u32)>,
    fallback_cost: u32,
}

impl Default for TestCatalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TESTS
                .iter()
                .map(|(id, cost)| (id.to_string(), *cost))
                .collect(),
            fallback_cost: DEFAULT_FALLBACK_COST,
        }
    }
}

impl TestCatalog {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            fallback_cost: DEFAULT_FALLBACK_COST,
        }
    }

    /// Add a test, or replace the cost of an existing one
    pub fn with_test(mut self, id: impl Into<String>, cost: u32) -> Self {
        let id = id.into().to_lowercase();
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = cost,
            None => self.entries.push((id, cost)),
        }
        self
    }

    pub fn with_fallback_cost(mut self, cost: u32) -> Self {
        self.fallback_cost = cost;
        self
    }

    /// Known cost of a test, or the fallback cost for unknown ids
    pub fn cost_of(&self, test_id: &str) -> u32 {
        self.lookup(test_id).unwrap_or(self.fallback_cost)
    }

    pub fn lookup(&self, test_id: &str) -> Option<u32> {
        let id = test_id.to_lowercase();
        self.entries
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, cost)| *cost)
    }

    pub fn fallback_cost(&self) -> u32 {
        self.fallback_cost
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find catalog tests mentioned in free text, at most `limit`.
    ///
    /// Matching is plain containment on lowercased text with underscores read
    /// as spaces on both sides, so `chest_xray`, `Chest Xray` and `chest xray`
    /// all match the `chest_xray` entry.
    pub fn extract_tests(&self, text: &str, limit: usize) -> Vec<String> {
        let haystack = text.to_lowercase().replace('_', " ");
        self.entries
            .iter()
            .filter(|(id, _)| haystack.contains(&id.replace('_', " ")))
            .map(|(id, _)| id.clone())
            .take(limit)
            .collect()
    }
}
