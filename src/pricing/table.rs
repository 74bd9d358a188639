use crate::pricing::models::PricingEntry;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Immutable rate card, keyed by model identifier
///
/// Built once at startup from configuration and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct PricingTable {
    effective_date: NaiveDate,
    entries: HashMap<String, PricingEntry>,
}

impl PricingTable {
    /// Build a table; later entries with the same model id replace earlier ones
    pub fn new(effective_date: NaiveDate, entries: impl IntoIterator<Item = PricingEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.model_id.clone(), entry))
            .collect();

        Self {
            effective_date,
            entries,
        }
    }

    /// Gemini rates as published in February 2025
    pub fn builtin() -> Self {
        Self::new(builtin_effective_date(), builtin_entries())
    }

    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    /// Get pricing for a specific model
    pub fn get(&self, model: &str) -> Option<&PricingEntry> {
        self.entries.get(model)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.entries.contains_key(model)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries ordered by model id
    pub fn entries(&self) -> Vec<&PricingEntry> {
        let mut entries: Vec<&PricingEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.model_id.cmp(&b.model_id));
        entries
    }
}

pub(crate) fn builtin_effective_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 1).unwrap_or_default()
}

pub(crate) fn builtin_entries() -> Vec<PricingEntry> {
    vec![
        PricingEntry::new("gemini-1.5-flash", 0.000018, 0.000036),
        PricingEntry::new("gemini-1.5-pro", 0.00125, 0.005),
    ]
}
