//! Reconcile Tools
//!
//! The last three stages of a run: the identifier gate, the merge with
//! structured data, and the fold into the keyed output set.

mod utils;

use utils::*;

use crate::tools::clean::ProductIdPattern;
use crate::types::{fields, OutputSet, ProductRecord, StructuredDataEntry};
use std::collections::HashMap;
use tracing::debug;

/// Keep only records carrying a complete product identifier.
pub fn filter_valid_ids(records: Vec<ProductRecord>, ids: &ProductIdPattern) -> Vec<ProductRecord> {
    let before = records.len();
    let kept: Vec<ProductRecord> = records
        .into_iter()
        .filter(|record| record_id(record, ids).is_some_and(|id| ids.is_valid(&id)))
        .collect();
    debug!(before, after = kept.len(), "filtered records by identifier");
    kept
}

/// Structured-data entries keyed by identifier (or last path segment) and by URL.
pub struct StructuredIndex<'a> {
    entries: &'a [StructuredDataEntry],
    by_key: HashMap<String, &'a StructuredDataEntry>,
}

impl<'a> StructuredIndex<'a> {
    /// Later entries shadow earlier ones under the same key.
    pub fn new(entries: &'a [StructuredDataEntry], ids: &ProductIdPattern) -> Self {
        let mut by_key = HashMap::new();
        for entry in entries {
            let Some(url) = entry.url.as_deref().filter(|u| !u.is_empty()) else {
                continue;
            };
            if let Some(key) = entry_key(url, ids) {
                by_key.insert(key, entry);
            }
            by_key.insert(url.to_string(), entry);
        }
        Self { entries, by_key }
    }

    /// Entry for a record: by identifier, else by URL, else by exact name.
    pub fn lookup(
        &self,
        record: &ProductRecord,
        ids: &ProductIdPattern,
    ) -> Option<&'a StructuredDataEntry> {
        record_id(record, ids)
            .and_then(|id| self.by_key.get(&id).copied())
            .or_else(|| record_url(record).and_then(|url| self.by_key.get(url).copied()))
            .or_else(|| {
                let name = record_name(record)?;
                self.entries
                    .iter()
                    .find(|e| e.name.as_deref() == Some(name))
            })
    }
}

/// Merge one structured-data entry into a record.
///
/// Brand and rating fields are overwritten. The base price is only filled
/// when missing; otherwise the structured price lands in `priceFromJsonLd`.
pub fn apply_entry(record: &mut ProductRecord, entry: &StructuredDataEntry) {
    record.set(fields::BRAND, entry.brand.clone());
    record.set(fields::RATING, entry.rating);
    record.set(fields::RATING_COUNT, entry.rating_count);

    record.set(fields::OFFER_PRICE, entry.offer_price);
    record.set(fields::OFFER_AVAILABILITY, entry.offer_availability.clone());

    if let Some(price) = entry.best_price() {
        if record.declares(fields::PRICE) && record.is_null(fields::PRICE) {
            record.set(fields::PRICE, price);
        } else {
            record.set(fields::PRICE_FROM_JSONLD, price);
        }
    }
}

/// Merge structured data into every record that has a matching entry.
pub fn reconcile(
    records: &mut [ProductRecord],
    entries: &[StructuredDataEntry],
    ids: &ProductIdPattern,
) {
    if entries.is_empty() {
        return;
    }
    let index = StructuredIndex::new(entries, ids);
    let mut matched = 0usize;
    for record in records.iter_mut() {
        if let Some(entry) = index.lookup(record, ids) {
            apply_entry(record, entry);
            matched += 1;
        }
    }
    debug!(matched, records = records.len(), "reconciled with structured data");
}

/// Fold records into the output set keyed by display name, falling back to
/// the identifier. A later record replaces an earlier one with the same key.
pub fn collect(records: Vec<ProductRecord>) -> OutputSet {
    let mut out = OutputSet::new();
    for record in records {
        let key = display_key(&record);
        if out.insert(key.clone(), record).is_some() {
            debug!(key = %key, "replaced record with duplicate key");
        }
    }
    out
}
