//! Scrape Tools
//!
//! Structured-data (JSON-LD) extraction from a page snapshot.

mod utils;

use utils::*;

use crate::page::Page;
use crate::types::StructuredDataEntry;
use serde_json::Value;
use tracing::{debug, warn};

/// Locate the first JSON-LD block describing a `Product`.
///
/// A block qualifies when it is itself a `Product` or when its `@graph`
/// contains one. Blocks that fail to parse are skipped.
pub fn scrape_product_jsonld(page: &Page) -> Option<String> {
    for (idx, body) in page.jsonld_bodies().into_iter().enumerate() {
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => {
                if flatten_jsonld(value).iter().any(is_product) {
                    debug!(block = idx, "found product JSON-LD");
                    return Some(body);
                }
            }
            Err(e) => debug!(block = idx, error = %e, "skipping unparsable JSON-LD block"),
        }
    }
    debug!("no product JSON-LD on page");
    None
}

/// Parse a structured-data payload into its `Product` entries.
///
/// A missing or malformed payload yields an empty list; a parse failure is
/// logged and otherwise ignored.
pub fn scrape_structured_data(text: Option<&str>) -> Vec<StructuredDataEntry> {
    let Some(text) = text else {
        return Vec::new();
    };
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "failed to parse JSON-LD payload");
            return Vec::new();
        }
    };

    flatten_jsonld(value)
        .iter()
        .filter(|v| is_product(v))
        .map(entry_from_value)
        .collect()
}

/// Structured-data entries of a page: locate, then parse.
pub fn scrape_products(page: &Page) -> Vec<StructuredDataEntry> {
    let text = scrape_product_jsonld(page);
    scrape_structured_data(text.as_deref())
}
