//! Extract Tools
//!
//! The three raw-item tiers: structured data, embedded application state and
//! rendered result cards. Each returns items in page order; items that cannot
//! be built are dropped without affecting their neighbours.

mod tests;
pub mod types;
mod utils;

pub use types::*;
use utils::*;

pub(crate) use utils::image_source;

use crate::config::Marketplace;
use crate::page::Page;
use crate::selectors::RESULT_CARD_SELECTOR;
use crate::tools::clean::ProductIdPattern;
use crate::types::{RawItem, StructuredDataEntry};
use serde_json::Value;
use tracing::debug;

/// Raw items from structured-data entries.
///
/// Only the offer price is carried over; a top-level `price` is left to the
/// reconciler.
pub fn extract_jsonld_items(entries: &[StructuredDataEntry]) -> Vec<RawItem> {
    entries
        .iter()
        .map(|e| RawItem {
            name: e.name.clone(),
            url: e.url.clone(),
            price: e.offer_price,
            image: e.image.clone(),
            ..Default::default()
        })
        .collect()
}

/// Raw items from the `"results": [...]` array embedded in inline scripts.
///
/// Scripts and marker occurrences are tried in page order; the first array
/// that parses and holds a titled card is the only one used. Cards without a
/// product identifier in their URL are rejected.
pub fn extract_state_items(
    page: &Page,
    market: &Marketplace,
    ids: &ProductIdPattern,
) -> Vec<RawItem> {
    for script in page.script_bodies() {
        for slice in find_results_arrays(&script) {
            let results = match serde_json::from_str::<Vec<Value>>(slice) {
                Ok(results) => results,
                Err(e) => {
                    debug!(error = %e, "skipping unparsable results array");
                    continue;
                }
            };

            let cards = titled_polycards(results);
            if cards.is_empty() {
                continue;
            }

            let items: Vec<RawItem> = cards
                .into_iter()
                .filter_map(|card| match state_item(card, market, ids) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        debug!(error = %e, "dropping state card");
                        None
                    }
                })
                .collect();
            debug!(count = items.len(), "embedded state items");
            return items;
        }
    }

    debug!("no embedded results array with titled cards");
    Vec::new()
}

/// Raw items from the rendered result cards.
///
/// Each card needs a link whose canonical URL carries a product identifier.
/// Prices are left empty here; the enricher reads them from the card.
pub fn extract_card_items(
    page: &Page,
    market: &Marketplace,
    ids: &ProductIdPattern,
) -> Vec<RawItem> {
    let items: Vec<RawItem> = page
        .select(&RESULT_CARD_SELECTOR)
        .enumerate()
        .filter_map(|(idx, card)| match card_item(page, idx, card, market, ids) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!(card = idx, error = %e, "dropping result card");
                None
            }
        })
        .collect();

    debug!(count = items.len(), "result card items");
    items
}
