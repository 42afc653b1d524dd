//! Project Tools
//!
//! Turns raw extractor items into records shaped by the field specification.

mod tests;

use crate::tools::clean::ProductIdPattern;
use crate::types::{fields, FieldSpec, ProductRecord, RawItem};

/// Identifier given to items whose URL carries none.
pub fn placeholder_id(position: usize) -> String {
    format!("item-{}", position + 1)
}

/// Whether `id` was produced by [`placeholder_id`].
pub fn is_placeholder_id(id: &str) -> bool {
    id.strip_prefix("item-")
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Project one item. `position` is its zero-based index in the tier output.
///
/// Declared fields start at their defaults and take the item's value when it
/// has one. Undeclared item values are dropped.
pub fn project_item(
    position: usize,
    item: &RawItem,
    spec: &FieldSpec,
    ids: &ProductIdPattern,
) -> ProductRecord {
    let mut record = ProductRecord::new(spec);

    if let Some(name) = &item.name {
        record.set(fields::NAME, name.as_str());
    }
    if let Some(url) = &item.url {
        record.set(fields::URL, url.as_str());
    }
    if let Some(price) = item.price {
        record.set(fields::PRICE, price);
    }
    if let Some(image) = &item.image {
        record.set(fields::IMAGE, image.as_str());
    }
    if let Some(brand) = &item.brand {
        record.set(fields::BRAND, brand.as_str());
    }
    if let Some(rating) = item.rating {
        record.set(fields::RATING, rating);
    }
    if let Some(count) = item.rating_count {
        record.set(fields::RATING_COUNT, count);
    }

    let id = item
        .url
        .as_deref()
        .and_then(|url| ids.derive(url))
        .unwrap_or_else(|| placeholder_id(position));
    record.set(fields::ID, id);

    record.display_name = item.name.clone();
    record.source_url = item.url.clone();
    record
}

/// Project every item, preserving order.
pub fn project(items: &[RawItem], spec: &FieldSpec, ids: &ProductIdPattern) -> Vec<ProductRecord> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| project_item(idx, item, spec, ids))
        .collect()
}
