use serde_json::Value;

use crate::types::StructuredDataEntry;

const PRODUCT_TYPE: &str = "Product";

/// Expand top-level arrays and `@graph` containers into individual objects.
pub(super) fn flatten_jsonld(value: Value) -> Vec<Value> {
    match value {
        Value::Array(arr) => arr.into_iter().flat_map(flatten_jsonld).collect(),
        Value::Object(mut obj) => {
            if let Some(Value::Array(arr)) = obj.remove("@graph") {
                return arr.into_iter().flat_map(flatten_jsonld).collect();
            }
            vec![Value::Object(obj)]
        }
        _ => Vec::new(),
    }
}

/// `@type` is `Product`, either as a string or inside an array.
pub(super) fn is_product(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(s)) => s == PRODUCT_TYPE,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(PRODUCT_TYPE)),
        _ => false,
    }
}

/// Number that may be encoded as a JSON number or a numeric string.
pub(super) fn lenient_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Non-empty string, also accepting numbers (`"ratingCount": 12`).
fn lenient_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First usable string from a string, an array, or an object with `url`/`name`.
fn first_text(value: Option<&Value>, object_key: &str) -> Option<String> {
    match value? {
        Value::Array(items) => items.iter().find_map(|v| first_text(Some(v), object_key)),
        Value::Object(obj) => lenient_string(obj.get(object_key)),
        other => lenient_string(Some(other)),
    }
}

/// `offers` may be one object or a list; the first offer wins.
fn first_offer(value: &Value) -> Option<&Value> {
    match value.get("offers")? {
        Value::Array(offers) => offers.first(),
        offer @ Value::Object(_) => Some(offer),
        _ => None,
    }
}

pub(super) fn entry_from_value(value: &Value) -> StructuredDataEntry {
    let offer = first_offer(value);
    let rating = value.get("aggregateRating");

    let url = lenient_string(value.get("url"))
        .or_else(|| offer.and_then(|o| lenient_string(o.get("url"))))
        .or_else(|| lenient_string(value.get("@id")));

    StructuredDataEntry {
        name: lenient_string(value.get("name")),
        url,
        image: first_text(value.get("image"), "url"),
        brand: first_text(value.get("brand"), "name"),
        price: lenient_number(value.get("price")),
        offer_price: offer.and_then(|o| lenient_number(o.get("price"))),
        offer_availability: offer.and_then(|o| lenient_string(o.get("availability"))),
        rating: rating.and_then(|r| lenient_number(r.get("ratingValue"))),
        rating_count: rating.and_then(|r| {
            lenient_number(r.get("ratingCount")).or_else(|| lenient_number(r.get("reviewCount")))
        }),
    }
}
