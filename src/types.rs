use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known field names understood by the projector, enricher and reconciler.
pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const URL: &str = "url";
    pub const IMAGE: &str = "image";
    pub const PRICE: &str = "price";
    pub const PROMO_PRICE: &str = "promoPrice";
    pub const PRICE_TEXT: &str = "priceText";
    pub const PROMO_PRICE_TEXT: &str = "promoPriceText";
    pub const PRICE_FROM_JSONLD: &str = "priceFromJsonLd";
    pub const OFFER_PRICE: &str = "offerPrice";
    pub const OFFER_AVAILABILITY: &str = "offerAvailability";
    pub const IS_FULL: &str = "isFull";
    pub const FREE_SHIPPING: &str = "freeShipping";
    pub const COMES_TOMORROW: &str = "comesTomorrow";
    pub const BRAND: &str = "brand";
    pub const RATING: &str = "rating";
    pub const RATING_COUNT: &str = "ratingCount";
    pub const RAW_NODE_TEXT: &str = "rawNodeText";
}

/// One product as produced by a single extractor tier, before projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub name: Option<String>,
    pub url: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<f64>,
    pub rating_count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

impl FieldType {
    /// Value a freshly projected record holds for a field of this type.
    pub fn default_value(self) -> FieldValue {
        match self {
            FieldType::Boolean => FieldValue::Bool(false),
            FieldType::String | FieldType::Number => FieldValue::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
}

/// Ordered set of wanted output fields. Fixed for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSpec(pub Vec<FieldDef>);

impl FieldSpec {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Append a field; a repeated name replaces the earlier type in place.
    pub fn with(mut self, name: &str, kind: FieldType) -> Self {
        match self.0.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.kind = kind,
            None => self.0.push(FieldDef {
                name: name.to_string(),
                kind,
            }),
        }
        self
    }

    pub fn declares(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    pub fn kind_of(&self, name: &str) -> Option<FieldType> {
        self.0.iter().find(|f| f.name == name).map(|f| f.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for FieldSpec {
    fn default() -> Self {
        use fields::*;
        Self::empty()
            .with(ID, FieldType::String)
            .with(URL, FieldType::String)
            .with(IMAGE, FieldType::String)
            .with(PRICE, FieldType::Number)
            .with(PROMO_PRICE, FieldType::Number)
            .with(IS_FULL, FieldType::Boolean)
            .with(FREE_SHIPPING, FieldType::Boolean)
            .with(COMES_TOMORROW, FieldType::Boolean)
            .with(BRAND, FieldType::String)
            .with(RATING, FieldType::Number)
            .with(RATING_COUNT, FieldType::Number)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Coerce a value into the declared type so record shape stays uniform.
    pub fn conform(self, kind: FieldType) -> FieldValue {
        match (kind, self) {
            (FieldType::String, FieldValue::Text(s)) => FieldValue::Text(s),
            (FieldType::String, FieldValue::Number(n)) => FieldValue::Text(n.to_string()),
            (FieldType::String, FieldValue::Bool(b)) => FieldValue::Text(b.to_string()),
            (FieldType::Number, FieldValue::Number(n)) if n.is_finite() => FieldValue::Number(n),
            (FieldType::Number, FieldValue::Text(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map_or(FieldValue::Null, FieldValue::Number),
            (FieldType::Boolean, FieldValue::Bool(b)) => FieldValue::Bool(b),
            (FieldType::Boolean, _) => FieldValue::Bool(false),
            _ => FieldValue::Null,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Text(s) => serializer.serialize_str(s),
            // Counts and whole prices print as integers.
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

/// Canonical output unit. Holds exactly the fields of the [`FieldSpec`] it was
/// created from, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    values: Vec<(String, FieldType, FieldValue)>,
    /// Display name used as the output key; never serialized.
    pub display_name: Option<String>,
    /// URL of the item the record was projected from, used to find its card.
    pub source_url: Option<String>,
}

impl ProductRecord {
    pub fn new(spec: &FieldSpec) -> Self {
        Self {
            values: spec
                .iter()
                .map(|f| (f.name.clone(), f.kind, f.kind.default_value()))
                .collect(),
            display_name: None,
            source_url: None,
        }
    }

    pub fn declares(&self, name: &str) -> bool {
        self.values.iter().any(|(n, _, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, _, v)| v)
    }

    /// Store `value` under `name` if the field is declared. Returns whether it was.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> bool {
        match self.values.iter_mut().find(|(n, _, _)| n == name) {
            Some((_, kind, slot)) => {
                *slot = value.into().conform(*kind);
                true
            }
            None => false,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(FieldValue::as_bool).unwrap_or(false)
    }

    pub fn is_null(&self, name: &str) -> bool {
        self.get(name).map_or(true, FieldValue::is_null)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _, _)| n.as_str())
    }
}

impl Serialize for ProductRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, _, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Loosely-typed schema.org `Product` entry found in the page's JSON-LD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDataEntry {
    pub name: Option<String>,
    /// `url`, else `offers.url`, else `@id`.
    pub url: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    /// Top-level `price`, outside of `offers`.
    pub price: Option<f64>,
    pub offer_price: Option<f64>,
    pub offer_availability: Option<String>,
    pub rating: Option<f64>,
    pub rating_count: Option<f64>,
}

impl StructuredDataEntry {
    /// `offers.price`, falling back to a top-level `price`.
    pub fn best_price(&self) -> Option<f64> {
        self.offer_price.or(self.price)
    }
}

/// Mapping from display key to record. Later inserts replace earlier ones.
pub type OutputSet = BTreeMap<String, ProductRecord>;

/// Final JSON-serializable result of one run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOutput {
    pub term: String,
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub count: usize,
    pub products: OutputSet,
}
