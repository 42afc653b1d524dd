//! Shapes of the result cards embedded in the page's application state.
//!
//! Every field is optional and a field of the wrong shape reads as absent;
//! cards only need a non-empty `primary_title` to be considered at all.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Deserialize `T`, falling back to `None` when the value has another shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Polycard {
    #[serde(deserialize_with = "lenient")]
    pub primary_title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub metadata: Option<CardMetadata>,
    #[serde(deserialize_with = "lenient")]
    pub pictures: Option<CardPictures>,
    #[serde(deserialize_with = "lenient")]
    pub prices: Option<CardPrices>,
    #[serde(deserialize_with = "lenient")]
    pub attributes: Option<Vec<CardAttribute>>,
    #[serde(deserialize_with = "lenient")]
    pub highlight: Option<CardHighlight>,
    #[serde(deserialize_with = "lenient")]
    pub reviews: Option<CardReviews>,
}

impl Polycard {
    pub fn title(&self) -> Option<&str> {
        self.primary_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Identifier of the first picture, string or number.
    pub fn first_picture_id(&self) -> Option<&Value> {
        self.pictures
            .as_ref()?
            .pictures
            .as_ref()?
            .as_array()?
            .first()?
            .get("id")
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CardMetadata {
    /// Scheme-less product path, e.g. `www.mercadolivre.com.br/x/p/MLB1`.
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CardPictures {
    /// Array of `{"id": ...}` objects when well formed.
    pub pictures: Option<Value>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CardPrices {
    #[serde(deserialize_with = "lenient")]
    pub primary_price: Option<CardAmount>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CardAmount {
    /// Number or numeric string.
    pub amount: Option<Value>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CardAttribute {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    pub value: Option<Value>,
    pub text: Option<Value>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CardHighlight {
    pub text: Option<Value>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CardReviews {
    pub rating: Option<Value>,
    pub review_count: Option<Value>,
}
