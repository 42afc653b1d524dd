use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use serde_json::Value;
use tracing::debug;

use super::types::*;
use crate::config::Marketplace;
use crate::error::*;
use crate::page::{inner_text, Page};
use crate::selectors::{
    BRAND_SELECTOR, CDN_IMAGE_SELECTOR, HEADING_LINK_SELECTOR, HIGHLIGHT_SELECTOR, LINK_SELECTOR,
    PHRASE_LABEL_SELECTOR,
};
use crate::tools::clean::{
    brand_from_prefix, canonical_product_url, clean_badge_brand, clean_rating, clean_sold_count,
    first_line, ProductIdPattern,
};
use crate::types::RawItem;

/// Name given to cards whose anchor carries no text.
pub(super) const PLACEHOLDER_NAME: &str = "Produto";

/// Marker preceding the results array in embedded application state.
static RESULTS_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""results"\s*:\s*\["#).expect("valid regex"));

/// Every balanced `[...]` slice following a `"results":` marker in `script`.
pub(super) fn find_results_arrays(script: &str) -> Vec<&str> {
    RESULTS_MARKER
        .find_iter(script)
        .filter_map(|m| balanced_array(&script[m.end() - 1..]))
        .collect()
}

/// The JSON array starting at `text[0]`, up to its matching `]`.
fn balanced_array(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Result entries carrying a titled `polycard`.
pub(super) fn titled_polycards(results: Vec<Value>) -> Vec<Polycard> {
    results
        .into_iter()
        .filter_map(|mut result| result.get_mut("polycard").map(Value::take))
        .filter_map(|card| match serde_json::from_value::<Polycard>(card) {
            Ok(card) => Some(card),
            Err(e) => {
                debug!(error = %e, "skipping malformed polycard");
                None
            }
        })
        .filter(|card| card.title().is_some())
        .collect()
}

/// Number that may be encoded as a JSON number or a numeric string. Zero
/// counts as absent.
fn positive_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite() && *n != 0.0)
}

fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn state_brand(card: &Polycard) -> Option<String> {
    let from_attributes = card
        .attributes
        .iter()
        .flatten()
        .find(|a| a.id.as_deref() == Some("BRAND") || a.name.as_deref() == Some("Marca"))
        .and_then(|a| value_text(a.value.as_ref()).or_else(|| value_text(a.text.as_ref())));

    from_attributes.or_else(|| {
        card.highlight
            .as_ref()
            .and_then(|h| value_text(h.text.as_ref()))
            .and_then(|text| brand_from_prefix(&text))
    })
}

/// Convert one embedded-state card. Cards whose URL carries no product
/// identifier (ads, carousels) are rejected.
pub(super) fn state_item(
    card: Polycard,
    market: &Marketplace,
    ids: &ProductIdPattern,
) -> Result<RawItem> {
    let path = card
        .metadata
        .as_ref()
        .and_then(|m| m.url.as_deref())
        .map(str::trim)
        .filter(|p| !p.is_empty());
    let url = path.map(|p| {
        if p.starts_with("http://") || p.starts_with("https://") {
            p.to_string()
        } else {
            format!("https://{}", p.trim_start_matches('/'))
        }
    });
    let url = match url {
        Some(u) if ids.contains_id(&u) => u,
        other => return Err(ExtractionError::MissingProductId(other)),
    };

    let image = value_text(card.first_picture_id())
        .map(|id| format!("https://{}/{id}.webp", market.image_host));

    let price = card
        .prices
        .as_ref()
        .and_then(|p| p.primary_price.as_ref())
        .and_then(|p| positive_number(p.amount.as_ref()));

    let reviews = card.reviews.as_ref();
    let rating = reviews.and_then(|r| positive_number(r.rating.as_ref()));
    let rating_count = reviews
        .and_then(|r| positive_number(r.review_count.as_ref()))
        .map(|n| n.trunc() as u64);

    Ok(RawItem {
        name: card.title().map(str::to_string),
        url: Some(url),
        price,
        brand: state_brand(&card),
        image,
        rating,
        rating_count,
    })
}

/// Anchor pointing at the product: one whose href names an identifier
/// prefix, else the heading anchor, else any marketplace link.
fn card_link<'a>(card: ElementRef<'a>, market: &Marketplace) -> Option<ElementRef<'a>> {
    let hrefs = || {
        card.select(&LINK_SELECTOR)
            .filter_map(|a| a.value().attr("href").map(|h| (a, h)))
    };

    hrefs()
        .find(|(_, href)| market.id_prefixes.iter().any(|p| href.contains(p.as_str())))
        .map(|(a, _)| a)
        .or_else(|| card.select(&HEADING_LINK_SELECTOR).next())
        .or_else(|| {
            hrefs()
                .find(|(_, href)| href.contains(&market.domain_keyword))
                .map(|(a, _)| a)
        })
}

/// Lazy-load source first, then the eager `src`.
pub(crate) fn image_source(page: &Page, img: ElementRef<'_>) -> Option<String> {
    ["data-src", "src"]
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|src| !src.is_empty())
        .map(|src| page.resolve(src).unwrap_or_else(|| src.to_string()))
}

fn card_brand(card: ElementRef<'_>) -> Option<String> {
    card.select(&HIGHLIGHT_SELECTOR)
        .next()
        .and_then(|el| clean_badge_brand(&inner_text(el)))
        .or_else(|| {
            card.select(&BRAND_SELECTOR)
                .next()
                .map(inner_text)
                .filter(|b| !b.is_empty())
        })
}

/// First bare-decimal label is the rating, first sold-count label the count.
fn card_rating(card: ElementRef<'_>) -> (Option<f64>, Option<u64>) {
    let mut rating = None;
    let mut count = None;
    for label in card.select(&PHRASE_LABEL_SELECTOR) {
        let text = inner_text(label);
        if rating.is_none() {
            if let Some(r) = clean_rating(&text) {
                rating = Some(r);
                continue;
            }
        }
        if count.is_none() {
            count = clean_sold_count(&text);
        }
    }
    (rating, count)
}

/// Parse one result card. `position` is zero-based.
pub(super) fn card_item(
    page: &Page,
    position: usize,
    card: ElementRef<'_>,
    market: &Marketplace,
    ids: &ProductIdPattern,
) -> Result<RawItem> {
    let link = card_link(card, market).ok_or(ExtractionError::MissingField("card link"))?;
    let href = page
        .href_of(link)
        .ok_or(ExtractionError::MissingField("card href"))?;
    let url = canonical_product_url(&href, market, ids)
        .filter(|u| ids.contains_id(u))
        .ok_or_else(|| ExtractionError::MissingProductId(Some(href.clone())))?;

    let image = card
        .select(&CDN_IMAGE_SELECTOR)
        .next()
        .and_then(|img| image_source(page, img));

    let name = link
        .value()
        .attr("title")
        .map(str::to_string)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| inner_text(link));
    let name = first_line(&name).unwrap_or_else(|| format!("{PLACEHOLDER_NAME} {}", position + 1));

    let (rating, rating_count) = card_rating(card);

    Ok(RawItem {
        name: Some(name),
        url: Some(url),
        price: None,
        image,
        brand: card_brand(card),
        rating,
        rating_count,
    })
}
