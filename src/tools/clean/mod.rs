//! Clean Tools
//!
//! Text, price, URL and identifier helpers shared by every extractor tier.

pub mod types;
mod utils;

pub use types::*;
use utils::*;

use crate::config::Marketplace;

/// Longest highlight text still considered a brand badge.
const MAX_BADGE_LEN: usize = 50;

/// Parse a displayed price into a number.
///
/// Currency symbols are stripped, `.` is dropped when it separates thousands,
/// `,` becomes the decimal point. Anything non-finite yields `None`.
///
/// # Examples
/// ```
/// use mlscrape::tools::clean::clean_price;
///
/// assert_eq!(clean_price("R$ 1.234,56"), Some(1234.56));
/// assert_eq!(clean_price("99,90"), Some(99.9));
/// assert_eq!(clean_price("—"), None);
/// ```
pub fn clean_price(text: &str) -> Option<f64> {
    let text = normalize_whitespace(text);
    let text = strip_currency(&text);
    let text = drop_thousands_separators(&text).replace(',', ".");
    let numeric: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    parse_leading_float(&numeric)
}

/// Strip query string, fragment and trailing slash.
pub fn clean_url(url: &str) -> String {
    let url = url.split('?').next().unwrap_or(url);
    let url = url.split('#').next().unwrap_or(url);
    url.trim_end_matches('/').to_string()
}

/// Final non-empty path segment of a URL.
pub fn last_path_segment(url: &str) -> Option<&str> {
    url.split('/').filter(|s| !s.is_empty()).last()
}

/// Canonical product URL for a card href.
///
/// Canonical-host URLs are cut right after the `/p/<id>` segment. Other hrefs
/// carrying an identifier (tracking redirects, item pages) are rebuilt on the
/// canonical host from the slug preceding `/p/<id>` when there is one, else
/// from the identifier alone. Hrefs without an identifier are only cleaned.
pub fn canonical_product_url(
    href: &str,
    market: &Marketplace,
    ids: &ProductIdPattern,
) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let cleaned = href.split(['?', '#']).next().unwrap_or(href);

    let Some((start, end)) = ids.locate(cleaned) else {
        return Some(cleaned.to_string());
    };
    let before = &cleaned[..start];

    if cleaned.contains(&market.canonical_host) && before.ends_with("/p/") {
        return Some(cleaned[..end].to_string());
    }

    let id = ids.derive(&cleaned[start..end])?;
    let slug = before
        .strip_suffix("/p/")
        .and_then(|rest| rest.rsplit('/').next())
        .filter(|slug| {
            !slug.is_empty()
                && !slug.contains('.')
                && slug
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
        });

    Some(match slug {
        Some(slug) => format!("https://{}/{slug}/p/{id}", market.canonical_host),
        None => format!("https://{}/p/{id}", market.canonical_host),
    })
}

/// First non-empty line of rendered text.
pub fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Brand named by a `Por <brand>` / `By <brand>` phrase.
pub fn brand_from_prefix(text: &str) -> Option<String> {
    strip_brand_prefix(text.trim())
        .filter(|b| !b.is_empty())
        .map(str::to_string)
}

/// Brand shown in a card's highlight badge, if the badge names one.
///
/// Prefixed phrases yield the brand after the prefix. Other short badges count
/// as a brand unless they carry a known non-brand phrase (sold counts,
/// percentages, offers, sponsorship, availability).
pub fn clean_badge_brand(text: &str) -> Option<String> {
    let text = normalize_whitespace(text);
    if text.is_empty() || text.chars().count() >= MAX_BADGE_LEN {
        return None;
    }
    if let Some(brand) = strip_brand_prefix(&text) {
        return (!brand.is_empty()).then(|| brand.to_string());
    }
    let lower = text.to_lowercase();
    if NON_BRAND_PHRASES.iter().any(|p| lower.contains(p)) {
        return None;
    }
    Some(text)
}

/// Rating from a label holding only a decimal number (`4.9`, `4,5`).
pub fn clean_rating(label: &str) -> Option<f64> {
    let caps = RATING_REGEX.captures(label.trim())?;
    caps[1].replace(',', ".").parse::<f64>().ok()
}

/// Sold count from labels such as `+5mil vendidos` or `+1.2k vendidos`.
pub fn clean_sold_count(label: &str) -> Option<u64> {
    let caps = SOLD_COUNT_REGEX.captures(label)?;
    let number = &caps[1];
    match caps.get(2) {
        Some(_) => {
            let n = parse_leading_float(&number.replace(',', "."))?;
            Some((n * 1000.0).round() as u64)
        }
        None => number.replace(['.', ','], "").parse::<u64>().ok(),
    }
}

/// Search term as a URL slug: trimmed, whitespace runs become `-`.
pub fn term_slug(term: &str) -> String {
    term.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Listing URL for a search term.
pub fn listing_url(term: &str, market: &Marketplace) -> String {
    let slug = term_slug(term);
    format!("https://{}/{slug}#D[A:{slug}]", market.listing_host)
}

/// At most `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
