//! Enrich Tools
//!
//! Re-locates the result card a record came from and reads what only the
//! rendered card shows: delivery signals, the struck-through/current price
//! pair, the lazy-loaded image and the card text.
//!
//! Cards are found through their anchors, in priority order:
//! 1. anchor whose cleaned href equals the record's cleaned URL
//! 2. anchor whose href has the same derived product identifier
//! 3. anchor whose href ends with the same path segment
//!
//! The first pass with a hit wins; within a pass, document order decides.

mod tests;
mod utils;

use utils::*;

use crate::page::{closest, inner_text, parent_element, Page};
use crate::selectors::{CARD_CONTAINER_SELECTOR, IMAGE_SELECTOR, LINK_SELECTOR};
use crate::tools::clean::{
    clean_price, clean_url, last_path_segment, truncate_chars, ProductIdPattern,
};
use crate::tools::extract::image_source;
use crate::tools::project::is_placeholder_id;
use crate::types::{fields, ProductRecord};
use scraper::ElementRef;
use tracing::debug;

/// Longest card text kept in `rawNodeText`.
pub const MAX_NODE_TEXT: usize = 2000;

struct Anchor<'a> {
    element: ElementRef<'a>,
    href: String,
    cleaned: String,
}

/// Every resolvable anchor of a page, collected once per run.
pub struct AnchorIndex<'a> {
    anchors: Vec<Anchor<'a>>,
}

impl<'a> AnchorIndex<'a> {
    pub fn new(page: &'a Page) -> Self {
        let anchors = page
            .select(&LINK_SELECTOR)
            .filter_map(|element| {
                let href = page.href_of(element)?;
                let cleaned = clean_url(&href);
                Some(Anchor {
                    element,
                    href,
                    cleaned,
                })
            })
            .collect();
        Self { anchors }
    }

    /// Anchor for `url` and its resolved href.
    pub fn find(&self, url: &str, ids: &ProductIdPattern) -> Option<(ElementRef<'a>, &str)> {
        let wanted = clean_url(url);
        if wanted.is_empty() {
            return None;
        }
        let by_url = || self.anchors.iter().find(|a| a.cleaned == wanted);
        let by_id = || {
            let id = ids.derive(&wanted)?;
            self.anchors
                .iter()
                .find(|a| ids.derive(&a.cleaned).as_deref() == Some(id.as_str()))
        };
        let by_segment = || {
            let segment = last_path_segment(&wanted)?;
            self.anchors
                .iter()
                .find(|a| last_path_segment(&a.cleaned) == Some(segment))
        };

        by_url()
            .or_else(by_id)
            .or_else(by_segment)
            .map(|a| (a.element, a.href.as_str()))
    }
}

/// Result card enclosing `anchor`, else its parent element.
pub fn card_node(anchor: ElementRef<'_>) -> Option<ElementRef<'_>> {
    closest(anchor, &CARD_CONTAINER_SELECTOR).or_else(|| parent_element(anchor))
}

/// Apply what `card` shows to `record`.
pub fn enrich_from_card(page: &Page, record: &mut ProductRecord, card: ElementRef<'_>) {
    let text = inner_text(card);

    if record.declares(fields::RAW_NODE_TEXT) {
        record.set(fields::RAW_NODE_TEXT, truncate_chars(&text, MAX_NODE_TEXT));
    }

    let signals = Signals::detect(&text, &card.html());
    if signals.free_shipping {
        record.set(fields::FREE_SHIPPING, true);
    }
    if signals.full {
        record.set(fields::IS_FULL, true);
    }
    if signals.next_day {
        record.set(fields::COMES_TOMORROW, true);
    }

    let non_empty = |t: String| (!t.is_empty()).then_some(t);
    match price_texts(card) {
        (Some(previous), current) => {
            record.set(fields::PRICE, clean_price(&previous));
            record.set(fields::PRICE_TEXT, non_empty(previous));
            if let Some(current) = current {
                record.set(fields::PROMO_PRICE, clean_price(&current));
                record.set(fields::PROMO_PRICE_TEXT, non_empty(current));
            }
        }
        (None, Some(current)) => {
            record.set(fields::PRICE, clean_price(&current));
            record.set(fields::PRICE_TEXT, non_empty(current));
        }
        (None, None) => {}
    }

    if let Some(img) = card.select(&IMAGE_SELECTOR).next() {
        if let Some(src) = image_source(page, img) {
            record.set(fields::IMAGE, src);
        }
    }
}

/// Enrich one record from its card, if the card can be found.
///
/// Returns whether a card was found. Records without a source URL are left
/// untouched.
pub fn enrich_record(
    page: &Page,
    anchors: &AnchorIndex<'_>,
    record: &mut ProductRecord,
    ids: &ProductIdPattern,
) -> bool {
    let Some(url) = record.source_url.clone() else {
        return false;
    };
    let Some((anchor, href)) = anchors.find(&url, ids) else {
        debug!(url = %url, "no anchor for record");
        return false;
    };

    if record.text(fields::ID).is_some_and(is_placeholder_id) {
        if let Some(id) = ids.derive(href) {
            record.set(fields::ID, id);
        }
    }

    let Some(card) = card_node(anchor) else {
        return false;
    };
    enrich_from_card(page, record, card);
    true
}

/// Enrich every record in place.
pub fn enrich(page: &Page, records: &mut [ProductRecord], ids: &ProductIdPattern) {
    let anchors = AnchorIndex::new(page);
    let mut matched = 0usize;
    for record in records.iter_mut() {
        if enrich_record(page, &anchors, record, ids) {
            matched += 1;
        }
    }
    debug!(
        records = records.len(),
        matched,
        anchors = anchors.anchors.len(),
        "enriched records from cards"
    );
}
