use scraper::ElementRef;

use crate::page::inner_text;
use crate::selectors::{
    CURRENT_PRICE_SELECTOR, MONEY_AMOUNT_SELECTOR, PREVIOUS_PRICE_SELECTOR, PRICE_CENTS_SELECTOR,
    PRICE_FRACTION_SELECTOR,
};

const FREE_SHIPPING_PHRASES: &[&str] = &["frete grátis", "frete gratis"];

/// Fulfillment markers searched in the raw markup, case-sensitive.
const FULL_MARKUP_MARKERS: &[&str] = &[r#"aria-label="full""#, "FULL", "vpp_full"];

/// Fulfillment phrases searched in the lowercased text.
const FULL_TEXT_PHRASES: &[&str] = &["enviado pelo", "full"];

const NEXT_DAY_PHRASES: &[&str] = &[
    "amanhã",
    "amanha",
    "chegará",
    "chegara",
    "chega amanhã",
    "chega amanha",
    "rápido amanhã",
    "rapido amanha",
];

/// Delivery signals read from one result card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Signals {
    pub free_shipping: bool,
    pub full: bool,
    pub next_day: bool,
}

impl Signals {
    /// `text` is the card's rendered text, `markup` its outer HTML.
    pub(super) fn detect(text: &str, markup: &str) -> Self {
        let lower = text.to_lowercase();
        let any = |phrases: &[&str]| phrases.iter().any(|p| lower.contains(p));

        Self {
            free_shipping: any(FREE_SHIPPING_PHRASES),
            full: FULL_MARKUP_MARKERS.iter().any(|m| markup.contains(m)) || any(FULL_TEXT_PHRASES),
            next_day: any(NEXT_DAY_PHRASES),
        }
    }
}

/// Price text of a money-amount element: fraction, then `,cents` if shown.
pub(super) fn amount_text(amount: ElementRef<'_>) -> String {
    let fraction = amount
        .select(&PRICE_FRACTION_SELECTOR)
        .next()
        .map(inner_text)
        .unwrap_or_default();
    let cents = amount.select(&PRICE_CENTS_SELECTOR).next().map(inner_text);

    match cents {
        Some(cents) => format!("{fraction},{cents}").trim().to_string(),
        None => fraction.trim().to_string(),
    }
}

/// Struck-through price text and current price text of a card.
pub(super) fn price_texts(card: ElementRef<'_>) -> (Option<String>, Option<String>) {
    let previous = card.select(&PREVIOUS_PRICE_SELECTOR).next().map(amount_text);
    let current = card
        .select(&CURRENT_PRICE_SELECTOR)
        .next()
        .and_then(|c| c.select(&MONEY_AMOUNT_SELECTOR).next())
        .map(amount_text);
    (previous, current)
}
