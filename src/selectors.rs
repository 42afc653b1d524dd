//! Shared Selectors

use once_cell::sync::Lazy;
use scraper::Selector;

/// Selector for anchor elements with hrefs.
pub static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid link selector"));

/// Selector for JSON-LD script tags.
pub static JSONLD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script[type='application/ld+json']").expect("valid jsonld selector")
});

/// Selector for every inline `<script>`.
pub static SCRIPT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("valid script selector"));

/// Search-result cards.
pub static RESULT_CARD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[data-component-type="s-search-result"], .ui-search-layout__item"#)
        .expect("valid result card selector")
});

/// Ancestors that delimit one result when walking up from an anchor.
pub static CARD_CONTAINER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".ui-search-result, .ui-search-layout__item, li, .andes-card")
        .expect("valid card container selector")
});

/// Title anchors inside a card heading.
pub static HEADING_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2 a[href]").expect("valid heading link selector"));

/// Card images served from the marketplace CDN.
pub static CDN_IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"img[src*="mlstatic"]"#).expect("valid cdn image selector"));

/// Any image.
pub static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("valid image selector"));

/// Highlight badge ("Por Apple", "LOJA OFICIAL", "MAIS VENDIDO").
pub static HIGHLIGHT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".poly-component__highlight").expect("valid highlight selector")
});

/// Dedicated brand badge.
pub static BRAND_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".poly-component__brand").expect("valid brand selector"));

/// Rating and sold-count labels.
pub static PHRASE_LABEL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".poly-phrase-label").expect("valid phrase label selector"));

/// Struck-through price shown before a discount.
pub static PREVIOUS_PRICE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("s.andes-money-amount--previous").expect("valid previous price selector")
});

/// Container of the price currently charged.
pub static CURRENT_PRICE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".poly-price__current").expect("valid current price selector"));

/// Money amount inside a price container.
pub static MONEY_AMOUNT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".andes-money-amount").expect("valid money amount selector"));

/// Integer part of a money amount.
pub static PRICE_FRACTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".andes-money-amount__fraction").expect("valid price fraction selector")
});

/// Cents part of a money amount.
pub static PRICE_CENTS_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".andes-money-amount__cents").expect("valid price cents selector")
});
