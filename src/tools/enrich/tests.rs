#![cfg(test)]
mod tests {
    use crate::page::Page;
    use crate::tools::clean::ProductIdPattern;
    use crate::tools::enrich::*;
    use crate::types::{FieldSpec, FieldType, ProductRecord};

    const BASE: &str = "https://lista.mercadolivre.com.br/phone";

    const LISTING: &str = r#"<html><body><ol>
        <li class="ui-search-layout__item">
            <div class="poly-card">
                <img data-src="https://http2.mlstatic.com/D_big.webp" src="data:image/gif;base64,R0lGOD">
                <a href="https://www.mercadolivre.com.br/phone-x/p/MLB123?searchVariation=1#polycard">Phone X</a>
                <div class="poly-price__prev">
                    <s class="andes-money-amount andes-money-amount--previous">
                        <span class="andes-money-amount__currency-symbol">R$</span>
                        <span class="andes-money-amount__fraction">1.099</span>
                    </s>
                </div>
                <div class="poly-price__current">
                    <span class="andes-money-amount">
                        <span class="andes-money-amount__currency-symbol">R$</span>
                        <span class="andes-money-amount__fraction">999</span>
                        <span class="andes-money-amount__cents">90</span>
                    </span>
                </div>
                <p>Frete grátis</p>
                <p>Chegará grátis amanhã</p>
                <svg aria-label="full"></svg>
            </div>
        </li>
        <li class="ui-search-layout__item">
            <a href="https://click1.mercadolivre.com.br/mclics/clicks/MLB-456/track">Cabo</a>
            <div class="poly-price__current">
                <span class="andes-money-amount"><span class="andes-money-amount__fraction">49</span></span>
            </div>
        </li>
        <li class="ui-search-layout__item">
            <a href="/fone-bluetooth-z">Fone Z</a>
            <span>Loja oficial</span>
        </li>
    </ol></body></html>"#;

    fn spec() -> FieldSpec {
        FieldSpec::default()
            .with("priceText", FieldType::String)
            .with("promoPriceText", FieldType::String)
            .with("rawNodeText", FieldType::String)
    }

    fn record(url: &str, id: &str) -> ProductRecord {
        let mut r = ProductRecord::new(&spec());
        r.set("url", url);
        r.set("id", id);
        r.source_url = Some(url.to_string());
        r
    }

    #[test]
    fn test_enrich_struck_through_and_current_price() {
        let page = Page::parse(LISTING, BASE).unwrap();
        let mut records = vec![record(
            "https://www.mercadolivre.com.br/phone-x/p/MLB123",
            "MLB123",
        )];

        enrich(&page, &mut records, &ProductIdPattern::default());
        let r = &records[0];

        assert_eq!(r.number("price"), Some(1099.0));
        assert_eq!(r.number("promoPrice"), Some(999.9));
        assert_eq!(r.text("priceText"), Some("1.099"));
        assert_eq!(r.text("promoPriceText"), Some("999,90"));
        assert!(r.flag("freeShipping"));
        assert!(r.flag("comesTomorrow"));
        assert!(r.flag("isFull"));
        assert_eq!(r.text("image"), Some("https://http2.mlstatic.com/D_big.webp"));
        assert!(r.text("rawNodeText").unwrap().starts_with("Phone X"));
    }

    #[test]
    fn test_enrich_current_price_only_and_id_match() {
        let page = Page::parse(LISTING, BASE).unwrap();
        let mut records = vec![record("https://www.mercadolivre.com.br/p/MLB456", "MLB456")];

        enrich(&page, &mut records, &ProductIdPattern::default());
        let r = &records[0];

        assert_eq!(r.number("price"), Some(49.0));
        assert!(r.is_null("promoPrice"));
        assert_eq!(r.text("priceText"), Some("49"));
        assert!(!r.flag("freeShipping"));
        assert!(!r.flag("isFull"));
    }

    #[test]
    fn test_enrich_segment_match_fills_placeholder_id_only_from_identifier() {
        let page = Page::parse(LISTING, BASE).unwrap();
        let mut records = vec![record(
            "https://www.mercadolivre.com.br/fone-bluetooth-z",
            "item-3",
        )];

        enrich(&page, &mut records, &ProductIdPattern::default());
        let r = &records[0];

        assert_eq!(r.text("id"), Some("item-3"));
        assert!(r.text("rawNodeText").unwrap().contains("Loja oficial"));
        assert!(r.is_null("price"));
    }

    #[test]
    fn test_anchor_priority_prefers_exact_url() {
        let html = r#"
            <a id="by-id" href="https://click1.mercadolivre.com.br/MLB-123">ad</a>
            <a id="exact" href="https://www.mercadolivre.com.br/phone-x/p/MLB123">Phone X</a>
        "#;
        let page = Page::parse(html, BASE).unwrap();
        let anchors = AnchorIndex::new(&page);
        let ids = ProductIdPattern::default();

        let (anchor, _) = anchors
            .find("https://www.mercadolivre.com.br/phone-x/p/MLB123?x=1", &ids)
            .unwrap();
        assert_eq!(anchor.value().attr("id"), Some("exact"));

        let (anchor, href) = anchors
            .find("https://www.mercadolivre.com.br/p/MLB123", &ids)
            .unwrap();
        assert_eq!(anchor.value().attr("id"), Some("by-id"));
        assert!(href.contains("click1"));
    }

    #[test]
    fn test_identifier_pass_needs_equal_derived_id() {
        let html = r#"
            <a id="longer" href="https://www.mercadolivre.com.br/capa/p/MLB1234">Capa</a>
            <a id="same" href="https://click1.mercadolivre.com.br/MLB-123/track">Phone</a>
        "#;
        let page = Page::parse(html, BASE).unwrap();
        let anchors = AnchorIndex::new(&page);

        let (anchor, _) = anchors
            .find("https://www.mercadolivre.com.br/phone/p/MLB123", &ProductIdPattern::default())
            .unwrap();
        assert_eq!(anchor.value().attr("id"), Some("same"));
    }

    #[test]
    fn test_enrich_fills_placeholder_id_from_anchor() {
        let html = r#"<li><a href="https://www.mercadolivre.com.br/phone-x/p/MLB777">Phone</a></li>"#;
        let page = Page::parse(html, BASE).unwrap();
        let mut records = vec![record("https://www.mercadolivre.com.br/phone-x/p", "item-1")];
        records[0].source_url = Some("https://www.mercadolivre.com.br/phone-x/p/MLB777/".into());

        enrich(&page, &mut records, &ProductIdPattern::default());
        assert_eq!(records[0].text("id"), Some("MLB777"));
    }

    #[test]
    fn test_enrich_without_match_keeps_defaults() {
        let page = Page::parse(LISTING, BASE).unwrap();
        let mut records = vec![record("https://www.mercadolivre.com.br/nada/p/MLB999", "MLB999")];
        records.push(ProductRecord::new(&spec()));

        enrich(&page, &mut records, &ProductIdPattern::default());
        assert!(records[0].is_null("price"));
        assert!(!records[0].flag("freeShipping"));
        assert!(records[1].is_null("rawNodeText"));
    }
}
