#![cfg(test)]
mod tests {
    use crate::config::Marketplace;
    use crate::page::Page;
    use crate::tools::clean::ProductIdPattern;
    use crate::tools::extract::*;
    use crate::types::StructuredDataEntry;

    const BASE: &str = "https://lista.mercadolivre.com.br/phone";

    fn page(html: &str) -> Page {
        Page::parse(html, BASE).unwrap()
    }

    #[test]
    fn test_jsonld_items_take_offer_price_only() {
        let entries = vec![
            StructuredDataEntry {
                name: Some("Phone X".into()),
                url: Some("https://www.mercadolivre.com.br/phone-x/p/MLB123".into()),
                image: Some("https://img/1.webp".into()),
                brand: Some("Acme".into()),
                price: Some(1200.0),
                offer_price: Some(999.0),
                ..Default::default()
            },
            StructuredDataEntry {
                name: Some("No offer".into()),
                price: Some(50.0),
                ..Default::default()
            },
        ];

        let items = extract_jsonld_items(&entries);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name.as_deref(), Some("Phone X"));
        assert_eq!(items[0].price, Some(999.0));
        assert_eq!(items[0].image.as_deref(), Some("https://img/1.webp"));
        assert_eq!(items[0].brand, None);
        assert_eq!(items[1].price, None);
    }

    #[test]
    fn test_state_items_from_embedded_results() {
        let html = r#"<html><body><script>
            window.__PRELOADED_STATE__ = {"pageState": {"initialState": {"results": [
                {"polycard": {
                    "metadata": {"url": "www.mercadolivre.com.br/phone-x/p/MLB123"},
                    "primary_title": "Phone X",
                    "pictures": {"pictures": [{"id": "D_NQ_123"}]},
                    "prices": {"primary_price": {"amount": "999.5"}},
                    "attributes": [{"id": "COLOR", "value": "Azul"}, {"id": "BRAND", "value": "Acme"}],
                    "reviews": {"rating": 4.8, "review_count": 120}
                }},
                {"polycard": {
                    "metadata": {"url": "click1.mercadolivre.com.br/ads/track"},
                    "primary_title": "Sponsored"
                }},
                {"polycard": {"primary_title": ""}},
                {"polycard": {
                    "metadata": {"url": "www.mercadolivre.com.br/cabo/p/MLB9"},
                    "primary_title": "Cabo USB",
                    "highlight": {"text": "Por Loja Y"},
                    "prices": {"primary_price": {"amount": 0}},
                    "reviews": {"rating": 0}
                }}
            ]}}};
        </script></body></html>"#;

        let items = extract_state_items(
            &page(html),
            &Marketplace::default(),
            &ProductIdPattern::default(),
        );

        assert_eq!(items.len(), 2);
        let phone = &items[0];
        assert_eq!(phone.name.as_deref(), Some("Phone X"));
        assert_eq!(
            phone.url.as_deref(),
            Some("https://www.mercadolivre.com.br/phone-x/p/MLB123")
        );
        assert_eq!(
            phone.image.as_deref(),
            Some("https://http2.mlstatic.com/D_NQ_123.webp")
        );
        assert_eq!(phone.price, Some(999.5));
        assert_eq!(phone.brand.as_deref(), Some("Acme"));
        assert_eq!(phone.rating, Some(4.8));
        assert_eq!(phone.rating_count, Some(120));

        let cable = &items[1];
        assert_eq!(cable.brand.as_deref(), Some("Loja Y"));
        assert_eq!(cable.price, None);
        assert_eq!(cable.rating, None);
        assert_eq!(cable.image, None);
    }

    #[test]
    fn test_state_items_skip_unparsable_arrays() {
        let html = r#"<script>var a = {"results": [ {broken ]};</script>
            <script>var b = {"results": [{"polycard": {"primary_title": "Ok",
                "metadata": {"url": "www.mercadolivre.com.br/ok/p/MLA77"}}}]};</script>"#;

        let items = extract_state_items(
            &page(html),
            &Marketplace::default(),
            &ProductIdPattern::default(),
        );
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].url.as_deref(),
            Some("https://www.mercadolivre.com.br/ok/p/MLA77")
        );
    }

    #[test]
    fn test_state_items_first_titled_array_only() {
        let state = r#"{"results": [
            {"polycard": {
                "metadata": {"url": "www.mercadolivre.com.br/phone-x/p/MLB123"},
                "primary_title": "Phone X",
                "carousel": {"results": [
                    {"polycard": {"primary_title": "Phone X",
                        "metadata": {"url": "www.mercadolivre.com.br/phone-x/p/MLB123"}}}
                ]}
            }}
        ]}"#;
        let html = format!(
            "<script>var a = {{\"results\": [{{\"ad\": 1}}]}};</script>\
             <script>window.__PRELOADED_STATE__ = {state};</script>\
             <script>window.__PRELOADED_STATE__ = {state};</script>"
        );

        let items = extract_state_items(
            &page(&html),
            &Marketplace::default(),
            &ProductIdPattern::default(),
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name.as_deref(), Some("Phone X"));
    }

    #[test]
    fn test_state_items_tolerate_odd_leaf_shapes() {
        let cases = [
            (r#""pictures": {"pictures": null}"#, None),
            (
                r#""pictures": {"pictures": [{"id": 123}]}"#,
                Some("https://http2.mlstatic.com/123.webp"),
            ),
            (r#""highlight": {"text": {"label": "Por Acme"}}"#, None),
            (r#""pictures": "D_1", "reviews": [], "attributes": {"BRAND": "x"}"#, None),
        ];

        for (extra, image) in cases {
            let html = format!(
                r#"<script>var s = {{"results": [{{"polycard": {{
                    "primary_title": "Phone X",
                    "metadata": {{"url": "www.mercadolivre.com.br/phone-x/p/MLB123"}},
                    {extra}
                }}}}]}};</script>"#
            );

            let items = extract_state_items(
                &page(&html),
                &Marketplace::default(),
                &ProductIdPattern::default(),
            );
            assert_eq!(items.len(), 1, "{extra}");
            assert_eq!(
                items[0].url.as_deref(),
                Some("https://www.mercadolivre.com.br/phone-x/p/MLB123")
            );
            assert_eq!(items[0].image.as_deref(), image, "{extra}");
            assert_eq!(items[0].brand, None, "{extra}");
        }
    }

    #[test]
    fn test_state_items_none_without_state() {
        let items = extract_state_items(
            &page("<html><body><script>var x = 1;</script></body></html>"),
            &Marketplace::default(),
            &ProductIdPattern::default(),
        );
        assert!(items.is_empty());
    }

    const CARDS: &str = r#"<html><body><ol>
        <li class="ui-search-layout__item">
            <div class="poly-card">
                <img src="https://http2.mlstatic.com/D_1.webp" data-src="https://http2.mlstatic.com/D_1-big.webp">
                <span class="poly-component__highlight">Por Acme</span>
                <h3><a href="https://www.mercadolivre.com.br/phone-x/p/MLB123?pdp_filters=x#pos">Phone X 128 GB</a></h3>
                <span class="poly-phrase-label">4.8</span>
                <span class="poly-phrase-label">+5mil vendidos</span>
            </div>
        </li>
        <li class="ui-search-layout__item">
            <a href="https://click1.mercadolivre.com.br/ads/track">Sponsored</a>
        </li>
        <li class="ui-search-layout__item">
            <a href="/item/MLB-456-cabo"><img src="https://http2.mlstatic.com/D_3.webp"></a>
            <span class="poly-component__brand">Loja Y</span>
        </li>
        <li class="ui-search-layout__item"><p>no link at all</p></li>
    </ol></body></html>"#;

    #[test]
    fn test_card_items_keep_identified_cards() {
        let items = extract_card_items(
            &page(CARDS),
            &Marketplace::default(),
            &ProductIdPattern::default(),
        );

        assert_eq!(items.len(), 2);

        let phone = &items[0];
        assert_eq!(phone.name.as_deref(), Some("Phone X 128 GB"));
        assert_eq!(
            phone.url.as_deref(),
            Some("https://www.mercadolivre.com.br/phone-x/p/MLB123")
        );
        assert_eq!(
            phone.image.as_deref(),
            Some("https://http2.mlstatic.com/D_1-big.webp")
        );
        assert_eq!(phone.brand.as_deref(), Some("Acme"));
        assert_eq!(phone.rating, Some(4.8));
        assert_eq!(phone.rating_count, Some(5000));
        assert_eq!(phone.price, None);
    }

    #[test]
    fn test_card_items_placeholder_name_and_rebuilt_url() {
        let items = extract_card_items(
            &page(CARDS),
            &Marketplace::default(),
            &ProductIdPattern::default(),
        );

        let cable = &items[1];
        assert_eq!(cable.name.as_deref(), Some("Produto 3"));
        assert_eq!(
            cable.url.as_deref(),
            Some("https://www.mercadolivre.com.br/p/MLB456")
        );
        assert_eq!(
            cable.image.as_deref(),
            Some("https://http2.mlstatic.com/D_3.webp")
        );
        assert_eq!(cable.brand.as_deref(), Some("Loja Y"));
        assert_eq!(cable.rating, None);
        assert_eq!(cable.rating_count, None);
    }

    #[test]
    fn test_card_items_title_attribute_wins() {
        let html = r#"<div data-component-type="s-search-result">
            <h2><a href="https://www.mercadolivre.com.br/tv/p/MLB55" title="Smart TV 50">
                <span>ignored</span></a></h2>
        </div>"#;

        let items = extract_card_items(
            &page(html),
            &Marketplace::default(),
            &ProductIdPattern::default(),
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name.as_deref(), Some("Smart TV 50"));
    }
}
