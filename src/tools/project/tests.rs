#![cfg(test)]
mod tests {
    use crate::tools::clean::ProductIdPattern;
    use crate::tools::project::*;
    use crate::types::{FieldSpec, FieldType, FieldValue, RawItem};

    fn phone() -> RawItem {
        RawItem {
            name: Some("Phone X".into()),
            url: Some("https://www.mercadolivre.com.br/phone-x/p/mlb-123".into()),
            price: Some(999.0),
            image: Some("https://img/1.webp".into()),
            brand: Some("Acme".into()),
            rating: Some(4.5),
            rating_count: Some(12),
        }
    }

    #[test]
    fn test_project_default_fields() {
        let records = project(&[phone()], &FieldSpec::default(), &ProductIdPattern::default());
        let r = &records[0];

        assert_eq!(r.text("id"), Some("MLB123"));
        assert_eq!(r.number("price"), Some(999.0));
        assert_eq!(r.text("brand"), Some("Acme"));
        assert_eq!(r.number("ratingCount"), Some(12.0));
        assert!(r.is_null("promoPrice"));
        assert_eq!(r.get("isFull"), Some(&FieldValue::Bool(false)));
        assert_eq!(r.display_name.as_deref(), Some("Phone X"));
        // name is not a default field
        assert!(!r.declares("name"));
    }

    #[test]
    fn test_project_only_declared_fields() {
        let spec = FieldSpec::empty()
            .with("name", FieldType::String)
            .with("freeShipping", FieldType::Boolean);
        let records = project(&[phone()], &spec, &ProductIdPattern::default());
        let r = &records[0];

        assert_eq!(r.field_names().collect::<Vec<_>>(), vec!["name", "freeShipping"]);
        assert_eq!(r.text("name"), Some("Phone X"));
        assert!(!r.flag("freeShipping"));
        assert_eq!(
            r.source_url.as_deref(),
            Some("https://www.mercadolivre.com.br/phone-x/p/mlb-123")
        );
    }

    #[test]
    fn test_project_placeholder_id_without_url() {
        let items = vec![phone(), RawItem::default()];
        let records = project(&items, &FieldSpec::default(), &ProductIdPattern::default());

        assert_eq!(records[1].text("id"), Some("item-2"));
        assert!(records[1].is_null("url"));
        assert!(!ProductIdPattern::default().is_valid("item-2"));
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(is_placeholder_id(&placeholder_id(0)));
        assert!(!is_placeholder_id("item-"));
        assert!(!is_placeholder_id("MLB123"));
    }
}
