//! Parsed DOM snapshot of a search-results page plus the query helpers the
//! extractors need (selection, text, markup, attributes, closest ancestor).

use crate::error::*;
use crate::selectors::{JSONLD_SELECTOR, SCRIPT_SELECTOR};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Tags that break lines in rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Tags whose text never renders.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

pub struct Page {
    document: Html,
    base: Url,
}

impl Page {
    /// Parse a page snapshot. `base_url` is the address the page was loaded
    /// from; relative hrefs resolve against it.
    pub fn parse(html: &str, base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|_| ExtractionError::InvalidUrl(base_url.into()))?;
        Ok(Self {
            document: Html::parse_document(html),
            base,
        })
    }

    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> scraper::html::Select<'a, 'b> {
        self.document.select(selector)
    }

    /// Absolute http(s) form of `href`, the way a browser exposes `a.href`.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim().trim_matches('"').trim_matches('\'').trim();
        if href.is_empty() {
            return None;
        }

        // Handle protocol-relative URLs (//example.com/path)
        let url = if href.starts_with("//") {
            Url::parse(&format!("{}:{}", self.base.scheme(), href)).ok()?
        } else {
            Url::parse(href).ok().or_else(|| self.base.join(href).ok())?
        };

        if matches!(url.scheme(), "http" | "https") {
            Some(url.to_string())
        } else {
            None
        }
    }

    /// Resolved `href` of an anchor element.
    pub fn href_of(&self, anchor: ElementRef<'_>) -> Option<String> {
        anchor.value().attr("href").and_then(|h| self.resolve(h))
    }

    /// Text content of every `<script>` on the page, in document order.
    pub fn script_bodies(&self) -> Vec<String> {
        collect_bodies(&self.document, &SCRIPT_SELECTOR)
    }

    /// Text content of every JSON-LD block on the page.
    pub fn jsonld_bodies(&self) -> Vec<String> {
        collect_bodies(&self.document, &JSONLD_SELECTOR)
    }
}

fn collect_bodies(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|el| el.text().collect::<String>())
        .filter(|body| !body.trim().is_empty())
        .collect()
}

/// Rendered text of an element: whitespace collapsed, one line per block.
pub fn inner_text(el: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(el, &mut raw);
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if collapsed.is_empty() {
                    if !out.ends_with([' ', '\n']) && !out.is_empty() {
                        out.push(' ');
                    }
                    continue;
                }
                if text.starts_with(char::is_whitespace) && !out.ends_with([' ', '\n']) {
                    out.push(' ');
                }
                out.push_str(&collapsed);
                if text.ends_with(char::is_whitespace) {
                    out.push(' ');
                }
            }
            Node::Element(element) => {
                let name = element.name();
                if HIDDEN_TAGS.contains(&name) {
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                push_text(child_el, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Nearest element matching `selector`, starting with `el` itself.
pub fn closest<'a>(el: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    if selector.matches(&el) {
        return Some(el);
    }
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| selector.matches(ancestor))
}

pub fn parent_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.parent().and_then(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::{CARD_CONTAINER_SELECTOR, LINK_SELECTOR};

    const BASE: &str = "https://lista.mercadolivre.com.br/iphone";

    #[test]
    fn test_resolve_relative_and_protocol_relative() {
        let page = Page::parse("<html></html>", BASE).unwrap();
        assert_eq!(
            page.resolve("/iphone-15/p/MLB123").as_deref(),
            Some("https://lista.mercadolivre.com.br/iphone-15/p/MLB123")
        );
        assert_eq!(
            page.resolve("//www.mercadolivre.com.br/p/MLB1").as_deref(),
            Some("https://www.mercadolivre.com.br/p/MLB1")
        );
        assert_eq!(page.resolve("javascript:void(0)"), None);
        assert_eq!(page.resolve("   "), None);
    }

    #[test]
    fn test_parse_rejects_bad_base() {
        assert!(matches!(
            Page::parse("<html></html>", "not a url"),
            Err(ExtractionError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_inner_text_breaks_blocks() {
        let page = Page::parse(
            r#"<div id="x"><a href="/p"><h3>Apple <b>iPhone</b> 15</h3><span>128 GB</span></a>
               <script>var x = 1;</script><p>Frete   grátis</p></div>"#,
            BASE,
        )
        .unwrap();
        let div = page.select(&Selector::parse("#x").unwrap()).next().unwrap();
        assert_eq!(inner_text(div), "Apple iPhone 15\n128 GB\nFrete grátis");
    }

    #[test]
    fn test_closest_walks_up_to_card() {
        let page = Page::parse(
            r#"<ol><li class="ui-search-layout__item"><div><a href="/p/MLB1">x</a></div></li></ol>"#,
            BASE,
        )
        .unwrap();
        let anchor = page.select(&LINK_SELECTOR).next().unwrap();
        let card = closest(anchor, &CARD_CONTAINER_SELECTOR).unwrap();
        assert_eq!(card.value().name(), "li");
        assert_eq!(parent_element(anchor).unwrap().value().name(), "div");
    }

    #[test]
    fn test_script_bodies_skip_empty() {
        let page = Page::parse(
            r#"<script src="a.js"></script><script>window.x = 1</script>
               <script type="application/ld+json">{"@type":"Product"}</script>"#,
            BASE,
        )
        .unwrap();
        assert_eq!(page.script_bodies().len(), 2);
        assert_eq!(page.jsonld_bodies(), vec![r#"{"@type":"Product"}"#.to_string()]);
    }
}
