use crate::config::ScrapeConfig;
use crate::error::*;
use crate::page::Page;
use crate::tools::clean::{listing_url, ProductIdPattern};
use crate::tools::{enrich, extract, project, reconcile, scrape};
use crate::types::*;
use chrono::Utc;
use tracing::{debug, info};

/// Inputs every extractor tier reads from.
pub struct ExtractContext<'a> {
    pub page: &'a Page,
    pub entries: &'a [StructuredDataEntry],
    pub config: &'a ScrapeConfig,
    pub ids: &'a ProductIdPattern,
}

/// One tier of the extraction cascade. An empty result hands over to the next.
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, cx: &ExtractContext<'_>) -> Vec<RawItem>;
}

pub struct JsonLdExtractor;
impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json-ld"
    }
    fn extract(&self, cx: &ExtractContext<'_>) -> Vec<RawItem> {
        extract::extract_jsonld_items(cx.entries)
    }
}

pub struct EmbeddedStateExtractor;
impl Extractor for EmbeddedStateExtractor {
    fn name(&self) -> &'static str {
        "embedded-state"
    }
    fn extract(&self, cx: &ExtractContext<'_>) -> Vec<RawItem> {
        extract::extract_state_items(cx.page, &cx.config.marketplace, cx.ids)
    }
}

pub struct ResultCardExtractor;
impl Extractor for ResultCardExtractor {
    fn name(&self) -> &'static str {
        "result-cards"
    }
    fn extract(&self, cx: &ExtractContext<'_>) -> Vec<RawItem> {
        extract::extract_card_items(cx.page, &cx.config.marketplace, cx.ids)
    }
}

/// Structured data, then embedded state, then rendered cards.
pub fn default_extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(JsonLdExtractor),
        Box::new(EmbeddedStateExtractor),
        Box::new(ResultCardExtractor),
    ]
}

/// Retained records of one page, before and after keying.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Tier that produced the raw items, if any did.
    pub tier: Option<&'static str>,
    /// Records that passed the identifier gate.
    pub retained: usize,
    pub products: OutputSet,
}

pub struct Engine {
    config: ScrapeConfig,
    ids: ProductIdPattern,
    extractors: Vec<Box<dyn Extractor>>,
}

impl Engine {
    /// Validate `config` and compile its identifier pattern.
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        config.validate()?;
        let ids = config.id_pattern()?;
        Ok(Self {
            config,
            ids,
            extractors: default_extractors(),
        })
    }

    /// Replace the extractor cascade.
    pub fn with_extractors(mut self, extractors: Vec<Box<dyn Extractor>>) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Listing URL searched for `term`.
    pub fn listing_url(&self, term: &str) -> String {
        listing_url(term, &self.config.marketplace)
    }

    /// Raw items from the first tier that yields any.
    pub fn extract_items(
        &self,
        page: &Page,
        entries: &[StructuredDataEntry],
    ) -> (Option<&'static str>, Vec<RawItem>) {
        let cx = ExtractContext {
            page,
            entries,
            config: &self.config,
            ids: &self.ids,
        };
        for extractor in &self.extractors {
            let items = extractor.extract(&cx);
            if !items.is_empty() {
                info!(tier = extractor.name(), items = items.len(), "extracted items");
                return (Some(extractor.name()), items);
            }
            debug!(tier = extractor.name(), "tier yielded nothing");
        }
        info!("no extractor tier produced items");
        (None, Vec::new())
    }

    /// Project, enrich, filter, reconcile and key the products of `page`.
    pub fn process(&self, page: &Page) -> Extraction {
        let entries = scrape::scrape_products(page);
        let (tier, items) = self.extract_items(page, &entries);

        let mut records = project::project(&items, &self.config.fields, &self.ids);
        enrich::enrich(page, &mut records, &self.ids);

        let mut records = reconcile::filter_valid_ids(records, &self.ids);
        let retained = records.len();
        reconcile::reconcile(&mut records, &entries, &self.ids);

        let products = reconcile::collect(records);
        info!(retained, keyed = products.len(), "collected products");

        Extraction {
            tier,
            retained,
            products,
        }
    }

    /// Full result of one run over an already loaded page.
    pub fn run(&self, term: &str, page: &Page) -> ScrapeOutput {
        let extraction = self.process(page);
        ScrapeOutput {
            term: term.to_string(),
            url: self.listing_url(term),
            scraped_at: Utc::now(),
            count: extraction.retained,
            products: extraction.products,
        }
    }

    /// Parse a saved listing snapshot for `term` and run over it. Relative
    /// links resolve against the listing URL.
    pub fn run_html(&self, term: &str, html: &str) -> Result<ScrapeOutput> {
        let page = Page::parse(html, &self.listing_url(term))?;
        Ok(self.run(term, &page))
    }
}
