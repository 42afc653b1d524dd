//! Run configuration threaded through every pipeline stage.

use crate::error::*;
use crate::tools::clean::ProductIdPattern;
use crate::types::FieldSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Marketplace-specific constants the heuristics depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Marketplace {
    /// Alphabetic prefixes of product identifiers (`MLB1027172671`).
    pub id_prefixes: Vec<String>,
    /// Host of canonical product pages.
    pub canonical_host: String,
    /// Host serving search-result listings.
    pub listing_host: String,
    /// Image CDN host used to build picture URLs from embedded state.
    pub image_host: String,
    /// Substring identifying marketplace links in card anchors.
    pub domain_keyword: String,
}

impl Default for Marketplace {
    fn default() -> Self {
        Self {
            id_prefixes: vec!["MLB".into(), "MLA".into(), "MLU".into()],
            canonical_host: "www.mercadolivre.com.br".into(),
            listing_host: "lista.mercadolivre.com.br".into(),
            image_host: "http2.mlstatic.com".into(),
            domain_keyword: "mercadolivre".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapeConfig {
    pub fields: FieldSpec,
    pub marketplace: Marketplace,
}

impl ScrapeConfig {
    /// Parse a JSON config document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: ScrapeConfig =
            serde_json::from_str(json).map_err(|e| ExtractionError::json("config", e))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.marketplace;
        if m.id_prefixes.is_empty() {
            return Err(ExtractionError::Config("idPrefixes must not be empty".into()));
        }
        if let Some(bad) = m
            .id_prefixes
            .iter()
            .find(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_alphabetic()))
        {
            return Err(ExtractionError::Config(format!(
                "id prefix {bad:?} must be ascii letters"
            )));
        }
        if m.canonical_host.trim().is_empty() || m.listing_host.trim().is_empty() {
            return Err(ExtractionError::Config("hosts must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for field in self.fields.iter() {
            if field.name.trim().is_empty() {
                return Err(ExtractionError::Config("field names must not be empty".into()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ExtractionError::Config(format!(
                    "field {:?} declared twice",
                    field.name
                )));
            }
        }
        Ok(())
    }

    /// Compile the identifier pattern for the configured prefixes.
    pub fn id_pattern(&self) -> Result<ProductIdPattern> {
        ProductIdPattern::new(&self.marketplace.id_prefixes)
    }
}
