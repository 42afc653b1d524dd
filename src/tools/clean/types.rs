use crate::error::*;
use regex::Regex;

/// Marketplace product identifier matcher (`MLB1027172671`, `mlb-1027172671`).
#[derive(Debug, Clone)]
pub struct ProductIdPattern {
    /// Identifier anywhere in a string, separator allowed.
    find: Regex,
    /// Whole normalized identifier.
    exact: Regex,
}

impl ProductIdPattern {
    pub fn new(prefixes: &[String]) -> Result<Self> {
        if prefixes.is_empty() {
            return Err(ExtractionError::Config("no identifier prefixes".into()));
        }
        let alternation = prefixes
            .iter()
            .map(|p| regex::escape(&p.to_ascii_uppercase()))
            .collect::<Vec<_>>()
            .join("|");
        let find = Regex::new(&format!(r"(?i)(?:{alternation})-?\d+"))
            .map_err(|e| ExtractionError::Config(e.to_string()))?;
        let exact = Regex::new(&format!(r"^(?:{alternation})\d+$"))
            .map_err(|e| ExtractionError::Config(e.to_string()))?;
        Ok(Self { find, exact })
    }

    /// First identifier occurrence as written in `text`.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.find.find(text).map(|m| m.as_str())
    }

    /// Byte range of the first identifier occurrence in `text`.
    pub fn locate(&self, text: &str) -> Option<(usize, usize)> {
        self.find.find(text).map(|m| (m.start(), m.end()))
    }

    pub fn contains_id(&self, text: &str) -> bool {
        self.find.is_match(text)
    }

    /// Normalized identifier found in `text`: uppercase, separators removed.
    pub fn derive(&self, text: &str) -> Option<String> {
        self.find(text).map(|raw| raw.to_ascii_uppercase().replace('-', ""))
    }

    /// Whether `id` is a complete, normalized identifier.
    pub fn is_valid(&self, id: &str) -> bool {
        self.exact.is_match(id)
    }
}

impl Default for ProductIdPattern {
    fn default() -> Self {
        let prefixes = ["MLB", "MLA", "MLU"].map(String::from);
        Self::new(&prefixes).expect("default identifier prefixes are valid")
    }
}
