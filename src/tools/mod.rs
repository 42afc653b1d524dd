// Extraction tiers
pub mod extract;
pub mod scrape;

// Record pipeline
pub mod enrich;
pub mod project;
pub mod reconcile;

// Shared helpers
pub mod clean;
