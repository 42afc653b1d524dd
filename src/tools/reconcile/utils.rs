use crate::tools::clean::{last_path_segment, ProductIdPattern};
use crate::types::{fields, ProductRecord};

/// Output key for records with neither a name nor an identifier.
pub(super) const UNNAMED_KEY: &str = "produto_sem_nome";

/// Identifier of a record: its `id` field, or the one in its source URL when
/// the field is not declared.
pub(super) fn record_id(record: &ProductRecord, ids: &ProductIdPattern) -> Option<String> {
    if record.declares(fields::ID) {
        return record
            .text(fields::ID)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }
    record.source_url.as_deref().and_then(|url| ids.derive(url))
}

pub(super) fn record_url(record: &ProductRecord) -> Option<&str> {
    record
        .text(fields::URL)
        .or(record.source_url.as_deref())
        .filter(|url| !url.is_empty())
}

pub(super) fn record_name(record: &ProductRecord) -> Option<&str> {
    record
        .text(fields::NAME)
        .or(record.display_name.as_deref())
        .filter(|name| !name.is_empty())
}

/// Lookup key of a structured-data URL: its identifier, else its last path segment.
pub(super) fn entry_key(url: &str, ids: &ProductIdPattern) -> Option<String> {
    ids.derive(url)
        .or_else(|| last_path_segment(url).map(str::to_string))
}

/// Key a record is stored under in the output set.
pub(super) fn display_key(record: &ProductRecord) -> String {
    record
        .display_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| record.text(fields::ID).filter(|id| !id.is_empty()))
        .unwrap_or(UNNAMED_KEY)
        .to_string()
}
