use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractionError>;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("malformed JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("no product identifier in url {0:?}")]
    MissingProductId(Option<String>),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        ExtractionError::Json {
            context: context.into(),
            source,
        }
    }
}
