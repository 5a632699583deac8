//! All error types for the policyloc crate.
//!
//! Every failure is a deterministic function of the input, so nothing here is
//! retryable: a run either completes or stops at the first error.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed key `{key}`: {reason}")]
    MalformedKey { key: String, reason: String },

    #[error("missing store: {}", .0.display())]
    MissingStore(PathBuf),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("policy parse failure: {0}")]
    ParseFailure(String),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("invalid language code `{0}`")]
    InvalidLanguage(String),

    #[error("at least one language is required")]
    NoLanguages,

    #[error("language `{0}` listed more than once")]
    DuplicateLanguage(String),

    #[error("no strings found for language `{0}`")]
    MissingLanguage(String),

    #[error(
        "resource ids for `{language}` differ from the default language (missing: [{}], extra: [{}])",
        .missing.join(", "),
        .extra.join(", ")
    )]
    InconsistentResources {
        language: String,
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Creates a malformed key error.
    pub fn malformed_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(quick_xml::Error::InvalidAttr(value))
    }
}
