//! Ordered language lists.

use std::{collections::HashSet, fmt, ops::Deref};

use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// A non-empty, duplicate-free list of language codes.
///
/// The first code is the default language of the policy. Codes are kept as
/// written (`en`, `fr-CA`, ...) because they end up verbatim in resource ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageList(Vec<String>);

impl LanguageList {
    /// Validates every code as a BCP 47 language identifier.
    pub fn new<I, S>(languages: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut codes = Vec::new();
        for lang in languages {
            let lang: String = lang.into();
            let lang = lang.trim().to_string();
            if lang.is_empty() || lang.parse::<LanguageIdentifier>().is_err() {
                return Err(Error::InvalidLanguage(lang));
            }
            if !seen.insert(lang.clone()) {
                return Err(Error::DuplicateLanguage(lang));
            }
            codes.push(lang);
        }
        if codes.is_empty() {
            return Err(Error::NoLanguages);
        }
        Ok(LanguageList(codes))
    }

    /// The default language (first in the list).
    pub fn default_language(&self) -> &str {
        &self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Deref for LanguageList {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for LanguageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}
