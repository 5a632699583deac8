//! The in-memory translation table shared by both pipelines.

use std::collections::{BTreeMap, BTreeSet};

use crate::{disassemble, document::PolicyDocument, error::Error, language::LanguageList};

/// Flat key → text for one resource in one language.
pub type KeyMap = BTreeMap<String, String>;

/// Base resource id → strings, for one language. This is the shape of a JSON store.
pub type LanguageStrings = BTreeMap<String, KeyMap>;

/// language → base resource id → flat key → text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    languages: BTreeMap<String, LanguageStrings>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from one store per language. Keys are stored verbatim;
    /// they are only decoded when the XML is assembled.
    pub fn from_stores<I>(stores: I) -> Self
    where
        I: IntoIterator<Item = (String, LanguageStrings)>,
    {
        TranslationTable {
            languages: stores.into_iter().collect(),
        }
    }

    /// Rebuilds a table from a parsed policy.
    pub fn from_document(
        document: &PolicyDocument,
        languages: &LanguageList,
    ) -> Result<Self, Error> {
        disassemble::extract(document, languages)
    }

    pub fn insert(&mut self, language: &str, resource_id: &str, key: String, text: String) {
        self.languages
            .entry(language.to_string())
            .or_default()
            .entry(resource_id.to_string())
            .or_default()
            .insert(key, text);
    }

    /// Makes sure `language` is present even when it holds no strings.
    pub(crate) fn ensure_language(&mut self, language: &str) -> &mut LanguageStrings {
        self.languages.entry(language.to_string()).or_default()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn language(&self, language: &str) -> Option<&LanguageStrings> {
        self.languages.get(language)
    }

    /// Base resource ids present for `language`, sorted.
    pub fn resource_ids_for(&self, language: &str) -> BTreeSet<&str> {
        self.languages
            .get(language)
            .map(|resources| resources.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn strings_for(&self, language: &str, resource_id: &str) -> Option<&KeyMap> {
        self.languages.get(language)?.get(resource_id)
    }

    /// Total number of strings across all languages.
    pub fn len(&self) -> usize {
        self.languages
            .values()
            .flat_map(|resources| resources.values())
            .map(KeyMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that every language exposes exactly the resource ids of the
    /// default language.
    pub fn check_resource_sets(&self, languages: &LanguageList) -> Result<(), Error> {
        let default = languages.default_language();
        if !self.languages.contains_key(default) {
            return Err(Error::MissingLanguage(default.to_string()));
        }
        let expected = self.resource_ids_for(default);

        for language in languages.iter().skip(1) {
            if !self.languages.contains_key(language) {
                return Err(Error::MissingLanguage(language.to_string()));
            }
            let actual = self.resource_ids_for(language);
            if actual != expected {
                return Err(Error::InconsistentResources {
                    language: language.to_string(),
                    missing: expected.difference(&actual).map(|s| s.to_string()).collect(),
                    extra: actual.difference(&expected).map(|s| s.to_string()).collect(),
                });
            }
        }
        Ok(())
    }
}
