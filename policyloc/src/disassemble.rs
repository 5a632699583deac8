//! Rebuilds a translation table from a policy document.
//!
//! Blocks are assigned to a language by the `.{language}` suffix of their id.
//! A language code containing a dot could make that ambiguous; no such code
//! is valid BCP 47, so it is not special-cased.

use tracing::debug;

use crate::{
    document::{ContentDefinition, LocalizedString, PolicyDocument},
    error::Error,
    key::FlatKey,
    language::LanguageList,
    table::TranslationTable,
};

/// Strips `.{language}` from a qualified resource id. Returns `None` when the
/// id belongs to another language or nothing would remain.
pub fn base_resource_id<'a>(qualified: &'a str, language: &str) -> Option<&'a str> {
    qualified
        .strip_suffix(language)?
        .strip_suffix('.')
        .filter(|base| !base.is_empty())
}

/// Every requested language gets an entry in the table, even if the document
/// holds no block for it. A string whose attributes cannot be encoded as a
/// flat key is `MalformedKey`.
pub fn extract(
    document: &PolicyDocument,
    languages: &LanguageList,
) -> Result<TranslationTable, Error> {
    let mut table = TranslationTable::new();

    for language in languages.iter() {
        table.ensure_language(language);
        for resources in &document.localized_resources {
            let Some(base) = base_resource_id(&resources.id, language) else {
                continue;
            };
            let keys = table
                .ensure_language(language)
                .entry(base.to_string())
                .or_default();
            for string in &resources.strings {
                keys.insert(flat_key(base, string)?, string.text.clone());
            }
            debug!(
                resource = base,
                language,
                strings = resources.strings.len(),
                "extracted localized resources"
            );
        }
    }

    Ok(table)
}

fn flat_key(base: &str, string: &LocalizedString) -> Result<String, Error> {
    let key = FlatKey::try_new(
        base,
        &string.element_type,
        string.element_id.as_deref(),
        &string.string_id,
    )?;
    Ok(key.to_flat())
}

/// Content definitions referencing `language`, each narrowed to its
/// references for that language. Definitions without one are left out.
pub fn extract_content_definitions(
    document: &PolicyDocument,
    language: &str,
) -> Vec<ContentDefinition> {
    document
        .content_definitions
        .iter()
        .filter_map(|definition| {
            let references: Vec<_> = definition
                .localized_resources_references
                .iter()
                .filter(|r| r.language == language)
                .cloned()
                .collect();
            (!references.is_empty()).then(|| ContentDefinition {
                id: definition.id.clone(),
                localized_resources_references: references,
            })
        })
        .collect()
}
