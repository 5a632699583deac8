//! Per-language JSON stores and the two file-level pipelines.
//!
//! A store is `{dir}/{language}.json`:
//!
//! ```json
//! {
//!     "api.signup": {
//!         "api.signup.UxElement.heading": "Sign up"
//!     }
//! }
//! ```
//!
//! Stores are always written grouped like this. When reading, a top-level
//! string value is also accepted; its key is parsed as a standalone flat key
//! and grouped under its two-segment resource id.

use std::{
    collections::BTreeMap,
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, info};

use crate::{
    assemble::Assembler,
    disassemble,
    document::PolicyDocument,
    error::Error,
    key::FlatKey,
    language::LanguageList,
    table::{LanguageStrings, TranslationTable},
    traits::Parser,
};

/// A `null` text reads as an empty string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoreValue {
    Group(BTreeMap<String, Option<String>>),
    Text(Option<String>),
}

/// The strings of one language, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct JsonStore(pub LanguageStrings);

impl Parser for JsonStore {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let raw: BTreeMap<String, StoreValue> = serde_json::from_reader(reader)?;
        let mut strings = LanguageStrings::new();
        for (key, value) in raw {
            match value {
                StoreValue::Group(keys) => strings
                    .entry(key)
                    .or_default()
                    .extend(keys.into_iter().map(|(k, text)| (k, text.unwrap_or_default()))),
                StoreValue::Text(text) => {
                    let resource_id = FlatKey::parse(&key)?.resource_id;
                    strings
                        .entry(resource_id)
                        .or_default()
                        .insert(key, text.unwrap_or_default());
                }
            }
        }
        Ok(JsonStore(strings))
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut writer, formatter);
        self.serialize(&mut serializer)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

pub fn store_path<P: AsRef<Path>>(dir: P, language: &str) -> PathBuf {
    dir.as_ref().join(format!("{language}.json"))
}

/// Reads one store per language. Every path is checked before any is read.
pub fn read_stores<P: AsRef<Path>>(
    dir: P,
    languages: &LanguageList,
) -> Result<TranslationTable, Error> {
    let paths: Vec<(String, PathBuf)> = languages
        .iter()
        .map(|language| (language.to_string(), store_path(&dir, language)))
        .collect();
    if let Some((_, missing)) = paths.iter().find(|(_, path)| !path.is_file()) {
        return Err(Error::MissingStore(missing.clone()));
    }

    let mut stores = Vec::with_capacity(paths.len());
    for (language, path) in paths {
        let JsonStore(strings) = JsonStore::read_from(&path)?;
        debug!(path = %path.display(), resources = strings.len(), "read store");
        stores.push((language, strings));
    }
    Ok(TranslationTable::from_stores(stores))
}

/// Writes one store per language, creating `dir` if needed. All stores are
/// serialized before the first file is touched.
pub fn write_stores<P: AsRef<Path>>(
    dir: P,
    table: &TranslationTable,
    languages: &LanguageList,
) -> Result<Vec<PathBuf>, Error> {
    let mut outputs = Vec::with_capacity(languages.len());
    for language in languages.iter() {
        let store = JsonStore(table.language(language).cloned().unwrap_or_default());
        outputs.push((store_path(&dir, language), store.to_bytes()?));
    }

    fs::create_dir_all(dir.as_ref())?;
    let mut written = Vec::with_capacity(outputs.len());
    for (path, bytes) in outputs {
        fs::write(&path, bytes)?;
        written.push(path);
    }
    Ok(written)
}

/// JSON stores → policy XML.
pub fn generate<P: AsRef<Path>, Q: AsRef<Path>>(
    i18n_dir: P,
    languages: &LanguageList,
    output: Q,
    assembler: &Assembler,
) -> Result<PolicyDocument, Error> {
    let output = output.as_ref();
    info!(dir = %i18n_dir.as_ref().display(), %languages, "reading stores");
    let table = read_stores(i18n_dir, languages)?;
    let document = assembler.build(&table, languages)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    document.write_to(output)?;
    info!(
        output = %output.display(),
        strings = table.len(),
        "wrote policy"
    );
    Ok(document)
}

/// Policy XML → JSON stores.
pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    languages: &LanguageList,
    i18n_dir: Q,
) -> Result<TranslationTable, Error> {
    info!(input = %input.as_ref().display(), %languages, "reading policy");
    let document = PolicyDocument::read_from(input)?;
    let table = disassemble::extract(&document, languages)?;
    let written = write_stores(&i18n_dir, &table, languages)?;
    info!(
        dir = %i18n_dir.as_ref().display(),
        stores = written.len(),
        strings = table.len(),
        "wrote stores"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_grouped_store() {
        let json = r#"{
            "api.signup": {
                "api.signup.UxElement.heading": "Sign up",
                "api.signup.ClaimType.email.DisplayName": "Email"
            }
        }"#;
        let JsonStore(strings) = JsonStore::from_str(json).unwrap();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings["api.signup"].len(), 2);
    }

    #[test]
    fn test_read_flat_store() {
        let json = r#"{
            "api.signup.UxElement.heading": "Sign up",
            "api.signin.ClaimType.email.DisplayName": "Email"
        }"#;
        let JsonStore(strings) = JsonStore::from_str(json).unwrap();
        assert_eq!(
            strings["api.signup"]["api.signup.UxElement.heading"],
            "Sign up"
        );
        assert_eq!(
            strings["api.signin"]["api.signin.ClaimType.email.DisplayName"],
            "Email"
        );
    }

    #[test]
    fn test_read_null_text_as_empty() {
        let json = r#"{
            "api.signup": { "api.signup.UxElement.heading": null },
            "api.signin.UxElement.intro": null
        }"#;
        let JsonStore(strings) = JsonStore::from_str(json).unwrap();
        assert_eq!(strings["api.signup"]["api.signup.UxElement.heading"], "");
        assert_eq!(strings["api.signin"]["api.signin.UxElement.intro"], "");
    }

    #[test]
    fn test_read_flat_store_malformed_key() {
        let err = JsonStore::from_str(r#"{ "A.B.C": "x" }"#).unwrap_err();
        assert!(matches!(err, Error::MalformedKey { .. }));
    }

    #[test]
    fn test_read_store_rejects_nested_objects() {
        let err = JsonStore::from_str(r#"{ "api.a": { "k": { "deep": "x" } } }"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_write_store_uses_four_space_indent_and_literal_unicode() {
        let mut strings = LanguageStrings::new();
        strings.entry("api.a".to_string()).or_default().insert(
            "api.a.UxElement.heading".to_string(),
            "Créer un compte".to_string(),
        );
        let out = String::from_utf8(JsonStore(strings).to_bytes().unwrap()).unwrap();
        assert_eq!(
            out,
            "{\n    \"api.a\": {\n        \"api.a.UxElement.heading\": \"Créer un compte\"\n    }\n}\n"
        );
    }
}
