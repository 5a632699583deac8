use policyloc::traits::Parser;
use policyloc::{
    Assembler, FlatKey, LanguageList, PolicyConfig, PolicyDocument, TranslationTable,
    extract_content_definitions,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn segment_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z][A-Za-z0-9_]{0,11}").expect("valid segment regex")
}

fn resource_id_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 1..4).prop_map(|segments| segments.join("."))
}

fn value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _\\-\\.,!\\?&<>\"'éü]{0,30}")
        .expect("valid value regex")
}

/// (element type, element id, string id)
fn element_strategy() -> impl Strategy<Value = (String, Option<String>, String)> {
    (
        segment_strategy(),
        prop::option::of(segment_strategy()),
        segment_strategy(),
    )
}

/// resource id -> flat key -> one value per language
type Dataset = BTreeMap<String, BTreeMap<String, Vec<String>>>;

fn dataset_strategy(language_count: usize) -> impl Strategy<Value = Dataset> {
    prop::collection::btree_map(
        resource_id_strategy(),
        prop::collection::vec(
            (
                element_strategy(),
                prop::collection::vec(value_strategy(), language_count),
            ),
            1..6,
        ),
        1..5,
    )
    .prop_map(|resources| {
        resources
            .into_iter()
            .map(|(resource_id, entries)| {
                let keys = entries
                    .into_iter()
                    .map(|((element_type, element_id, string_id), values)| {
                        let key = FlatKey::new(
                            &resource_id,
                            &element_type,
                            element_id.as_deref(),
                            &string_id,
                        );
                        (key.to_flat(), values)
                    })
                    .collect();
                (resource_id, keys)
            })
            .collect()
    })
}

fn build_table(languages: &[&str], dataset: &Dataset) -> TranslationTable {
    let mut table = TranslationTable::new();
    for (index, language) in languages.iter().enumerate() {
        for (resource_id, keys) in dataset {
            for (key, values) in keys {
                table.insert(language, resource_id, key.clone(), values[index].clone());
            }
        }
    }
    table
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_build_then_extract_is_identity(dataset in dataset_strategy(2)) {
        let languages = LanguageList::new(["en", "fr"]).unwrap();
        let table = build_table(&["en", "fr"], &dataset);

        let document = Assembler::new(PolicyConfig::default())
            .build(&table, &languages)
            .unwrap();
        let extracted = TranslationTable::from_document(&document, &languages).unwrap();
        prop_assert_eq!(extracted, table);
    }

    #[test]
    fn prop_roundtrip_survives_xml_text(dataset in dataset_strategy(3)) {
        let languages = LanguageList::new(["de", "en", "pt-BR"]).unwrap();
        let table = build_table(&["de", "en", "pt-BR"], &dataset);

        let document = Assembler::default().build(&table, &languages).unwrap();
        let xml = document.to_bytes().unwrap();
        let reparsed = PolicyDocument::from_bytes(&xml).unwrap();
        prop_assert_eq!(&reparsed, &document);

        let extracted = TranslationTable::from_document(&reparsed, &languages).unwrap();
        prop_assert_eq!(extracted, table);
    }

    #[test]
    fn prop_content_definitions_match_default_language(dataset in dataset_strategy(2)) {
        let languages = LanguageList::new(["fr", "en"]).unwrap();
        let table = build_table(&["fr", "en"], &dataset);
        let document = Assembler::default().build(&table, &languages).unwrap();

        let ids: BTreeSet<&str> = document
            .content_definitions
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        prop_assert_eq!(ids, table.resource_ids_for("fr"));
        prop_assert_eq!(
            document.supported_languages.as_ref().map(|s| s.default_language.as_str()),
            Some("fr")
        );
        prop_assert_eq!(
            extract_content_definitions(&document, "en").len(),
            dataset.len()
        );
    }

    #[test]
    fn prop_standalone_key_roundtrip(
        first in segment_strategy(),
        second in segment_strategy(),
        (element_type, element_id, string_id) in element_strategy(),
    ) {
        let key = FlatKey::new(
            &format!("{first}.{second}"),
            &element_type,
            element_id.as_deref(),
            &string_id,
        );
        let flat = key.to_flat();
        let segments = flat.split('.').count();
        prop_assert_eq!(segments, if element_id.is_some() { 5 } else { 4 });

        let parsed = FlatKey::parse(&flat).unwrap();
        prop_assert_eq!(parsed.to_flat(), flat);
        prop_assert_eq!(parsed, key);
    }

    #[test]
    fn prop_scoped_key_roundtrip(
        resource_id in resource_id_strategy(),
        (element_type, element_id, string_id) in element_strategy(),
    ) {
        let key = FlatKey::new(&resource_id, &element_type, element_id.as_deref(), &string_id);
        prop_assert_eq!(FlatKey::parse_scoped(&resource_id, &key.to_flat()).unwrap(), key);
    }
}
