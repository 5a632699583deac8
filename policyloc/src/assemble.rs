//! Builds a policy document from a translation table.

use tracing::{debug, warn};

use crate::{
    config::PolicyConfig,
    document::{
        ContentDefinition, LocalizedResources, LocalizedResourcesReference, LocalizedString,
        PolicyDocument, SupportedLanguages,
    },
    error::Error,
    key::FlatKey,
    language::LanguageList,
    table::TranslationTable,
};

/// Language-qualified resource id, as used for `LocalizedResources@Id`.
pub fn qualified_resource_id(resource_id: &str, language: &str) -> String {
    format!("{resource_id}.{language}")
}

#[derive(Debug, Clone, Default)]
pub struct Assembler {
    config: PolicyConfig,
    allow_divergent_resources: bool,
}

impl Assembler {
    pub fn new(config: PolicyConfig) -> Self {
        Assembler {
            config,
            allow_divergent_resources: false,
        }
    }

    /// When set, languages whose resource ids differ from the default
    /// language only produce a warning. Content definitions still follow the
    /// default language, so extra resources of other languages are left
    /// unreferenced.
    pub fn allow_divergent_resources(mut self, allow: bool) -> Self {
        self.allow_divergent_resources = allow;
        self
    }

    pub fn build(
        &self,
        table: &TranslationTable,
        languages: &LanguageList,
    ) -> Result<PolicyDocument, Error> {
        if let Err(e) = table.check_resource_sets(languages) {
            if !self.allow_divergent_resources {
                return Err(e);
            }
            warn!("{e}");
        }

        let mut header = self.config.clone();
        header.public_policy_uri = Some(self.config.public_policy_uri());
        let mut document = PolicyDocument::new(header);
        let default_language = languages.default_language();

        document.content_definitions = table
            .resource_ids_for(default_language)
            .into_iter()
            .map(|resource_id| ContentDefinition {
                id: resource_id.to_string(),
                localized_resources_references: languages
                    .iter()
                    .map(|language| LocalizedResourcesReference {
                        language: language.to_string(),
                        localized_resources_reference_id: qualified_resource_id(
                            resource_id,
                            language,
                        ),
                    })
                    .collect(),
            })
            .collect();

        document.supported_languages = Some(SupportedLanguages {
            default_language: default_language.to_string(),
            languages: languages.to_vec(),
        });

        for language in languages.iter() {
            let Some(resources) = table.language(language) else {
                continue;
            };
            for (resource_id, keys) in resources {
                let strings = keys
                    .iter()
                    .map(|(flat, text)| localized_string(resource_id, flat, text))
                    .collect::<Result<Vec<_>, Error>>()?;
                debug!(
                    resource = %resource_id,
                    language,
                    strings = strings.len(),
                    "assembled localized resources"
                );
                document.localized_resources.push(LocalizedResources {
                    id: qualified_resource_id(resource_id, language),
                    strings,
                });
            }
        }

        Ok(document)
    }
}

fn localized_string(resource_id: &str, flat: &str, text: &str) -> Result<LocalizedString, Error> {
    let key = FlatKey::parse_scoped(resource_id, flat)?;
    Ok(LocalizedString {
        element_type: key.element.element_type().to_string(),
        element_id: key.element.element_id().map(str::to_string),
        string_id: key.element.string_id().to_string(),
        text: text.to_string(),
    })
}
