#![forbid(unsafe_code)]
//! Convert between per-language JSON string stores and an Azure AD B2C
//! `TrustFrameworkLocalization` policy.
//!
//! Translators edit flat JSON files; the policy engine wants one XML document
//! with content definitions, supported languages and a `LocalizedResources`
//! block per resource and language. Both directions go through the same
//! [`TranslationTable`] and the same flat key rules ([`FlatKey`]).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use policyloc::{Assembler, LanguageList, PolicyConfig};
//!
//! let languages = LanguageList::new(["en", "fr"])?;
//!
//! // i18n/en.json + i18n/fr.json -> policy
//! policyloc::generate("i18n", &languages, "TrustFrameworkLocalization.xml", &Assembler::new(PolicyConfig::default()))?;
//!
//! // policy -> i18n/en.json + i18n/fr.json
//! policyloc::extract("TrustFrameworkLocalization.xml", &languages, "i18n")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assemble;
pub mod config;
pub mod disassemble;
pub mod document;
pub mod error;
pub mod key;
pub mod language;
pub mod store;
pub mod table;
pub mod traits;

// Re-export most used types for easy consumption
pub use crate::{
    assemble::Assembler,
    config::{POLICY_NAMESPACE, PolicyConfig},
    disassemble::extract_content_definitions,
    document::PolicyDocument,
    error::Error,
    key::{ElementKey, FlatKey},
    language::LanguageList,
    store::{JsonStore, extract, generate},
    table::TranslationTable,
};
