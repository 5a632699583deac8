//! Typed model of a `TrustFrameworkLocalization` policy and its XML form.
//!
//! Only the parts of the policy this crate produces are modelled. The reader
//! skips everything else, so hand-edited policies with extra building blocks
//! still load.

use std::{
    collections::BTreeMap,
    io::{BufRead, Write},
};

use quick_xml::{
    NsReader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    name::{Namespace, ResolveResult},
};
use serde::Serialize;

use crate::{
    config::{POLICY_NAMESPACE, PolicyConfig},
    error::Error,
    traits::Parser,
};

const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDocument {
    /// Root and `BasePolicy` values.
    pub header: PolicyConfig,
    pub content_definitions: Vec<ContentDefinition>,
    pub supported_languages: Option<SupportedLanguages>,
    pub localized_resources: Vec<LocalizedResources>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContentDefinition {
    pub id: String,
    pub localized_resources_references: Vec<LocalizedResourcesReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalizedResourcesReference {
    pub language: String,
    pub localized_resources_reference_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLanguages {
    pub default_language: String,
    pub languages: Vec<String>,
}

/// One `LocalizedResources` block; `id` is language-qualified (`api.signup.en`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedResources {
    pub id: String,
    pub strings: Vec<LocalizedString>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedString {
    pub element_type: String,
    pub element_id: Option<String>,
    pub string_id: String,
    pub text: String,
}

impl PolicyDocument {
    pub fn new(header: PolicyConfig) -> Self {
        PolicyDocument {
            header,
            content_definitions: Vec::new(),
            supported_languages: None,
            localized_resources: Vec::new(),
        }
    }

    pub fn find_localized_resources(&self, id: &str) -> Option<&LocalizedResources> {
        self.localized_resources.iter().find(|r| r.id == id)
    }
}

impl Parser for PolicyDocument {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = NsReader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut builder = DocumentBuilder::new(POLICY_NAMESPACE);
        let mut buf = Vec::new();

        loop {
            {
                let (resolved, event) = match xml_reader.read_resolved_event_into(&mut buf) {
                    Ok(pair) => pair,
                    Err(e) => return Err(Error::ParseFailure(e.to_string())),
                };
                let in_namespace = matches!(
                    resolved,
                    ResolveResult::Bound(Namespace(ns)) if ns == POLICY_NAMESPACE.as_bytes()
                );
                match event {
                    Event::Start(e) => builder.open(&e, in_namespace, false)?,
                    Event::Empty(e) => builder.open(&e, in_namespace, true)?,
                    Event::Text(e) => builder.text(&e.unescape()?),
                    Event::CData(e) => {
                        let text = e.decode().map_err(|e| Error::ParseFailure(e.to_string()))?;
                        builder.text(&text)
                    }
                    Event::End(_) => builder.close(),
                    Event::Eof => break,
                    _ => {}
                }
            }
            buf.clear();
        }

        builder.finish()
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 2);
        let header = &self.header;

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let public_policy_uri = header.public_policy_uri();
        let mut root = BytesStart::new("TrustFrameworkPolicy");
        root.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
        root.push_attribute(("xmlns:xsd", XSD_NAMESPACE));
        root.push_attribute(("xmlns", header.namespace.as_str()));
        root.push_attribute(("PolicySchemaVersion", header.schema_version.as_str()));
        root.push_attribute(("TenantId", header.tenant_id.as_str()));
        root.push_attribute(("PolicyId", header.policy_id.as_str()));
        root.push_attribute(("PublicPolicyUri", public_policy_uri.as_str()));
        root.push_attribute(("TenantObjectId", header.tenant_object_id.as_str()));
        xml_writer.write_event(Event::Start(root))?;

        xml_writer.write_event(Event::Start(BytesStart::new("BasePolicy")))?;
        write_text_element(&mut xml_writer, "TenantId", &header.tenant_id)?;
        write_text_element(&mut xml_writer, "PolicyId", &header.base_policy_id)?;
        xml_writer.write_event(Event::End(BytesEnd::new("BasePolicy")))?;

        xml_writer.write_event(Event::Start(BytesStart::new("BuildingBlocks")))?;

        xml_writer.write_event(Event::Start(BytesStart::new("ContentDefinitions")))?;
        for definition in &self.content_definitions {
            let mut elem = BytesStart::new("ContentDefinition");
            elem.push_attribute(("Id", definition.id.as_str()));
            xml_writer.write_event(Event::Start(elem))?;

            let mut refs = BytesStart::new("LocalizedResourcesReferences");
            refs.push_attribute(("MergeBehavior", "Prepend"));
            xml_writer.write_event(Event::Start(refs))?;
            for reference in &definition.localized_resources_references {
                let mut elem = BytesStart::new("LocalizedResourcesReference");
                elem.push_attribute(("Language", reference.language.as_str()));
                elem.push_attribute((
                    "LocalizedResourcesReferenceId",
                    reference.localized_resources_reference_id.as_str(),
                ));
                xml_writer.write_event(Event::Empty(elem))?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new("LocalizedResourcesReferences")))?;
            xml_writer.write_event(Event::End(BytesEnd::new("ContentDefinition")))?;
        }
        xml_writer.write_event(Event::End(BytesEnd::new("ContentDefinitions")))?;

        let mut localization = BytesStart::new("Localization");
        localization.push_attribute(("Enabled", "true"));
        xml_writer.write_event(Event::Start(localization))?;

        if let Some(supported) = &self.supported_languages {
            let mut elem = BytesStart::new("SupportedLanguages");
            elem.push_attribute(("DefaultLanguage", supported.default_language.as_str()));
            elem.push_attribute(("MergeBehavior", "ReplaceAll"));
            xml_writer.write_event(Event::Start(elem))?;
            for language in &supported.languages {
                write_text_element(&mut xml_writer, "SupportedLanguage", language)?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new("SupportedLanguages")))?;
        }

        for resources in &self.localized_resources {
            let mut elem = BytesStart::new("LocalizedResources");
            elem.push_attribute(("Id", resources.id.as_str()));
            xml_writer.write_event(Event::Start(elem))?;
            xml_writer.write_event(Event::Start(BytesStart::new("LocalizedStrings")))?;
            for string in &resources.strings {
                let mut elem = BytesStart::new("LocalizedString");
                elem.push_attribute(("ElementType", string.element_type.as_str()));
                if let Some(element_id) = &string.element_id {
                    elem.push_attribute(("ElementId", element_id.as_str()));
                }
                elem.push_attribute(("StringId", string.string_id.as_str()));
                xml_writer.write_event(Event::Start(elem))?;
                xml_writer.write_event(Event::Text(BytesText::new(&string.text)))?;
                xml_writer.write_event(Event::End(BytesEnd::new("LocalizedString")))?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new("LocalizedStrings")))?;
            xml_writer.write_event(Event::End(BytesEnd::new("LocalizedResources")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("Localization")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("BuildingBlocks")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("TrustFrameworkPolicy")))?;

        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(BytesStart::new(name)))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn read_attributes(e: &BytesStart<'_>) -> Result<BTreeMap<String, String>, Error> {
    let mut attributes = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        attributes.insert(key, attr.unescape_value()?.into_owned());
    }
    Ok(attributes)
}

fn required(
    attributes: &mut BTreeMap<String, String>,
    element: &str,
    name: &str,
) -> Result<String, Error> {
    attributes
        .remove(name)
        .ok_or_else(|| Error::InvalidResource(format!("{element} tag missing '{name}'")))
}

/// Elements the reader tracks; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Root,
    BasePolicy,
    BasePolicyId,
    ContentDefinition,
    SupportedLanguages,
    SupportedLanguage,
    LocalizedResources,
    LocalizedString,
    Other,
}

struct DocumentBuilder {
    namespace: &'static str,
    document: PolicyDocument,
    stack: Vec<Tag>,
    seen_root: bool,
}

impl DocumentBuilder {
    fn new(namespace: &'static str) -> Self {
        let header = PolicyConfig {
            namespace: namespace.to_string(),
            schema_version: String::new(),
            tenant_id: String::new(),
            policy_id: String::new(),
            public_policy_uri: None,
            tenant_object_id: String::new(),
            base_policy_id: String::new(),
        };
        DocumentBuilder {
            namespace,
            document: PolicyDocument::new(header),
            stack: Vec::new(),
            seen_root: false,
        }
    }

    fn parent(&self) -> Option<Tag> {
        self.stack.last().copied()
    }

    fn inside(&self, tag: Tag) -> bool {
        self.stack.contains(&tag)
    }

    fn open(&mut self, e: &BytesStart<'_>, in_namespace: bool, empty: bool) -> Result<(), Error> {
        let local_name = e.local_name();
        let name = local_name.as_ref();

        let tag = if self.stack.is_empty() {
            if self.seen_root {
                return Err(Error::ParseFailure(
                    "more than one root element".to_string(),
                ));
            }
            if name != b"TrustFrameworkPolicy" || !in_namespace {
                return Err(Error::ParseFailure(format!(
                    "expected a TrustFrameworkPolicy root in namespace `{}`, found `{}`",
                    self.namespace,
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            self.seen_root = true;
            self.read_header(e)?;
            Tag::Root
        } else if !in_namespace {
            Tag::Other
        } else {
            match (self.parent(), name) {
                (Some(Tag::Root), b"BasePolicy") => Tag::BasePolicy,
                (Some(Tag::BasePolicy), b"PolicyId") => Tag::BasePolicyId,
                (_, b"ContentDefinition") => {
                    let mut attributes = read_attributes(e)?;
                    let id = required(&mut attributes, "ContentDefinition", "Id")?;
                    self.document.content_definitions.push(ContentDefinition {
                        id,
                        localized_resources_references: Vec::new(),
                    });
                    Tag::ContentDefinition
                }
                (_, b"LocalizedResourcesReference") if self.inside(Tag::ContentDefinition) => {
                    let mut attributes = read_attributes(e)?;
                    let reference = LocalizedResourcesReference {
                        language: required(
                            &mut attributes,
                            "LocalizedResourcesReference",
                            "Language",
                        )?,
                        localized_resources_reference_id: required(
                            &mut attributes,
                            "LocalizedResourcesReference",
                            "LocalizedResourcesReferenceId",
                        )?,
                    };
                    if let Some(definition) = self.document.content_definitions.last_mut() {
                        definition.localized_resources_references.push(reference);
                    }
                    Tag::Other
                }
                (_, b"SupportedLanguages") => {
                    let mut attributes = read_attributes(e)?;
                    self.document.supported_languages = Some(SupportedLanguages {
                        default_language: attributes
                            .remove("DefaultLanguage")
                            .unwrap_or_default(),
                        languages: Vec::new(),
                    });
                    Tag::SupportedLanguages
                }
                (Some(Tag::SupportedLanguages), b"SupportedLanguage") => {
                    if let Some(supported) = self.document.supported_languages.as_mut() {
                        supported.languages.push(String::new());
                    }
                    Tag::SupportedLanguage
                }
                (_, b"LocalizedResources") => {
                    let mut attributes = read_attributes(e)?;
                    let id = required(&mut attributes, "LocalizedResources", "Id")?;
                    self.document
                        .localized_resources
                        .push(LocalizedResources {
                            id,
                            strings: Vec::new(),
                        });
                    Tag::LocalizedResources
                }
                (_, b"LocalizedString") if self.inside(Tag::LocalizedResources) => {
                    let mut attributes = read_attributes(e)?;
                    let string = LocalizedString {
                        element_type: required(&mut attributes, "LocalizedString", "ElementType")?,
                        element_id: attributes.remove("ElementId").filter(|id| !id.is_empty()),
                        string_id: required(&mut attributes, "LocalizedString", "StringId")?,
                        text: String::new(),
                    };
                    if let Some(resources) = self.document.localized_resources.last_mut() {
                        resources.strings.push(string);
                    }
                    Tag::LocalizedString
                }
                _ => Tag::Other,
            }
        };

        if empty {
            self.finish_tag(tag);
        } else {
            self.stack.push(tag);
        }
        Ok(())
    }

    fn read_header(&mut self, e: &BytesStart<'_>) -> Result<(), Error> {
        let mut attributes = read_attributes(e)?;
        let header = &mut self.document.header;
        header.schema_version = attributes.remove("PolicySchemaVersion").unwrap_or_default();
        header.tenant_id = attributes.remove("TenantId").unwrap_or_default();
        header.policy_id = attributes.remove("PolicyId").unwrap_or_default();
        header.public_policy_uri = attributes.remove("PublicPolicyUri");
        header.tenant_object_id = attributes.remove("TenantObjectId").unwrap_or_default();
        Ok(())
    }

    fn text(&mut self, text: &str) {
        let target = match self.parent() {
            Some(Tag::LocalizedString) => self
                .document
                .localized_resources
                .last_mut()
                .and_then(|r| r.strings.last_mut())
                .map(|s| &mut s.text),
            Some(Tag::SupportedLanguage) => self
                .document
                .supported_languages
                .as_mut()
                .and_then(|s| s.languages.last_mut()),
            Some(Tag::BasePolicyId) => Some(&mut self.document.header.base_policy_id),
            _ => None,
        };
        if let Some(target) = target {
            target.push_str(text);
        }
    }

    fn close(&mut self) {
        if let Some(tag) = self.stack.pop() {
            self.finish_tag(tag);
        }
    }

    fn finish_tag(&mut self, tag: Tag) {
        match tag {
            Tag::SupportedLanguage => {
                if let Some(language) = self
                    .document
                    .supported_languages
                    .as_mut()
                    .and_then(|s| s.languages.last_mut())
                {
                    *language = language.trim().to_string();
                }
            }
            Tag::BasePolicyId => {
                let id = &mut self.document.header.base_policy_id;
                *id = id.trim().to_string();
            }
            _ => {}
        }
    }

    fn finish(self) -> Result<PolicyDocument, Error> {
        if !self.seen_root {
            return Err(Error::ParseFailure(
                "document has no TrustFrameworkPolicy root".to_string(),
            ));
        }
        if !self.stack.is_empty() {
            return Err(Error::ParseFailure(
                "unexpected end of document".to_string(),
            ));
        }
        Ok(self.document)
    }
}
