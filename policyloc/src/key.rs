//! Flat key codec.
//!
//! A flat key is the dotted string used in JSON stores to address one
//! `LocalizedString` inside a `LocalizedResources` block:
//!
//! ```text
//! api.signup.ClaimType.email.DisplayName   (resource, type, element id, string id)
//! api.signup.UxElement.button_continue     (resource, type, string id)
//! ```
//!
//! Standalone keys use a two-segment resource id, so the segment count (4 or 5)
//! is the only thing that tells the two shapes apart. When the owning resource
//! id is already known, [`FlatKey::parse_scoped`] strips it first, which allows
//! resource ids with any number of dots.

use std::fmt::{self, Display};

use crate::error::Error;

/// The element part of a key, decided once when the key is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKey {
    /// `elementType.elementId.stringId`
    WithElementId {
        element_type: String,
        element_id: String,
        string_id: String,
    },
    /// `elementType.stringId`
    WithoutElementId {
        element_type: String,
        string_id: String,
    },
}

impl ElementKey {
    pub fn new(element_type: &str, element_id: Option<&str>, string_id: &str) -> Self {
        match element_id.filter(|id| !id.is_empty()) {
            Some(element_id) => ElementKey::WithElementId {
                element_type: element_type.to_string(),
                element_id: element_id.to_string(),
                string_id: string_id.to_string(),
            },
            None => ElementKey::WithoutElementId {
                element_type: element_type.to_string(),
                string_id: string_id.to_string(),
            },
        }
    }

    pub fn element_type(&self) -> &str {
        match self {
            ElementKey::WithElementId { element_type, .. }
            | ElementKey::WithoutElementId { element_type, .. } => element_type,
        }
    }

    pub fn element_id(&self) -> Option<&str> {
        match self {
            ElementKey::WithElementId { element_id, .. } => Some(element_id),
            ElementKey::WithoutElementId { .. } => None,
        }
    }

    pub fn string_id(&self) -> &str {
        match self {
            ElementKey::WithElementId { string_id, .. }
            | ElementKey::WithoutElementId { string_id, .. } => string_id,
        }
    }

    fn from_segments(key: &str, segments: &[&str]) -> Result<Self, Error> {
        match *segments {
            [element_type, string_id] => Ok(ElementKey::new(element_type, None, string_id)),
            [element_type, element_id, string_id] => {
                Ok(ElementKey::new(element_type, Some(element_id), string_id))
            }
            _ => Err(Error::malformed_key(
                key,
                format!(
                    "expected 2 or 3 segments after the resource id, found {}",
                    segments.len()
                ),
            )),
        }
    }
}

impl Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKey::WithElementId {
                element_type,
                element_id,
                string_id,
            } => write!(f, "{element_type}.{element_id}.{string_id}"),
            ElementKey::WithoutElementId {
                element_type,
                string_id,
            } => write!(f, "{element_type}.{string_id}"),
        }
    }
}

/// A structured flat key: base resource id plus element part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlatKey {
    pub resource_id: String,
    pub element: ElementKey,
}

impl FlatKey {
    /// Builds a key from its parts. An empty `element_id` counts as absent.
    pub fn new(
        resource_id: &str,
        element_type: &str,
        element_id: Option<&str>,
        string_id: &str,
    ) -> Self {
        FlatKey {
            resource_id: resource_id.to_string(),
            element: ElementKey::new(element_type, element_id, string_id),
        }
    }

    /// Like [`FlatKey::new`], but rejects parts that would not survive
    /// encoding: an empty element type or string id, or any element part
    /// containing a `.`.
    pub fn try_new(
        resource_id: &str,
        element_type: &str,
        element_id: Option<&str>,
        string_id: &str,
    ) -> Result<Self, Error> {
        let key = FlatKey::new(resource_id, element_type, element_id, string_id);
        let flat = key.to_flat();
        if resource_id.is_empty() || resource_id.split('.').any(str::is_empty) {
            return Err(Error::malformed_key(flat, "empty segment in resource id"));
        }
        for (name, value) in [("ElementType", element_type), ("StringId", string_id)] {
            if value.is_empty() {
                return Err(Error::malformed_key(flat, format!("empty {name}")));
            }
        }
        for (name, value) in [
            ("ElementType", element_type),
            ("ElementId", element_id.unwrap_or_default()),
            ("StringId", string_id),
        ] {
            if value.contains('.') {
                return Err(Error::malformed_key(
                    flat,
                    format!("{name} `{value}` contains '.'"),
                ));
            }
        }
        Ok(key)
    }

    /// Parses a standalone key of 4 or 5 non-empty segments. The first two
    /// segments form the resource id.
    ///
    /// ```rust
    /// use policyloc::FlatKey;
    /// let key = FlatKey::parse("A.B.ClaimsProvider.SignUp.DisplayText").unwrap();
    /// assert_eq!(key.resource_id, "A.B");
    /// assert_eq!(key.element.element_id(), Some("SignUp"));
    /// ```
    pub fn parse(flat: &str) -> Result<Self, Error> {
        let segments = split_segments(flat)?;
        match segments.len() {
            4 | 5 => Ok(FlatKey {
                resource_id: segments[..2].join("."),
                element: ElementKey::from_segments(flat, &segments[2..])?,
            }),
            n => Err(Error::malformed_key(
                flat,
                format!("expected 4 or 5 segments, found {n}"),
            )),
        }
    }

    /// Parses a key that belongs to `resource_id`. The key must start with
    /// `{resource_id}.` followed by 2 or 3 non-empty segments.
    pub fn parse_scoped(resource_id: &str, flat: &str) -> Result<Self, Error> {
        let rest = flat
            .strip_prefix(resource_id)
            .and_then(|rest| rest.strip_prefix('.'))
            .filter(|_| !resource_id.is_empty())
            .ok_or_else(|| {
                Error::malformed_key(
                    flat,
                    format!("key does not start with resource id `{resource_id}`"),
                )
            })?;
        let segments = split_segments(rest).map_err(|_| {
            Error::malformed_key(flat, "empty segment after the resource id")
        })?;
        Ok(FlatKey {
            resource_id: resource_id.to_string(),
            element: ElementKey::from_segments(flat, &segments)?,
        })
    }

    /// Encodes the key back into its dotted form.
    pub fn to_flat(&self) -> String {
        self.to_string()
    }
}

impl Display for FlatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource_id, self.element)
    }
}

fn split_segments(flat: &str) -> Result<Vec<&str>, Error> {
    let segments: Vec<&str> = flat.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::malformed_key(flat, "empty segment"));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_four_segments() {
        let key = FlatKey::parse("api.signup.UxElement.button_continue").unwrap();
        assert_eq!(key.resource_id, "api.signup");
        assert_eq!(
            key.element,
            ElementKey::WithoutElementId {
                element_type: "UxElement".to_string(),
                string_id: "button_continue".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_five_segments() {
        let key = FlatKey::parse("A.B.ClaimsProvider.SignUp.DisplayText").unwrap();
        assert_eq!(key.resource_id, "A.B");
        assert_eq!(key.element.element_type(), "ClaimsProvider");
        assert_eq!(key.element.element_id(), Some("SignUp"));
        assert_eq!(key.element.string_id(), "DisplayText");
    }

    #[test]
    fn test_parse_rejects_other_segment_counts() {
        for flat in ["A.B.C", "A", "A.B.C.D.E.F", ""] {
            let err = FlatKey::parse(flat).unwrap_err();
            assert!(matches!(err, Error::MalformedKey { .. }), "{flat}");
        }
    }

    #[test]
    fn test_parse_rejects_empty_segment() {
        let err = FlatKey::parse("A..C.D").unwrap_err();
        assert!(err.to_string().contains("empty segment"));
    }

    #[test]
    fn test_parse_scoped_with_dotted_resource_id() {
        let key = FlatKey::parse_scoped(
            "Ids.ClaimsProviders.Page",
            "Ids.ClaimsProviders.Page.Error.ErrorMessage",
        )
        .unwrap();
        assert_eq!(key.resource_id, "Ids.ClaimsProviders.Page");
        assert_eq!(key.element.element_type(), "Error");
        assert_eq!(key.element.element_id(), None);
        assert_eq!(key.element.string_id(), "ErrorMessage");
    }

    #[test]
    fn test_parse_scoped_rejects_foreign_prefix() {
        let err = FlatKey::parse_scoped("api.signin", "api.signup.UxElement.x").unwrap_err();
        assert!(err.to_string().contains("does not start with resource id"));
    }

    #[test]
    fn test_parse_scoped_rejects_prefix_without_separator() {
        assert!(FlatKey::parse_scoped("api.sign", "api.signup.UxElement.x").is_err());
    }

    #[test]
    fn test_parse_scoped_three_segment_key() {
        let err = FlatKey::parse_scoped("A.B", "A.B.C").unwrap_err();
        assert!(matches!(err, Error::MalformedKey { .. }));
    }

    #[test]
    fn test_empty_element_id_is_absent() {
        let key = FlatKey::new("api.signup", "UxElement", Some(""), "heading");
        assert_eq!(key.to_flat(), "api.signup.UxElement.heading");
    }

    #[test]
    fn test_try_new_rejects_dotted_parts() {
        let err = FlatKey::try_new("api.signup", "UxElement", None, "a.b").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedKey { ref key, .. } if key == "api.signup.UxElement.a.b"
        ));
        assert!(err.to_string().contains("StringId `a.b`"));

        assert!(FlatKey::try_new("api.signup", "Ux.Element", None, "x").is_err());
        assert!(FlatKey::try_new("api.signup", "ClaimType", Some("e.mail"), "x").is_err());
    }

    #[test]
    fn test_try_new_rejects_empty_parts() {
        assert!(FlatKey::try_new("api.signup", "", None, "heading").is_err());
        assert!(FlatKey::try_new("api.signup", "UxElement", None, "").is_err());
        assert!(FlatKey::try_new("", "UxElement", None, "heading").is_err());
        assert!(FlatKey::try_new("api..signup", "UxElement", None, "heading").is_err());
    }

    #[test]
    fn test_try_new_accepts_what_parse_scoped_reads_back() {
        let key =
            FlatKey::try_new("Ids.ClaimsProviders.Page", "Error", Some(""), "ErrorMessage")
                .unwrap();
        assert_eq!(
            FlatKey::parse_scoped("Ids.ClaimsProviders.Page", &key.to_flat()).unwrap(),
            key
        );
    }

    #[test]
    fn test_encode_then_parse() {
        let with_id = FlatKey::new("api.signup", "ClaimType", Some("email"), "DisplayName");
        assert_eq!(with_id.to_flat(), "api.signup.ClaimType.email.DisplayName");
        assert_eq!(FlatKey::parse(&with_id.to_flat()).unwrap(), with_id);

        let scoped = FlatKey::new("a.b.c", "ErrorMsg", None, "Required");
        assert_eq!(
            FlatKey::parse_scoped("a.b.c", &scoped.to_flat()).unwrap(),
            scoped
        );
    }
}
