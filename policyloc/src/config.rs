//! Tenant and policy settings written into the policy header.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The only namespace B2C custom policies are read and written in.
pub const POLICY_NAMESPACE: &str = "http://schemas.microsoft.com/online/cpim/schemas/2013/06";

/// Values for the `TrustFrameworkPolicy` root and its `BasePolicy`.
///
/// Every field has a default, so a TOML file only needs the ones that change:
///
/// ```toml
/// tenant_id = "contoso.onmicrosoft.com"
/// tenant_object_id = "00000000-0000-0000-0000-000000000000"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub namespace: String,
    pub schema_version: String,
    pub tenant_id: String,
    pub policy_id: String,
    /// Derived from tenant and policy id when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_policy_uri: Option<String>,
    pub tenant_object_id: String,
    pub base_policy_id: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            namespace: POLICY_NAMESPACE.to_string(),
            schema_version: "0.3.0.0".to_string(),
            tenant_id: "mediligoacc2.onmicrosoft.com".to_string(),
            policy_id: "B2C_1A_TrustFrameworkLocalization".to_string(),
            public_policy_uri: None,
            tenant_object_id: "8c890f10-c63f-4358-be89-cd18e895c6e8".to_string(),
            base_policy_id: "B2C_1A_TrustFrameworkBase".to_string(),
        }
    }
}

impl PolicyConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let config: PolicyConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn public_policy_uri(&self) -> String {
        self.public_policy_uri
            .clone()
            .unwrap_or_else(|| format!("http://{}/{}", self.tenant_id, self.policy_id))
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.namespace != POLICY_NAMESPACE {
            return Err(Error::validation_error(format!(
                "unsupported namespace `{}`, expected `{}`",
                self.namespace, POLICY_NAMESPACE
            )));
        }
        for (name, value) in [
            ("schema_version", &self.schema_version),
            ("tenant_id", &self.tenant_id),
            ("policy_id", &self.policy_id),
            ("base_policy_id", &self.base_policy_id),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation_error(format!("`{name}` cannot be empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_policy() {
        let config = PolicyConfig::default();
        assert_eq!(config.namespace, POLICY_NAMESPACE);
        assert_eq!(
            config.public_policy_uri(),
            "http://mediligoacc2.onmicrosoft.com/B2C_1A_TrustFrameworkLocalization"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PolicyConfig::from_toml_str(
            r#"
            tenant_id = "contoso.onmicrosoft.com"
            policy_id = "B2C_1A_Localization"
            "#,
        )
        .unwrap();
        assert_eq!(config.tenant_id, "contoso.onmicrosoft.com");
        assert_eq!(config.base_policy_id, "B2C_1A_TrustFrameworkBase");
        assert_eq!(
            config.public_policy_uri(),
            "http://contoso.onmicrosoft.com/B2C_1A_Localization"
        );
    }

    #[test]
    fn test_explicit_public_policy_uri() {
        let config =
            PolicyConfig::from_toml_str(r#"public_policy_uri = "https://example.com/p""#).unwrap();
        assert_eq!(config.public_policy_uri(), "https://example.com/p");
    }

    #[test]
    fn test_foreign_namespace_rejected() {
        let err = PolicyConfig::from_toml_str(r#"namespace = "urn:other""#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = PolicyConfig::from_toml_str(r#"tenant = "x""#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_tenant_rejected() {
        let err = PolicyConfig::from_toml_str(r#"tenant_id = " ""#).unwrap_err();
        assert!(err.to_string().contains("tenant_id"));
    }
}
