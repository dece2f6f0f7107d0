//! Generation-run configuration for rivet.
//!
//! Every key is optional; an empty document yields [`GeneratorConfig::default`].

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error as ThisError;

/// Namespace root used when the configuration does not name one.
pub const DEFAULT_NAMESPACE_ROOT: &str = "RivetGenerated";

/// Dispatch entry point a proxy base type must expose.
pub const DEFAULT_DISPATCH_METHOD: &str = "SendRequest";

pub const DEFAULT_RESPONSE_COMPLETION_SOURCE: &str = "Rivet.Invocation.IResponseCompletionSource";
pub const DEFAULT_INVOKABLE: &str = "Rivet.Invocation.IInvokable";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// GeneratorConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    pub namespace_root: String,
    pub dispatch_method: String,
    pub well_known: WellKnownNames,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub application_parts: Vec<String>,

    /// Worker count for the parallel pass; zero means one per available core.
    pub parallelism: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace_root: DEFAULT_NAMESPACE_ROOT.to_string(),
            dispatch_method: DEFAULT_DISPATCH_METHOD.to_string(),
            well_known: WellKnownNames::default(),
            application_parts: Vec::new(),
            parallelism: 0,
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dotted_ident("namespace-root", &self.namespace_root)?;
        validate_dotted_ident("dispatch-method", &self.dispatch_method)?;
        if self.dispatch_method.contains('.') {
            return Err(ConfigError::Invalid(format!(
                "dispatch-method '{}' must be a single identifier",
                self.dispatch_method
            )));
        }

        validate_dotted_ident(
            "well-known.response-completion-source",
            &self.well_known.response_completion_source,
        )?;
        validate_dotted_ident("well-known.invokable", &self.well_known.invokable)?;

        if self.application_parts.iter().any(String::is_empty) {
            return Err(ConfigError::Invalid(
                "application-parts must not contain empty names".to_string(),
            ));
        }

        Ok(())
    }
}

///
/// WellKnownNames
/// Fully-qualified names of the runtime types the dispatch contract refers to.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WellKnownNames {
    pub response_completion_source: String,
    pub invokable: String,
}

impl Default for WellKnownNames {
    fn default() -> Self {
        Self {
            response_completion_source: DEFAULT_RESPONSE_COMPLETION_SOURCE.to_string(),
            invokable: DEFAULT_INVOKABLE.to_string(),
        }
    }
}

// validate_dotted_ident
fn validate_dotted_ident(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{key} is empty")));
    }

    for segment in value.split('.') {
        let mut chars = segment.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_alphanumeric() || c == '_');

        if !valid_start || !valid_rest {
            return Err(ConfigError::Invalid(format!(
                "{key} '{value}' is not a valid dotted identifier"
            )));
        }
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GeneratorConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.namespace_root, DEFAULT_NAMESPACE_ROOT);
        assert_eq!(config.dispatch_method, DEFAULT_DISPATCH_METHOD);
    }

    #[test]
    fn kebab_case_keys_override_defaults() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            namespace-root = "Acme.Generated"
            dispatch-method = "Dispatch"
            application-parts = ["Acme.Core", "Acme.Api"]
            parallelism = 4

            [well-known]
            invokable = "Acme.Rpc.IRequest"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.namespace_root, "Acme.Generated");
        assert_eq!(config.dispatch_method, "Dispatch");
        assert_eq!(config.application_parts, vec!["Acme.Core", "Acme.Api"]);
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.well_known.invokable, "Acme.Rpc.IRequest");
        assert_eq!(
            config.well_known.response_completion_source,
            DEFAULT_RESPONSE_COMPLETION_SOURCE,
            "unspecified well-known names keep their defaults"
        );
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = GeneratorConfig::from_toml_str("namespace-root = ").expect_err("should fail");

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_illegal_namespace_root() {
        let err = GeneratorConfig::from_toml_str(r#"namespace-root = "Acme..Generated""#)
            .expect_err("empty segment should be rejected");

        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("namespace-root"));
    }

    #[test]
    fn rejects_dotted_dispatch_method() {
        let err = GeneratorConfig::from_toml_str(r#"dispatch-method = "Proxy.Send""#)
            .expect_err("dotted dispatch method should be rejected");

        assert!(err.to_string().contains("single identifier"));
    }

    #[test]
    fn rejects_empty_application_part() {
        let err = GeneratorConfig::from_toml_str(r#"application-parts = ["Acme", ""]"#)
            .expect_err("empty part should be rejected");

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GeneratorConfig::load("/nonexistent/rivet.toml").expect_err("should fail");

        assert!(matches!(err, ConfigError::Io(_)));
    }
}
