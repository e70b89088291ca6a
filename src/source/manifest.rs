//! Structured artifact reading
//!
//! Manifests (such as `package.json`) and tool configs (such as
//! `tailwind.config.js`) are read into a key/value tree and asserted on
//! by field path.

use std::fmt;

use serde_json::Value;

use crate::common::{Error, Result};

use super::object_literal::parse_exported_object;
use super::SourceInspector;

/// On-disk encoding of a structured artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    /// `module.exports = { .. }` or `export default { .. }`
    ConfigModule,
}

/// A parsed structured artifact
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    root: Value,
}

impl Manifest {
    pub fn parse(path: &str, text: &str, format: ManifestFormat) -> Result<Self> {
        let root = match format {
            ManifestFormat::Json => {
                serde_json::from_str(text).map_err(|e| Error::manifest_parse(path, e.to_string()))?
            }
            ManifestFormat::ConfigModule => {
                parse_exported_object(text).map_err(|e| Error::manifest_parse(path, e))?
            }
        };
        Ok(Self { root })
    }

    /// Nested lookup, e.g. `["scripts", "build:css"]`
    pub fn field(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.root, |value, key| value.get(*key))
    }
}

/// Parse a manifest through a source inspector, `Ok(None)` when absent
pub fn read_manifest(
    sources: &dyn SourceInspector,
    path: &str,
    format: ManifestFormat,
) -> Result<Option<Manifest>> {
    match sources.read_text(path)? {
        Some(text) => Manifest::parse(path, &text, format).map(Some),
        None => Ok(None),
    }
}

/// A pure predicate over a manifest field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAssertion {
    /// String field containing a substring
    Contains {
        path: &'static [&'static str],
        needle: &'static str,
    },
    /// Non-empty list with at least one string entry containing `suffix`
    ListIncludes {
        path: &'static [&'static str],
        suffix: &'static str,
    },
}

impl FieldAssertion {
    pub fn path(&self) -> &'static [&'static str] {
        match self {
            FieldAssertion::Contains { path, .. } | FieldAssertion::ListIncludes { path, .. } => path,
        }
    }

    pub fn holds(&self, manifest: &Manifest) -> bool {
        let Some(value) = manifest.field(self.path()) else {
            return false;
        };
        match self {
            FieldAssertion::Contains { needle, .. } => {
                value.as_str().is_some_and(|s| s.contains(needle))
            }
            FieldAssertion::ListIncludes { suffix, .. } => value.as_array().is_some_and(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|item| item.contains(suffix))
            }),
        }
    }
}

impl fmt::Display for FieldAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().join("."))
    }
}
