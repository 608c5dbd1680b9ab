//! UMM-Var schema property catalog.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, UmmVarError};

/// Published location of the UMM-Var schema version this crate targets.
pub const UMM_VAR_URL: &str = "https://cdn.earthdata.nasa.gov/umm/variable/v1.8.1";

/// UMM-Var schema version.
pub const UMM_VAR_VERSION: &str = "1.8.1";

/// Schema name used in `MetadataSpecification`.
pub const UMM_VAR_NAME: &str = "UMM-Var";

/// URL of the JSON schema document.
pub fn schema_document_url() -> String {
    format!("{}/umm-var-json-schema.json", UMM_VAR_URL)
}

/// Ordered list of top-level property names declared by the schema.
///
/// Drives which field rules run and the order fields appear in a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCatalog {
    properties: Vec<String>,
}

impl SchemaCatalog {
    /// Build a catalog from property names; repeated names keep their first
    /// position.
    pub fn from_properties<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for p in properties {
            let p = p.into();
            if !unique.contains(&p) {
                unique.push(p);
            }
        }
        Self { properties: unique }
    }

    /// Read the `properties` object of a JSON schema document, keeping
    /// document order.
    pub fn from_schema_json(text: &str) -> Result<Self> {
        let schema: Value = serde_json::from_str(text)?;
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| UmmVarError::Schema("missing 'properties' object".to_string()))?;

        let catalog = Self::from_properties(properties.keys().cloned());
        debug!(properties = catalog.len(), "Loaded UMM-Var schema properties");
        Ok(catalog)
    }

    /// Load a schema document from a local file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_schema_json(&text)
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn contains(&self, property: &str) -> bool {
        self.properties.iter().any(|p| p == property)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_keep_document_order() {
        let schema = r#"{
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "UMM-Var",
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "Name": {"type": "string"},
                "StandardName": {"type": "string"},
                "LongName": {"type": "string"},
                "Definition": {"type": "string"},
                "AdditionalIdentifiers": {"type": "array"},
                "DataType": {"type": "string"}
            },
            "required": ["Name", "LongName", "Definition"]
        }"#;
        let catalog = SchemaCatalog::from_schema_json(schema).unwrap();
        assert_eq!(
            catalog.properties(),
            &[
                "Name",
                "StandardName",
                "LongName",
                "Definition",
                "AdditionalIdentifiers",
                "DataType"
            ]
        );
    }

    #[test]
    fn test_missing_properties_object() {
        let err = SchemaCatalog::from_schema_json(r#"{"title": "UMM-Var"}"#).unwrap_err();
        assert!(matches!(err, UmmVarError::Schema(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = SchemaCatalog::from_schema_json("not json").unwrap_err();
        assert!(matches!(err, UmmVarError::Json(_)));
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let catalog = SchemaCatalog::from_properties(["Name", "Units", "Name"]);
        assert_eq!(catalog.properties(), &["Name", "Units"]);
        assert!(catalog.contains("Units"));
        assert!(!catalog.contains("Scale"));
    }

    #[test]
    fn test_schema_document_url() {
        assert_eq!(
            schema_document_url(),
            "https://cdn.earthdata.nasa.gov/umm/variable/v1.8.1/umm-var-json-schema.json"
        );
    }
}
