//! UMM-Var record assembly.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::encode::{is_empty, normalize};
use crate::error::Result;
use crate::rules::UmmField;
use crate::schema::SchemaCatalog;
use crate::vocabulary::VocabularyTable;
use crate::walker::VariableContext;

/// One UMM-Var record: properties in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v)
    }

    /// The record's `Name` field.
    pub fn name(&self) -> Option<&str> {
        self.get("Name").and_then(Value::as_str)
    }

    /// Property names in output order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The record as a JSON object, keeping field order.
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.iter().cloned().collect())
    }

    fn push(&mut self, property: &str, value: Value) {
        self.fields.push((property.to_string(), value));
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Applies the field rules selected by a schema catalog to variables.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder<'a> {
    schema: &'a SchemaCatalog,
    vocabulary: &'a VocabularyTable,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(schema: &'a SchemaCatalog, vocabulary: &'a VocabularyTable) -> Self {
        Self { schema, vocabulary }
    }

    /// Build the record for one variable.
    ///
    /// Properties without a rule and rules yielding an empty value are left
    /// out. The first rule error aborts the record.
    pub fn build(&self, ctx: &VariableContext<'_>) -> Result<Record> {
        let mut record = Record::default();

        for property in self.schema.properties() {
            let Some(field) = UmmField::from_property(property) else {
                continue;
            };
            let Some(value) = field.evaluate(ctx, self.vocabulary)? else {
                continue;
            };
            let value = normalize(value);
            if !is_empty(&value) {
                record.push(property, value);
            }
        }

        debug!(
            variable = %ctx.variable.name,
            group = %ctx.group.path,
            fields = record.len(),
            "Built UMM-Var record"
        );
        Ok(record)
    }
}
