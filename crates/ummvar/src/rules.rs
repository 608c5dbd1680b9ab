//! Field rules: one extraction rule per UMM-Var property.
//!
//! Each rule reads a variable (plus its owning and parent groups and the
//! vocabulary table) and yields a JSON value, or `None` when the source has
//! nothing for that field. Schema properties without a rule are never
//! populated.

use netcdf_parser::{AttrValue, ROOT_PATH};
use serde_json::{json, Value};

use crate::datatype::{umm_datatype, STRING_TYPE};
use crate::encode::{attr_to_json, f64_to_json};
use crate::error::{Result, UmmVarError};
use crate::schema::{UMM_VAR_NAME, UMM_VAR_URL, UMM_VAR_VERSION};
use crate::vocabulary::VocabularyTable;
use crate::walker::VariableContext;

/// UMM-Var properties that have an extraction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UmmField {
    Name,
    StandardName,
    AdditionalIdentifiers,
    LongName,
    Definition,
    Units,
    DataType,
    Dimensions,
    ValidRanges,
    Scale,
    Offset,
    FillValues,
    VariableType,
    VariableSubType,
    IndexRanges,
    MeasurementIdentifiers,
    SamplingIdentifiers,
    ScienceKeywords,
    MetadataSpecification,
    Sets,
}

impl UmmField {
    pub const ALL: [UmmField; 20] = [
        UmmField::Name,
        UmmField::StandardName,
        UmmField::AdditionalIdentifiers,
        UmmField::LongName,
        UmmField::Definition,
        UmmField::Units,
        UmmField::DataType,
        UmmField::Dimensions,
        UmmField::ValidRanges,
        UmmField::Scale,
        UmmField::Offset,
        UmmField::FillValues,
        UmmField::VariableType,
        UmmField::VariableSubType,
        UmmField::IndexRanges,
        UmmField::MeasurementIdentifiers,
        UmmField::SamplingIdentifiers,
        UmmField::ScienceKeywords,
        UmmField::MetadataSpecification,
        UmmField::Sets,
    ];

    /// Schema property name of this field.
    pub fn property(self) -> &'static str {
        match self {
            UmmField::Name => "Name",
            UmmField::StandardName => "StandardName",
            UmmField::AdditionalIdentifiers => "AdditionalIdentifiers",
            UmmField::LongName => "LongName",
            UmmField::Definition => "Definition",
            UmmField::Units => "Units",
            UmmField::DataType => "DataType",
            UmmField::Dimensions => "Dimensions",
            UmmField::ValidRanges => "ValidRanges",
            UmmField::Scale => "Scale",
            UmmField::Offset => "Offset",
            UmmField::FillValues => "FillValues",
            UmmField::VariableType => "VariableType",
            UmmField::VariableSubType => "VariableSubType",
            UmmField::IndexRanges => "IndexRanges",
            UmmField::MeasurementIdentifiers => "MeasurementIdentifiers",
            UmmField::SamplingIdentifiers => "SamplingIdentifiers",
            UmmField::ScienceKeywords => "ScienceKeywords",
            UmmField::MetadataSpecification => "MetadataSpecification",
            UmmField::Sets => "Sets",
        }
    }

    /// The rule registered for a schema property, if any.
    pub fn from_property(property: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.property() == property)
    }

    /// Run this field's rule.
    pub fn evaluate(self, ctx: &VariableContext<'_>, vocabulary: &VocabularyTable) -> Result<Option<Value>> {
        let value = match self {
            UmmField::Name => Some(Value::String(name(ctx))),
            UmmField::StandardName => attr(ctx, "standard_name"),
            UmmField::AdditionalIdentifiers => additional_identifiers(ctx, vocabulary),
            UmmField::LongName => Some(long_name(ctx)),
            UmmField::Definition => Some(definition(ctx)),
            UmmField::Units => attr(ctx, "units"),
            UmmField::DataType => Some(Value::from(data_type(ctx)?)),
            UmmField::Dimensions => Some(dimensions(ctx)),
            UmmField::ValidRanges => valid_ranges(ctx),
            UmmField::Scale => Some(attr(ctx, "scale_factor").unwrap_or_else(|| f64_to_json(1.0))),
            UmmField::Offset => Some(attr(ctx, "add_offset").unwrap_or_else(|| f64_to_json(0.0))),
            UmmField::FillValues => fill_values(ctx),
            UmmField::VariableType => variable_type(ctx)?.map(Value::from),
            UmmField::VariableSubType => variable_sub_type(ctx)?.map(Value::from),
            UmmField::IndexRanges => index_ranges(ctx)?,
            UmmField::MeasurementIdentifiers
            | UmmField::SamplingIdentifiers
            | UmmField::ScienceKeywords => None,
            UmmField::MetadataSpecification => Some(metadata_specification()),
            UmmField::Sets => Some(sets(ctx)),
        };
        Ok(value)
    }
}

fn attr(ctx: &VariableContext<'_>, name: &str) -> Option<Value> {
    ctx.variable.attribute(name).map(attr_to_json)
}

/// Full path of the variable; root-level variables are just their name.
///
/// Spaces in the group path become underscores.
pub fn name(ctx: &VariableContext<'_>) -> String {
    let path = ctx.variable.group_path.replace(' ', "_");
    if path == ROOT_PATH {
        ctx.variable.name.clone()
    } else {
        format!("{}/{}", path.trim_start_matches('/'), ctx.variable.name)
    }
}

fn additional_identifiers(ctx: &VariableContext<'_>, vocabulary: &VocabularyTable) -> Option<Value> {
    let mut identifiers = Vec::new();

    for (attribute, identifier) in [
        ("flag_values", "CF_Flag_Values"),
        ("flag_meanings", "CF_Flag_Meanings"),
        ("flag_masks", "CF_Flag_Masks"),
    ] {
        if let Some(value) = ctx.variable.attribute(attribute) {
            identifiers.push(json!({
                "Identifier": identifier,
                "Description": value.to_text(),
            }));
        }
    }

    let description = ctx
        .variable
        .attribute("standard_name")
        .map(AttrValue::to_text)
        .and_then(|term| vocabulary.description(&term).map(str::to_string));
    if let Some(description) = description {
        identifiers.push(json!({
            "Identifier": "CF_Standard_Description",
            "Description": description,
        }));
    }

    if identifiers.is_empty() {
        None
    } else {
        Some(Value::Array(identifiers))
    }
}

/// `long_name`, or the variable's full name; the field is required.
fn long_name(ctx: &VariableContext<'_>) -> Value {
    attr(ctx, "long_name").unwrap_or_else(|| Value::String(name(ctx)))
}

fn definition(ctx: &VariableContext<'_>) -> Value {
    ["description", "comment", "long_name"]
        .into_iter()
        .find_map(|a| attr(ctx, a))
        .unwrap_or_else(|| Value::String(ctx.variable.name.clone()))
}

fn data_type(ctx: &VariableContext<'_>) -> Result<&'static str> {
    umm_datatype(&ctx.variable.name, &ctx.variable.element_type)
}

/// Coarse dimension classification by name.
pub fn dimension_type(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower == "time" {
        "TIME_DIMENSION"
    } else if lower.starts_with("lat") {
        "LATITUDE_DIMENSION"
    } else if lower.starts_with("lon") {
        "LONGITUDE_DIMENSION"
    } else if lower == "nj" {
        "ALONG_TRACK_DIMENSION"
    } else if lower == "ni" {
        "CROSS_TRACK_DIMENSION"
    } else {
        "OTHER"
    }
}

fn dimensions(ctx: &VariableContext<'_>) -> Value {
    Value::Array(
        ctx.variable
            .dimensions
            .iter()
            .map(|d| {
                json!({
                    "Name": d.name,
                    "Size": d.len,
                    "Type": dimension_type(&d.name),
                })
            })
            .collect(),
    )
}

/// `valid_min` and `valid_max` together; `valid_range` is not consulted.
fn valid_ranges(ctx: &VariableContext<'_>) -> Option<Value> {
    let min = attr(ctx, "valid_min")?;
    let max = attr(ctx, "valid_max")?;
    Some(json!([{ "Min": min, "Max": max }]))
}

/// Only the first present of `_FillValue`/`missing_value` is considered;
/// a NaN or raw-byte value there yields no fill value at all.
fn fill_values(ctx: &VariableContext<'_>) -> Option<Value> {
    if ctx.variable.name.to_lowercase() == "time" {
        return None;
    }
    let value = ["_FillValue", "missing_value"]
        .into_iter()
        .find_map(|a| ctx.variable.attribute(a))?;
    if value.is_nan() || value.is_bytes() {
        return None;
    }
    Some(json!([{ "Value": attr_to_json(value), "Type": "SCIENCE_FILLVALUE" }]))
}

/// `coverage_content_type` value → UMM-Var `VariableType`, including
/// misspellings seen in published granules.
pub const COVERAGE_CONTENT_TYPES: [(&str, &str); 12] = [
    ("image", "SCIENCE_VARIABLE"),
    ("thematicClassification", "SCIENCE_VARIABLE"),
    ("physicalMeasurement", "SCIENCE_VARIABLE"),
    ("modelResult", "SCIENCE_VARIABLE"),
    ("auxiliaryInformation", "ANCILLARY_VARIABLE"),
    ("auxillaryInformation", "ANCILLARY_VARIABLE"),
    ("auxilliaryData", "ANCILLARY_VARIABLE"),
    ("qualityInformation", "QUALITY_VARIABLE"),
    ("qualityInformaion", "QUALITY_VARIABLE"),
    ("reference_information", "OTHER"),
    ("referenceInformation", "OTHER"),
    ("coordinate", "COORDINATE"),
];

fn variable_type(ctx: &VariableContext<'_>) -> Result<Option<&'static str>> {
    let Some(value) = ctx.variable.attribute("coverage_content_type") else {
        return Ok(None);
    };
    let content_type = value.to_text();
    let content_type = content_type.trim();

    COVERAGE_CONTENT_TYPES
        .iter()
        .find(|(k, _)| *k == content_type)
        .map(|(_, v)| Some(*v))
        .ok_or_else(|| UmmVarError::UnknownCoverageContentType {
            variable: ctx.variable.name.clone(),
            value: content_type.to_string(),
        })
}

fn variable_sub_type(ctx: &VariableContext<'_>) -> Result<Option<&'static str>> {
    if ctx.variable.attributes.names().any(|n| n.starts_with("flag")) {
        return Ok(Some("SCIENCE_EVENTFLAG"));
    }
    if data_type(ctx)? == STRING_TYPE {
        return Ok(Some("OTHER"));
    }
    Ok(None)
}

/// Strip everything but digits, `.` and `-` and parse, so `"34.5N"` reads
/// as `34.5`. The hemisphere letter does not change the sign.
pub fn parse_bound(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().ok()
}

fn index_ranges(ctx: &VariableContext<'_>) -> Result<Option<Value>> {
    let group = ctx.bounds_group();
    let names = [
        ["geospatial_lat_min", "geospatial_lat_max"],
        ["geospatial_lon_min", "geospatial_lon_max"],
    ];

    let mut ranges = Vec::with_capacity(2);
    for pair in names {
        let mut range = Vec::with_capacity(2);
        for attribute in pair {
            let Some(value) = group.attributes.get(attribute) else {
                return Ok(None);
            };
            let bound = match value.as_text() {
                Some(text) => parse_bound(text).map(f64_to_json).ok_or_else(|| {
                    UmmVarError::InvalidGeospatialBound {
                        variable: ctx.variable.name.clone(),
                        attribute: attribute.to_string(),
                        value: text.to_string(),
                    }
                })?,
                None => attr_to_json(value),
            };
            range.push(bound);
        }
        ranges.push(Value::Array(range));
    }

    let lon = ranges.pop();
    let lat = ranges.pop();
    Ok(Some(json!({ "LatRange": lat, "LonRange": lon })))
}

fn metadata_specification() -> Value {
    json!({
        "URL": UMM_VAR_URL,
        "Name": UMM_VAR_NAME,
        "Version": UMM_VAR_VERSION,
    })
}

/// Every variable forms its own single-member set.
fn sets(ctx: &VariableContext<'_>) -> Value {
    json!([{
        "Name": ctx.variable.name,
        "Type": "General",
        "Size": 1,
        "Index": 1,
    }])
}
