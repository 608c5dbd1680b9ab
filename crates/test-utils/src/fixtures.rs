//! Common test fixtures for UMM-Var generation tests.
//!
//! Small, hand-written stand-ins for the real inputs: a slice of the CF
//! standard name table and a trimmed UMM-Var schema document, plus
//! in-memory trees equivalent to typical granules. Trees can be written to
//! real files with [`crate::granule::write_granule`].

use netcdf_parser::{AttrValue, Dimension, ElementType, Group, Variable};

/// Top-level properties of the UMM-Var 1.8.1 schema, in document order.
pub const UMM_VAR_PROPERTIES: [&str; 21] = [
    "Name",
    "StandardName",
    "LongName",
    "Definition",
    "AdditionalIdentifiers",
    "Units",
    "DataType",
    "Dimensions",
    "ValidRanges",
    "Scale",
    "Offset",
    "FillValues",
    "VariableType",
    "VariableSubType",
    "IndexRanges",
    "MeasurementIdentifiers",
    "SamplingIdentifiers",
    "ScienceKeywords",
    "Sets",
    "RelatedURLs",
    "MetadataSpecification",
];

/// A trimmed UMM-Var JSON schema document.
///
/// Property bodies are reduced to their type; only the key order matters.
pub const UMM_VAR_SCHEMA_JSON: &str = r##"{
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
    "Units": {"type": "string"},
    "DataType": {"$ref": "#/definitions/DataTypeEnum"},
    "Dimensions": {"type": "array"},
    "ValidRanges": {"type": "array"},
    "Scale": {"type": "number"},
    "Offset": {"type": "number"},
    "FillValues": {"type": "array"},
    "VariableType": {"$ref": "#/definitions/VariableTypeEnum"},
    "VariableSubType": {"$ref": "#/definitions/VariableSubTypeEnum"},
    "IndexRanges": {"$ref": "#/definitions/IndexRangesType"},
    "MeasurementIdentifiers": {"type": "array"},
    "SamplingIdentifiers": {"type": "array"},
    "ScienceKeywords": {"type": "array"},
    "Sets": {"type": "array"},
    "RelatedURLs": {"type": "array"},
    "MetadataSpecification": {"$ref": "#/definitions/MetadataSpecificationType"}
  },
  "required": ["Name", "LongName", "Definition", "MetadataSpecification"]
}"##;

/// A few entries of the CF standard name table.
pub const CF_TABLE_XML: &str = r#"<?xml version="1.0"?>
<standard_name_table xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="cf-standard-name-table-1.1.xsd">
   <version_number>84</version_number>
   <institution>Centre for Environmental Data Analysis</institution>
   <contact>support@ceda.ac.uk</contact>
   <entry id="sea_surface_skin_temperature">
      <canonical_units>K</canonical_units>
      <grib></grib>
      <amip></amip>
      <description>The surface called "surface" means the lower boundary of the atmosphere.</description>
   </entry>
   <entry id="latitude">
      <canonical_units>degree_north</canonical_units>
      <description>Latitude is positive northward; its units of degree_north (or equivalent) indicate this explicitly.</description>
   </entry>
   <entry id="longitude">
      <canonical_units>degree_east</canonical_units>
      <description>Longitude is positive eastward; its units of degree_east (or equivalent) indicate this explicitly.</description>
   </entry>
   <entry id="time">
      <canonical_units>s</canonical_units>
      <description></description>
   </entry>
   <alias id="sea_surface_skin_temperature_alias">
      <entry_id>sea_surface_skin_temperature</entry_id>
   </alias>
</standard_name_table>
"#;

/// A grouped L2P swath granule.
///
/// Coordinates sit on the root group next to hemisphere-suffixed text
/// bounds; the science and flag variables live in `geophysical data`.
pub fn l2p_swath_tree() -> Group {
    let mut root = Group::root();
    root.attributes.set("Conventions", "CF-1.7, ACDD-1.3");
    root.attributes.set("geospatial_lat_min", "34.5N");
    root.attributes.set("geospatial_lat_max", "61.2N");
    root.attributes.set("geospatial_lon_min", "120.0W");
    root.attributes.set("geospatial_lon_max", "88.75W");
    root.dimensions = vec![
        Dimension::new("time", 1),
        Dimension::new("nj", 5392),
        Dimension::new("ni", 3200),
    ];

    root.add_variable(
        Variable::new("lat", ElementType::Float)
            .with_dimension("nj", 5392)
            .with_dimension("ni", 3200)
            .with_attribute("long_name", "latitude")
            .with_attribute("standard_name", "latitude")
            .with_attribute("units", "degrees_north")
            .with_attribute("_FillValue", -999.0f32)
            .with_attribute("valid_min", -90.0f32)
            .with_attribute("valid_max", 90.0f32)
            .with_attribute("coverage_content_type", "coordinate"),
    );
    root.add_variable(
        Variable::new("lon", ElementType::Float)
            .with_dimension("nj", 5392)
            .with_dimension("ni", 3200)
            .with_attribute("long_name", "longitude")
            .with_attribute("standard_name", "longitude")
            .with_attribute("units", "degrees_east")
            .with_attribute("_FillValue", -999.0f32)
            .with_attribute("coverage_content_type", "coordinate"),
    );
    root.add_variable(
        Variable::new("time", ElementType::Int)
            .with_dimension("time", 1)
            .with_attribute("long_name", "reference time of sst file")
            .with_attribute("standard_name", "time")
            .with_attribute("units", "seconds since 1981-01-01 00:00:00")
            .with_attribute("_FillValue", AttrValue::Int(-2147483647))
            .with_attribute("coverage_content_type", "coordinate"),
    );

    let geophysical = root.add_group("geophysical data");
    geophysical.add_variable(
        Variable::new("sea_surface_temperature", ElementType::Short)
            .with_dimension("time", 1)
            .with_dimension("nj", 5392)
            .with_dimension("ni", 3200)
            .with_attribute("long_name", "sea surface sub-skin temperature")
            .with_attribute("standard_name", "sea_surface_skin_temperature")
            .with_attribute("units", "kelvin")
            .with_attribute("_FillValue", AttrValue::Int(-32768))
            .with_attribute("add_offset", 273.15f32)
            .with_attribute("scale_factor", 0.01f32)
            .with_attribute("valid_min", AttrValue::Int(-200))
            .with_attribute("valid_max", AttrValue::Int(5000))
            .with_attribute("coverage_content_type", "physicalMeasurement")
            .with_attribute(
                "comment",
                "SST obtained by regression with \"buoy\" measurements",
            ),
    );
    geophysical.add_variable(
        Variable::new("l2p_flags", ElementType::Byte)
            .with_dimension("time", 1)
            .with_dimension("nj", 5392)
            .with_dimension("ni", 3200)
            .with_attribute("long_name", "L2P flags")
            .with_attribute("flag_masks", AttrValue::Ints(vec![1, 2, 4, 8]))
            .with_attribute("flag_meanings", "microwave land ice lake")
            .with_attribute("coverage_content_type", "qualityInformation"),
    );
    root
}

/// A root group holding a single variable.
pub fn single_variable_tree(variable: Variable) -> Group {
    let mut root = Group::root();
    root.add_variable(variable);
    root
}

/// A root group with variable `A` and one child group with variable `B`.
pub fn two_level_tree() -> Group {
    let mut root = Group::root();
    root.add_variable(Variable::new("A", ElementType::Float));
    root.add_group("child")
        .add_variable(Variable::new("B", ElementType::Float));
    root
}

/// A gridded L4 analysis: flat root group with numeric geospatial bounds.
pub fn l4_analysis_tree() -> Group {
    let mut root = Group::root();
    root.attributes.set("Conventions", "CF-1.7");
    for (name, value) in [
        ("geospatial_lat_min", -89.99f32),
        ("geospatial_lat_max", 89.99),
        ("geospatial_lon_min", -179.99),
        ("geospatial_lon_max", 180.0),
    ] {
        root.attributes.set(name, value);
    }

    root.add_variable(
        Variable::new("time", ElementType::Int)
            .with_dimension("time", 1)
            .with_attribute("long_name", "reference time of sst field")
            .with_attribute("standard_name", "time")
            .with_attribute("_FillValue", AttrValue::Int(-2147483647))
            .with_attribute("coverage_content_type", "coordinate"),
    );
    root.add_variable(
        Variable::new("analysed_sst", ElementType::Short)
            .with_dimension("time", 1)
            .with_dimension("lat", 17999)
            .with_dimension("lon", 36000)
            .with_attribute("long_name", "analysed sea surface temperature")
            .with_attribute("standard_name", "sea_surface_foundation_temperature")
            .with_attribute("units", "kelvin")
            .with_attribute("_FillValue", AttrValue::Int(-32768))
            .with_attribute("add_offset", 298.15f32)
            .with_attribute("scale_factor", 0.001f32)
            .with_attribute("valid_min", AttrValue::Int(-32767))
            .with_attribute("valid_max", AttrValue::Int(32767))
            .with_attribute("coverage_content_type", "physicalMeasurement"),
    );
    root.add_variable(
        Variable::new("mask", ElementType::Byte)
            .with_dimension("time", 1)
            .with_dimension("lat", 17999)
            .with_dimension("lon", 36000)
            .with_attribute("long_name", "sea/land field composite mask")
            .with_attribute("_FillValue", AttrValue::Int(-128))
            .with_attribute("flag_masks", AttrValue::Ints(vec![1, 2, 4, 8, 16]))
            .with_attribute("flag_meanings", "open_sea land open_lake open_sea_with_ice_in_the_grid open_lake_with_ice_in_the_grid")
            .with_attribute("coverage_content_type", "auxiliaryInformation"),
    );
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_fixture_lists_every_property() {
        for property in UMM_VAR_PROPERTIES {
            assert!(
                UMM_VAR_SCHEMA_JSON.contains(&format!("\"{}\":", property)),
                "missing {}",
                property
            );
        }
    }

    #[test]
    fn test_swath_tree_layout() {
        let root = l2p_swath_tree();
        assert_eq!(root.variable_count(), 5);
        let geophysical = root.group("geophysical data").unwrap();
        assert_eq!(geophysical.path, "/geophysical data");
        assert_eq!(
            geophysical.variables[0].group_path,
            "/geophysical data"
        );
    }

    #[test]
    fn test_tree_builders() {
        assert_eq!(two_level_tree().variable_count(), 2);
        assert_eq!(l4_analysis_tree().variables.len(), 3);
        let single = single_variable_tree(Variable::new("x", ElementType::Double));
        assert_eq!(single.variables[0].group_path, "/");
    }
}
