//! End-to-end tests: group trees and NetCDF-4 files through to UMM-Var JSON.

use netcdf_parser::{AttrValue, ElementType, Group, UserTypeKind, Variable};
use serde_json::{json, Value};
use test_utils::{
    assert_approx_eq, l2p_swath_tree, l4_analysis_tree, require_test_file,
    single_variable_tree, two_level_tree, write_temp_file, write_temp_granule, CF_TABLE_XML,
    UMM_VAR_PROPERTIES, UMM_VAR_SCHEMA_JSON,
};
use ummvar::{
    filter_by_name, walk, GranuleProcessor, Record, RecordBuilder, SchemaCatalog, UmmField,
    UmmVarError, VocabularyTable,
};

fn schema() -> SchemaCatalog {
    SchemaCatalog::from_schema_json(UMM_VAR_SCHEMA_JSON).unwrap()
}

fn vocabulary() -> VocabularyTable {
    VocabularyTable::from_xml(CF_TABLE_XML).unwrap()
}

fn records_for(root: &Group) -> Vec<Record> {
    let schema = schema();
    let vocabulary = vocabulary();
    GranuleProcessor::new(&schema, &vocabulary)
        .process_group(root)
        .unwrap()
}

fn only_record(variable: Variable) -> Record {
    let mut records = records_for(&single_variable_tree(variable));
    assert_eq!(records.len(), 1);
    records.remove(0)
}

// ============================================================================
// Schema-driven field selection
// ============================================================================

#[test]
fn test_schema_fixture_loads_in_document_order() {
    let schema = schema();
    assert_eq!(schema.properties(), &UMM_VAR_PROPERTIES);
}

#[test]
fn test_properties_without_rule_never_appear() {
    let root = l2p_swath_tree();
    for record in records_for(&root) {
        for property in ["RelatedURLs", "MeasurementIdentifiers", "SamplingIdentifiers", "ScienceKeywords"] {
            assert!(record.get(property).is_none(), "{} in {:?}", property, record.name());
        }
    }
}

#[test]
fn test_fields_not_in_schema_are_skipped() {
    let schema = SchemaCatalog::from_properties(["Name", "Units"]);
    let vocabulary = vocabulary();
    let root = l4_analysis_tree();
    let records = GranuleProcessor::new(&schema, &vocabulary)
        .process_group(&root)
        .unwrap();

    for record in &records {
        assert!(record.properties().all(|p| p == "Name" || p == "Units"));
    }
    assert_eq!(records[1].to_json(), json!({"Name": "analysed_sst", "Units": "kelvin"}));
}

#[test]
fn test_every_field_has_a_property_name_in_the_schema() {
    let schema = schema();
    for field in UmmField::ALL {
        assert!(schema.contains(field.property()), "{}", field.property());
    }
}

// ============================================================================
// Name and LongName
// ============================================================================

#[test]
fn test_root_variable_name_has_no_separator() {
    let record = only_record(Variable::new("sst", ElementType::Float));
    assert_eq!(record.name(), Some("sst"));
}

#[test]
fn test_group_with_space_in_name() {
    let mut root = Group::root();
    root.add_group("a b")
        .add_variable(Variable::new("sst", ElementType::Float));
    let records = records_for(&root);
    assert_eq!(records[0].name(), Some("a_b/sst"));
}

#[test]
fn test_long_name_present() {
    let record = only_record(
        Variable::new("sst", ElementType::Float).with_attribute("long_name", "Sea Surface Temp"),
    );
    assert_eq!(record.get("LongName"), Some(&json!("Sea Surface Temp")));
}

#[test]
fn test_long_name_falls_back_to_computed_name() {
    let mut root = Group::root();
    root.add_group("a b")
        .add_variable(Variable::new("sst", ElementType::Float));
    let records = records_for(&root);
    assert_eq!(records[0].get("LongName"), Some(&json!("a_b/sst")));
}

// ============================================================================
// FillValues
// ============================================================================

#[test]
fn test_time_never_has_fill_values() {
    let record = only_record(
        Variable::new("time", ElementType::Double).with_attribute("_FillValue", -9999.0f64),
    );
    assert!(record.get("FillValues").is_none());
}

#[test]
fn test_sst_fill_value() {
    let record = only_record(
        Variable::new("sst", ElementType::Float).with_attribute("_FillValue", -9999.0f64),
    );
    assert_eq!(
        record.get("FillValues"),
        Some(&json!([{"Value": -9999.0, "Type": "SCIENCE_FILLVALUE"}]))
    );
}

// ============================================================================
// DataType
// ============================================================================

#[test]
fn test_float_data_type() {
    let record = only_record(Variable::new("sst", ElementType::Float));
    assert_eq!(record.get("DataType"), Some(&json!("float")));
}

#[test]
fn test_unmapped_data_type_fails_instead_of_defaulting() {
    let schema = schema();
    let vocabulary = vocabulary();
    let root = single_variable_tree(Variable::new(
        "cloud",
        ElementType::UserDefined {
            kind: UserTypeKind::Opaque,
            name: "raw_t".into(),
        },
    ));

    let result = GranuleProcessor::new(&schema, &vocabulary).process_group(&root);
    match result {
        Err(UmmVarError::UnmappedDatatype { variable, datatype }) => {
            assert_eq!(variable, "cloud");
            assert_eq!(datatype, "opaque raw_t");
        }
        other => panic!("expected UnmappedDatatype, got {:?}", other),
    }
}

// ============================================================================
// IndexRanges
// ============================================================================

#[test]
fn test_hemisphere_suffixes_are_stripped_without_sign_change() {
    let root = l2p_swath_tree();
    let records = records_for(&root);
    let sst = &records[0];

    assert_eq!(
        sst.get("IndexRanges"),
        Some(&json!({"LatRange": [34.5, 61.2], "LonRange": [120.0, 88.75]}))
    );
}

#[test]
fn test_numeric_bounds_pass_through() {
    let records = records_for(&l4_analysis_tree());
    let ranges = records[1].get("IndexRanges").unwrap();
    assert_approx_eq!(ranges["LatRange"][0].as_f64().unwrap(), -89.99, 1e-9);
    assert_approx_eq!(ranges["LonRange"][1].as_f64().unwrap(), 180.0, 1e-9);
}

// ============================================================================
// HierarchyWalker
// ============================================================================

#[test]
fn test_child_group_variables_first() {
    let root = two_level_tree();
    let names: Vec<_> = walk(&root).iter().map(|c| c.variable.name.clone()).collect();
    assert_eq!(names, vec!["B", "A"]);

    let records = records_for(&root);
    let names: Vec<_> = records.iter().filter_map(Record::name).collect();
    assert_eq!(names, vec!["child/B", "A"]);
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_rebuilding_is_byte_identical() {
    let schema = schema();
    let vocabulary = vocabulary();
    let root = l2p_swath_tree();
    let builder = RecordBuilder::new(&schema, &vocabulary);

    for ctx in walk(&root) {
        let first = serde_json::to_string(&builder.build(&ctx).unwrap()).unwrap();
        let second = serde_json::to_string(&builder.build(&ctx).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}

// ============================================================================
// Full records
// ============================================================================

#[test]
fn test_swath_science_variable_record() {
    let root = l2p_swath_tree();
    let records = records_for(&root);
    assert_eq!(records.len(), 5);

    let expected = json!({
        "Name": "geophysical_data/sea_surface_temperature",
        "StandardName": "sea_surface_skin_temperature",
        "LongName": "sea surface sub-skin temperature",
        "Definition": "SST obtained by regression with 'buoy' measurements",
        "AdditionalIdentifiers": [{
            "Identifier": "CF_Standard_Description",
            "Description": "The surface called 'surface' means the lower boundary of the atmosphere."
        }],
        "Units": "kelvin",
        "DataType": "short",
        "Dimensions": [
            {"Name": "time", "Size": 1, "Type": "TIME_DIMENSION"},
            {"Name": "nj", "Size": 5392, "Type": "ALONG_TRACK_DIMENSION"},
            {"Name": "ni", "Size": 3200, "Type": "CROSS_TRACK_DIMENSION"}
        ],
        "ValidRanges": [{"Min": -200, "Max": 5000}],
        "Scale": 0.01,
        "Offset": 273.15,
        "FillValues": [{"Value": -32768, "Type": "SCIENCE_FILLVALUE"}],
        "VariableType": "SCIENCE_VARIABLE",
        "IndexRanges": {"LatRange": [34.5, 61.2], "LonRange": [120.0, 88.75]},
        "Sets": [{"Name": "sea_surface_temperature", "Type": "General", "Size": 1, "Index": 1}],
        "MetadataSpecification": {
            "URL": "https://cdn.earthdata.nasa.gov/umm/variable/v1.8.1",
            "Name": "UMM-Var",
            "Version": "1.8.1"
        }
    });
    assert_eq!(records[0].to_json(), expected);

    // Key order follows the schema, not the JSON map's.
    let keys: Vec<_> = records[0].properties().collect();
    let expected_keys: Vec<_> = UMM_VAR_PROPERTIES
        .iter()
        .copied()
        .filter(|p| expected.get(*p).is_some())
        .collect();
    assert_eq!(keys, expected_keys);
}

#[test]
fn test_swath_flag_variable_record() {
    let root = l2p_swath_tree();
    let records = records_for(&root);
    let flags = &records[1];

    assert_eq!(flags.name(), Some("geophysical_data/l2p_flags"));
    assert_eq!(flags.get("DataType"), Some(&json!("byte")));
    assert_eq!(flags.get("VariableType"), Some(&json!("QUALITY_VARIABLE")));
    assert_eq!(flags.get("VariableSubType"), Some(&json!("SCIENCE_EVENTFLAG")));
    assert_eq!(
        flags.get("AdditionalIdentifiers"),
        Some(&json!([
            {"Identifier": "CF_Flag_Meanings", "Description": "microwave land ice lake"},
            {"Identifier": "CF_Flag_Masks", "Description": "1 2 4 8"}
        ]))
    );
    assert_eq!(flags.get("Definition"), Some(&json!("L2P flags")));
    assert!(flags.get("FillValues").is_none());
    assert!(flags.get("ValidRanges").is_none());
}

#[test]
fn test_swath_coordinate_records() {
    let root = l2p_swath_tree();
    let records = records_for(&root);
    let names: Vec<_> = records.iter().filter_map(Record::name).collect();
    assert_eq!(
        names,
        vec![
            "geophysical_data/sea_surface_temperature",
            "geophysical_data/l2p_flags",
            "lat",
            "lon",
            "time"
        ]
    );

    let lat = &records[2];
    assert_eq!(lat.get("VariableType"), Some(&json!("COORDINATE")));
    assert_eq!(lat.get("ValidRanges"), Some(&json!([{"Min": -90.0, "Max": 90.0}])));
    assert_eq!(
        lat.get("FillValues"),
        Some(&json!([{"Value": -999.0, "Type": "SCIENCE_FILLVALUE"}]))
    );
    assert!(lat
        .get("AdditionalIdentifiers")
        .and_then(|v| v[0]["Description"].as_str())
        .is_some_and(|d| d.starts_with("Latitude is positive northward")));

    let time = &records[4];
    assert_eq!(time.get("DataType"), Some(&json!("int")));
    assert_eq!(time.get("Scale"), Some(&json!(1.0)));
    assert_eq!(time.get("Offset"), Some(&json!(0.0)));
    assert!(time.get("FillValues").is_none());
    // `time` has an empty description in the table.
    assert!(time.get("AdditionalIdentifiers").is_none());
}

#[test]
fn test_packed_f32_attributes_keep_their_decimal_text() {
    let records = records_for(&l4_analysis_tree());
    let sst = serde_json::to_string(&records[1]).unwrap();
    assert!(sst.contains(r#""Scale":0.001"#), "{}", sst);
    assert!(sst.contains(r#""Offset":298.15"#), "{}", sst);
}

#[test]
fn test_filter_by_variable_name() {
    let root = l2p_swath_tree();
    let records = filter_by_name(records_for(&root), "geophysical_data/l2p_flags");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("DataType"), Some(&json!("byte")));
}

#[test]
fn test_nan_fill_value_and_missing_value_fallthrough() {
    let record = only_record(
        Variable::new("wind_speed", ElementType::Float)
            .with_attribute("_FillValue", AttrValue::Float(f32::NAN))
            .with_attribute("missing_value", -1.0f32),
    );
    assert!(record.get("FillValues").is_none());
}

#[test]
fn test_serialized_output_is_a_json_array_of_objects() {
    let records = records_for(&two_level_tree());
    let text = serde_json::to_string_pretty(&records).unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    assert_eq!(parsed[0]["Name"], json!("child/B"));
}

// ============================================================================
// Collaborator inputs from disk
// ============================================================================

#[test]
fn test_schema_and_vocabulary_from_files() {
    let (_schema_dir, schema_path) = write_temp_file("umm-var-json-schema.json", UMM_VAR_SCHEMA_JSON);
    let (_cf_dir, cf_path) = write_temp_file("cf-standard-name-table.xml", CF_TABLE_XML);

    let schema = SchemaCatalog::from_path(&schema_path).unwrap();
    let vocabulary = VocabularyTable::from_path(&cf_path).unwrap();
    assert_eq!(schema.len(), UMM_VAR_PROPERTIES.len());
    assert_eq!(vocabulary.len(), 3);
}

#[test]
fn test_swath_file_matches_in_memory_tree() {
    let tree = l2p_swath_tree();
    let (_dir, path) = write_temp_granule("swath.nc", &tree);

    let schema = schema();
    let vocabulary = vocabulary();
    let from_file = GranuleProcessor::new(&schema, &vocabulary)
        .process_path(&path)
        .unwrap();

    assert_eq!(
        serde_json::to_string(&from_file).unwrap(),
        serde_json::to_string(&records_for(&tree)).unwrap()
    );
}

#[test]
fn test_char_fill_value_from_file_is_absent() {
    let tree = single_variable_tree(
        Variable::new("platform", ElementType::Char)
            .with_dimension("n", 4)
            .with_attribute("_FillValue", "N")
            .with_attribute("long_name", "platform code"),
    );
    let (_dir, path) = write_temp_granule("platform.nc", &tree);

    let schema = schema();
    let vocabulary = vocabulary();
    let records = GranuleProcessor::new(&schema, &vocabulary)
        .process_path(&path)
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name(), Some("platform"));
    assert_eq!(records[0].get("DataType"), Some(&json!("string")));
    assert!(records[0].get("FillValues").is_none(), "{:?}", records[0].to_json());
}

#[test]
fn test_real_granule() {
    let path = require_test_file!("ghrsst_l4_sample.nc");
    let schema = schema();
    let vocabulary = vocabulary();
    let records = GranuleProcessor::new(&schema, &vocabulary)
        .process_path(&path)
        .unwrap();
    assert!(!records.is_empty());
    for record in &records {
        assert!(record.name().is_some());
        assert!(record.get("MetadataSpecification").is_some());
    }
}
