//! Write in-memory group trees to real NetCDF-4 files.
//!
//! Lets tests go through the same `netcdf` reader production uses instead of
//! handing trees straight to the record builder. Only metadata is written;
//! variables carry no data.

use std::path::{Path, PathBuf};

use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::AttributeValue;
use netcdf_parser::{AttrValue, ElementType, Group};

/// Write `root` to `path` as a NetCDF-4 file.
///
/// Panics on any library error; the file is a test input.
pub fn write_granule(path: &Path, root: &Group) {
    let mut file = netcdf::create(path).expect("Failed to create NetCDF test file");
    let mut target = file.root_mut().expect("NetCDF-4 file has a root group");
    write_group(&mut target, root).expect("Failed to write NetCDF test file");
}

/// Write `root` to `name` inside a fresh temporary directory.
pub fn write_temp_granule(name: &str, root: &Group) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temporary test directory");
    let path = dir.path().join(name);
    write_granule(&path, root);
    (dir, path)
}

fn write_group(target: &mut netcdf::GroupMut<'_>, group: &Group) -> Result<(), netcdf::Error> {
    for (name, value) in group.attributes.iter() {
        target.add_attribute(name, attribute_value(value))?;
    }

    // Every dimension a variable uses is declared locally, shadowing any
    // ancestor declaration of the same name.
    let mut declared: Vec<&str> = Vec::new();
    let used = group
        .dimensions
        .iter()
        .chain(group.variables.iter().flat_map(|v| v.dimensions.iter()));
    for dim in used {
        if !declared.contains(&dim.name.as_str()) {
            target.add_dimension(&dim.name, dim.len)?;
            declared.push(&dim.name);
        }
    }

    for variable in &group.variables {
        let dims: Vec<&str> = variable.dimensions.iter().map(|d| d.name.as_str()).collect();
        let mut var = target.add_variable_with_type(
            &variable.name,
            &dims,
            &variable_type(&variable.element_type),
        )?;
        for (name, value) in variable.attributes.iter() {
            let value = if name == "_FillValue" {
                fill_value(value, &variable.element_type)
            } else {
                attribute_value(value)
            };
            var.put_attribute(name, value)?;
        }
    }

    for child in &group.groups {
        let mut node = target.add_group(&child.name)?;
        write_group(&mut node, child)?;
    }
    Ok(())
}

fn variable_type(ty: &ElementType) -> NcVariableType {
    match ty {
        ElementType::Char => NcVariableType::Char,
        ElementType::String => NcVariableType::String,
        ElementType::Byte => NcVariableType::Int(IntType::I8),
        ElementType::UByte => NcVariableType::Int(IntType::U8),
        ElementType::Short => NcVariableType::Int(IntType::I16),
        ElementType::UShort => NcVariableType::Int(IntType::U16),
        ElementType::Int => NcVariableType::Int(IntType::I32),
        ElementType::UInt => NcVariableType::Int(IntType::U32),
        ElementType::Int64 => NcVariableType::Int(IntType::I64),
        ElementType::UInt64 => NcVariableType::Int(IntType::U64),
        ElementType::Float => NcVariableType::Float(FloatType::F32),
        ElementType::Double => NcVariableType::Float(FloatType::F64),
        ElementType::UserDefined { .. } => {
            panic!("user-defined types are not supported in test granules: {:?}", ty)
        }
    }
}

fn attribute_value(value: &AttrValue) -> AttributeValue {
    match value {
        AttrValue::Text(s) => AttributeValue::Str(s.clone()),
        AttrValue::Texts(v) => AttributeValue::Strs(v.clone()),
        AttrValue::Int(v) => AttributeValue::Longlong(*v),
        AttrValue::UInt(v) => AttributeValue::Ulonglong(*v),
        AttrValue::Float(v) => AttributeValue::Float(*v),
        AttrValue::Double(v) => AttributeValue::Double(*v),
        AttrValue::Ints(v) => AttributeValue::Longlongs(v.clone()),
        AttrValue::UInts(v) => AttributeValue::Ulonglongs(v.clone()),
        AttrValue::Floats(v) => AttributeValue::Floats(v.clone()),
        AttrValue::Doubles(v) => AttributeValue::Doubles(v.clone()),
        AttrValue::Bytes(v) => AttributeValue::Str(String::from_utf8_lossy(v).into_owned()),
    }
}

/// libnetcdf requires `_FillValue` to have the variable's own type.
fn fill_value(value: &AttrValue, ty: &ElementType) -> AttributeValue {
    fn int<T: TryFrom<i64>>(v: i64) -> T {
        T::try_from(v).unwrap_or_else(|_| panic!("fill value {} out of range", v))
    }

    match (ty, value) {
        (ElementType::Byte, AttrValue::Int(v)) => AttributeValue::Schar(int(*v)),
        (ElementType::UByte, AttrValue::Int(v)) => AttributeValue::Uchar(int(*v)),
        (ElementType::Short, AttrValue::Int(v)) => AttributeValue::Short(int(*v)),
        (ElementType::UShort, AttrValue::Int(v)) => AttributeValue::Ushort(int(*v)),
        (ElementType::Int, AttrValue::Int(v)) => AttributeValue::Int(int(*v)),
        (ElementType::UInt, AttrValue::Int(v)) => AttributeValue::Uint(int(*v)),
        (ElementType::Float, AttrValue::Float(v)) => AttributeValue::Float(*v),
        (ElementType::Float, AttrValue::Double(v)) => AttributeValue::Float(*v as f32),
        (ElementType::Double, AttrValue::Float(v)) => AttributeValue::Double(f64::from(*v)),
        (_, other) => attribute_value(other),
    }
}
