//! Native NetCDF reading using the netcdf library.
//!
//! Walks the file through libnetcdf (which wraps HDF5) and snapshots the
//! group hierarchy into the owned model types. Only metadata is touched;
//! variable data is never read.

use std::path::Path;
use std::sync::Once;

use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::AttributeValue;
use tracing::{debug, warn};

use crate::error::{NetCdfError, NetCdfResult};
use crate::model::{AttrValue, Attributes, Dimension, ElementType, Group, UserTypeKind, Variable};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// It only needs to be called once per process, but is safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Read the full group tree of a NetCDF file.
///
/// The file handle is closed when this function returns, on success and on
/// every error path.
pub fn read_tree<P: AsRef<Path>>(path: P) -> NetCdfResult<Group> {
    silence_hdf5_errors();

    let nc_file = netcdf::open(path.as_ref())
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to open NetCDF: {}", e)))?;

    let root_group = nc_file
        .root()
        .ok_or_else(|| NetCdfError::MissingData("root group".to_string()))?;

    let mut root = Group::root();
    snapshot_group(&root_group, &mut root)?;

    debug!(
        path = %path.as_ref().display(),
        variables = root.variable_count(),
        "Read NetCDF group tree"
    );
    Ok(root)
}

fn snapshot_group(source: &netcdf::Group<'_>, target: &mut Group) -> NetCdfResult<()> {
    target.attributes = read_attributes(source.attributes(), None);
    target.dimensions = source
        .dimensions()
        .map(|d| Dimension::new(d.name(), d.len()))
        .collect();

    for var in source.variables() {
        let element_type = element_type(&var.vartype());
        let mut variable = Variable::new(var.name(), element_type.clone());
        variable.attributes = read_attributes(var.attributes(), Some(&element_type));
        variable.dimensions = var
            .dimensions()
            .iter()
            .map(|d| Dimension::new(d.name(), d.len()))
            .collect();
        target.add_variable(variable);
    }

    for child in source.groups() {
        let node = target.add_group(child.name());
        snapshot_group(&child, node)?;
    }
    Ok(())
}

/// Snapshot an attribute set. `owner` is the element type of the owning
/// variable, `None` for group attributes.
fn read_attributes<'a>(
    attrs: impl Iterator<Item = netcdf::Attribute<'a>>,
    owner: Option<&ElementType>,
) -> Attributes {
    let mut out = Attributes::new();
    for attr in attrs {
        match attr.value() {
            Ok(value) => out.set(attr.name(), attribute_value(attr.name(), value, owner)),
            Err(e) => warn!(attribute = attr.name(), error = %e, "Skipping unreadable attribute"),
        }
    }
    out
}

/// Convert one attribute. The fill value of a `char` variable holds raw
/// bytes of the variable's type, so it stays a byte string.
fn attribute_value(name: &str, value: AttributeValue, owner: Option<&ElementType>) -> AttrValue {
    match (name, owner, value) {
        ("_FillValue", Some(ElementType::Char), AttributeValue::Str(s)) => {
            AttrValue::Bytes(s.into_bytes())
        }
        (_, _, value) => convert_value(value),
    }
}

fn convert_value(value: AttributeValue) -> AttrValue {
    match value {
        AttributeValue::Uchar(v) => AttrValue::UInt(v as u64),
        AttributeValue::Uchars(v) => AttrValue::UInts(v.into_iter().map(u64::from).collect()),
        AttributeValue::Schar(v) => AttrValue::Int(v as i64),
        AttributeValue::Schars(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        AttributeValue::Ushort(v) => AttrValue::UInt(v as u64),
        AttributeValue::Ushorts(v) => AttrValue::UInts(v.into_iter().map(u64::from).collect()),
        AttributeValue::Short(v) => AttrValue::Int(v as i64),
        AttributeValue::Shorts(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        AttributeValue::Uint(v) => AttrValue::UInt(v as u64),
        AttributeValue::Uints(v) => AttrValue::UInts(v.into_iter().map(u64::from).collect()),
        AttributeValue::Int(v) => AttrValue::Int(v as i64),
        AttributeValue::Ints(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        AttributeValue::Ulonglong(v) => AttrValue::UInt(v),
        AttributeValue::Ulonglongs(v) => AttrValue::UInts(v),
        AttributeValue::Longlong(v) => AttrValue::Int(v),
        AttributeValue::Longlongs(v) => AttrValue::Ints(v),
        AttributeValue::Float(v) => AttrValue::Float(v),
        AttributeValue::Floats(v) => AttrValue::Floats(v),
        AttributeValue::Double(v) => AttrValue::Double(v),
        AttributeValue::Doubles(v) => AttrValue::Doubles(v),
        AttributeValue::Str(v) => AttrValue::Text(v),
        AttributeValue::Strs(v) => AttrValue::Texts(v),
    }
}

fn element_type(ty: &NcVariableType) -> ElementType {
    match ty {
        NcVariableType::Char => ElementType::Char,
        NcVariableType::String => ElementType::String,
        NcVariableType::Int(IntType::I8) => ElementType::Byte,
        NcVariableType::Int(IntType::U8) => ElementType::UByte,
        NcVariableType::Int(IntType::I16) => ElementType::Short,
        NcVariableType::Int(IntType::U16) => ElementType::UShort,
        NcVariableType::Int(IntType::I32) => ElementType::Int,
        NcVariableType::Int(IntType::U32) => ElementType::UInt,
        NcVariableType::Int(IntType::I64) => ElementType::Int64,
        NcVariableType::Int(IntType::U64) => ElementType::UInt64,
        NcVariableType::Float(FloatType::F32) => ElementType::Float,
        NcVariableType::Float(FloatType::F64) => ElementType::Double,
        NcVariableType::Compound(t) => ElementType::UserDefined {
            kind: UserTypeKind::Compound,
            name: t.name().to_string(),
        },
        NcVariableType::Enum(t) => ElementType::UserDefined {
            kind: UserTypeKind::Enum,
            name: t.name().to_string(),
        },
        NcVariableType::Opaque(t) => ElementType::UserDefined {
            kind: UserTypeKind::Opaque,
            name: t.name().to_string(),
        },
        NcVariableType::Vlen(t) => ElementType::UserDefined {
            kind: UserTypeKind::Vlen,
            name: t.name().to_string(),
        },
    }
}
