//! NetCDF element type to UMM-Var `DataType` mapping.
//!
//! <https://docs.unidata.ucar.edu/nug/current/md_types.html>

use netcdf_parser::ElementType;

use crate::error::{Result, UmmVarError};

/// Binary type code → UMM-Var data type.
///
/// Single characters map to `string`; UMM-Var 1.8.1 has no `char` type.
pub const DATATYPE_CODES: [(&str, &str); 11] = [
    ("S1", "string"),
    ("i1", "byte"),
    ("u1", "ubyte"),
    ("i2", "short"),
    ("u2", "ushort"),
    ("i4", "int"),
    ("u4", "uint"),
    ("i8", "int64"),
    ("u8", "uint64"),
    ("f4", "float"),
    ("f8", "double"),
];

/// Wrapper type description prefix → UMM-Var data type.
///
/// Compound types are reported as `ubyte`, an approximation; UMM-Var has no
/// structured type.
pub const WRAPPER_TYPES: [(&str, &str); 2] = [("vlen string", "string"), ("compound", "ubyte")];

/// UMM-Var data type of the string family.
pub const STRING_TYPE: &str = "string";

/// Resolve the UMM-Var data type of `element_type`.
///
/// Atomic types are looked up by binary code; types without one fall back to
/// a prefix match on their description. Anything left over is an
/// [`UmmVarError::UnmappedDatatype`]: the table is incomplete and the
/// variable cannot be described.
pub fn umm_datatype(variable: &str, element_type: &ElementType) -> Result<&'static str> {
    let found = match element_type.code() {
        Some(code) => DATATYPE_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, umm)| *umm),
        None => {
            let description = element_type.description();
            WRAPPER_TYPES
                .iter()
                .find(|(prefix, _)| description.starts_with(prefix))
                .map(|(_, umm)| *umm)
        }
    };

    found.ok_or_else(|| UmmVarError::UnmappedDatatype {
        variable: variable.to_string(),
        datatype: element_type.description(),
    })
}
