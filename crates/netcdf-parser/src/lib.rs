//! NetCDF-4 metadata reader.
//!
//! This crate reads the group hierarchy of a NetCDF-4 / HDF5 granule:
//! groups, dimensions, variables, element types and attributes. Variable
//! data is never loaded.
//!
//! # Implementation Notes
//!
//! Files are read through the `netcdf` crate (requires libhdf5-dev and
//! libnetcdf-dev). The file is snapshotted into the owned types in
//! [`model`] and the handle is released before [`open_granule`] returns.

pub mod error;
pub mod model;
pub mod native;

use std::io;
use std::path::Path;

use tracing::info;

pub use error::{NetCdfError, NetCdfResult};
pub use model::{
    AttrValue, Attributes, Dimension, ElementType, Group, UserTypeKind, Variable, ROOT_PATH,
};

/// Open a granule and read its complete group tree.
///
/// A missing or unreadable file is an error; there is no partial result.
pub fn open_granule<P: AsRef<Path>>(path: P) -> NetCdfResult<Group> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(NetCdfError::IoError(io::Error::new(
            io::ErrorKind::NotFound,
            format!("granule not found: {}", path.display()),
        )));
    }

    let root = native::read_tree(path)?;

    info!(
        path = %path.display(),
        groups = root.groups.len(),
        variables = root.variable_count(),
        "Opened granule"
    );
    Ok(root)
}
