//! I/O layer for reading gridded variables and writing rendered maps.
//! Provides the `VariableSource` accessor with a GDAL-backed NetCDF reader and
//! an in-memory source, and `writers` for PNG/JPEG outputs.
pub mod source;
pub use source::{InMemorySource, RawVariable, VariableSource};

pub mod gdal;
pub use self::gdal::{GdalError, GdalVariableReader};

pub mod writers;
