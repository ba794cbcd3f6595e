use gdal::cpl::CslStringList;
use gdal::{Dataset, DatasetOptions, GdalOpenFlags, errors::GdalError as GdalCrateError};
use ndarray::{ArrayD, IxDyn};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::io::source::{RawVariable, VariableSource};

/// Errors encountered when using the GDAL reader
#[derive(Debug, Error)]
pub enum GdalError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Dimension mismatch for `{0}`: expected {1} values, got {2}")]
    DimensionMismatch(String, usize, usize),
}

/// Reader for NetCDF (and other multidimensional) containers via GDAL's
/// multidimensional API. Variables are looked up in the root group.
pub struct GdalVariableReader {
    pub dataset: Dataset,
    pub path: PathBuf,
}

impl GdalVariableReader {
    /// Open a multidimensional dataset (e.g., NetCDF, HDF5, Zarr)
    pub fn open<P: AsRef<Path>>(path: P) -> std::result::Result<Self, GdalError> {
        let options = DatasetOptions {
            open_flags: GdalOpenFlags::GDAL_OF_MULTIDIM_RASTER,
            allowed_drivers: None,
            open_options: None,
            sibling_files: None,
        };
        let dataset = Dataset::open_ex(path.as_ref(), options)?;
        let names = {
            let root = dataset.root_group()?;
            root.array_names(CslStringList::new())
        };
        if names.is_empty() {
            return Err(GdalError::UnsupportedFormat(format!(
                "No arrays found in {:?}",
                path.as_ref()
            )));
        }
        info!("Opened {:?} ({} arrays)", path.as_ref(), names.len());
        Ok(GdalVariableReader {
            dataset,
            path: path.as_ref().to_path_buf(),
        })
    }

    fn read_array(&self, name: &str) -> std::result::Result<RawVariable, GdalError> {
        let root = self.dataset.root_group()?;
        let md_array = root.open_md_array(name, CslStringList::new())?;
        let shape: Vec<usize> = md_array
            .dimensions()?
            .iter()
            .map(|dim| dim.size())
            .collect();
        let start = vec![0u64; shape.len()];
        let values = md_array.read_as::<f64>(start, shape.clone())?;
        let expected: usize = shape.iter().product();
        let found = values.len();
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values)
            .map_err(|_| GdalError::DimensionMismatch(name.to_string(), expected, found))?;
        let fill_value = md_array.no_data_value_as_double();
        debug!("Read `{}` shape={:?} fill={:?}", name, shape, fill_value);
        Ok(RawVariable::new(name, data, fill_value))
    }
}

impl VariableSource for GdalVariableReader {
    fn read_variable(&self, name: &str) -> Result<RawVariable> {
        if !self.variable_names().iter().any(|n| n == name) {
            return Err(Error::MissingVariable {
                name: name.to_string(),
            });
        }
        Ok(self.read_array(name)?)
    }

    fn variable_names(&self) -> Vec<String> {
        match self.dataset.root_group() {
            Ok(root) => root.array_names(CslStringList::new()),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::PipelineParams;
    use crate::error::Error;

    const FILL: f64 = 99.0;

    /// One double variable of a classic netCDF file.
    struct Var {
        name: &'static str,
        dims: Vec<u32>,
        fill: Option<f64>,
        data: Vec<f64>,
    }

    fn put_u32(buf: &mut Vec<u8>, v: u32) {
        buf.extend_from_slice(&v.to_be_bytes());
    }

    fn put_name(buf: &mut Vec<u8>, name: &str) {
        put_u32(buf, name.len() as u32);
        buf.extend_from_slice(name.as_bytes());
        while buf.len() % 4 != 0 {
            buf.push(0);
        }
    }

    fn header(dims: &[(&str, u32)], vars: &[Var], begins: &[u32]) -> Vec<u8> {
        const NC_DIMENSION: u32 = 0x0A;
        const NC_VARIABLE: u32 = 0x0B;
        const NC_ATTRIBUTE: u32 = 0x0C;
        const NC_DOUBLE: u32 = 6;

        let mut buf = b"CDF\x01".to_vec();
        put_u32(&mut buf, 0);
        put_u32(&mut buf, NC_DIMENSION);
        put_u32(&mut buf, dims.len() as u32);
        for (name, len) in dims {
            put_name(&mut buf, name);
            put_u32(&mut buf, *len);
        }
        // no global attributes
        put_u32(&mut buf, 0);
        put_u32(&mut buf, 0);
        put_u32(&mut buf, NC_VARIABLE);
        put_u32(&mut buf, vars.len() as u32);
        for (var, begin) in vars.iter().zip(begins) {
            put_name(&mut buf, var.name);
            put_u32(&mut buf, var.dims.len() as u32);
            for id in &var.dims {
                put_u32(&mut buf, *id);
            }
            match var.fill {
                Some(fill) => {
                    put_u32(&mut buf, NC_ATTRIBUTE);
                    put_u32(&mut buf, 1);
                    put_name(&mut buf, "_FillValue");
                    put_u32(&mut buf, NC_DOUBLE);
                    put_u32(&mut buf, 1);
                    buf.extend_from_slice(&fill.to_be_bytes());
                }
                None => {
                    put_u32(&mut buf, 0);
                    put_u32(&mut buf, 0);
                }
            }
            put_u32(&mut buf, NC_DOUBLE);
            put_u32(&mut buf, (var.data.len() * 8) as u32);
            put_u32(&mut buf, *begin);
        }
        buf
    }

    /// 2x2 grid with one fill cell in `chlor_a`, written as netCDF classic.
    fn write_fixture(path: &Path) {
        let dims = [("lat", 2), ("lon", 2)];
        let vars = vec![
            Var { name: "lat", dims: vec![0], fill: None, data: vec![60.0, 70.0] },
            Var { name: "lon", dims: vec![1], fill: None, data: vec![10.0, 20.0] },
            Var { name: "chlor_a", dims: vec![0, 1], fill: Some(FILL), data: vec![1.0, FILL, 3.0, 4.0] },
            Var { name: "chlor_a_log10_rmsd", dims: vec![0, 1], fill: None, data: vec![5.0, 6.0, 7.0, 8.0] },
        ];
        let header_len = header(&dims, &vars, &vec![0; vars.len()]).len() as u32;
        let mut begins = Vec::new();
        let mut offset = header_len;
        for var in &vars {
            begins.push(offset);
            offset += (var.data.len() * 8) as u32;
        }
        let mut bytes = header(&dims, &vars, &begins);
        for var in &vars {
            for v in &var.data {
                bytes.extend_from_slice(&v.to_be_bytes());
            }
        }
        std::fs::write(path, bytes).unwrap();
    }

    /// Opens the fixture, or `None` when this GDAL build has no netCDF driver.
    fn open_fixture(dir: &tempfile::TempDir) -> Option<GdalVariableReader> {
        if gdal::DriverManager::get_driver_by_name("netCDF").is_err() {
            eprintln!("skipping: GDAL built without the netCDF driver");
            return None;
        }
        let path = dir.path().join("SCHL_20190601_full.nc");
        write_fixture(&path);
        Some(GdalVariableReader::open(&path).unwrap())
    }

    #[test]
    fn reads_values_and_declared_fill() {
        let dir = tempfile::tempdir().unwrap();
        let Some(reader) = open_fixture(&dir) else {
            return;
        };

        let names = reader.variable_names();
        assert!(names.iter().any(|n| n == "chlor_a"), "{names:?}");

        let chl = reader.read_variable("chlor_a").unwrap();
        assert_eq!(chl.shape(), &[2, 2]);
        assert_eq!(chl.fill_value, Some(FILL));
        assert_eq!(
            chl.data.iter().copied().collect::<Vec<_>>(),
            vec![1.0, FILL, 3.0, 4.0]
        );
    }

    #[test]
    fn unknown_variable_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let Some(reader) = open_fixture(&dir) else {
            return;
        };
        match reader.read_variable("sst") {
            Err(Error::MissingVariable { name }) => assert_eq!(name, "sst"),
            other => panic!("expected MissingVariable, got {other:?}"),
        }
    }

    #[test]
    fn file_feeds_the_point_cloud() {
        let dir = tempfile::tempdir().unwrap();
        let Some(reader) = open_fixture(&dir) else {
            return;
        };
        let cloud = crate::api::point_cloud_from_source(&reader, &PipelineParams::default()).unwrap();
        assert_eq!(cloud.value().to_vec(), vec![1.0, 3.0, 4.0]);
        assert_eq!(cloud.lon().to_vec(), vec![10.0, 10.0, 20.0]);
        assert_eq!(cloud.lat().to_vec(), vec![60.0, 70.0, 70.0]);
    }
}
