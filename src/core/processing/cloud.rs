use ndarray::Array1;

use crate::core::processing::ops::log_to_linear_std_array;
use crate::error::{Error, Result};

/// One valid grid cell: all four scalars come from the same `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRecord {
    pub lon: f64,
    pub lat: f64,
    pub value: f64,
    pub uncertainty: f64,
}

/// Valid observations as four parallel columns in row-major scan order.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    lon: Array1<f64>,
    lat: Array1<f64>,
    value: Array1<f64>,
    uncertainty: Array1<f64>,
}

impl PointCloud {
    pub fn from_columns(
        lon: Array1<f64>,
        lat: Array1<f64>,
        value: Array1<f64>,
        uncertainty: Array1<f64>,
    ) -> Result<Self> {
        let len = value.len();
        for (what, column) in [("lon", &lon), ("lat", &lat), ("uncertainty", &uncertainty)] {
            if column.len() != len {
                return Err(Error::shape_mismatch(
                    format!("point cloud column `{what}`"),
                    &[len],
                    &[column.len()],
                ));
            }
        }
        Ok(Self {
            lon,
            lat,
            value,
            uncertainty,
        })
    }

    /// Build from compactor output ordered `[value, uncertainty, lon, lat]`.
    pub(crate) fn from_compacted(columns: Vec<Array1<f64>>) -> Result<Self> {
        let found = columns.len();
        match <[Array1<f64>; 4]>::try_from(columns) {
            Ok([value, uncertainty, lon, lat]) => Self::from_columns(lon, lat, value, uncertainty),
            Err(_) => Err(Error::shape_mismatch("compacted columns", &[4], &[found])),
        }
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn lon(&self) -> &Array1<f64> {
        &self.lon
    }

    pub fn lat(&self) -> &Array1<f64> {
        &self.lat
    }

    pub fn value(&self) -> &Array1<f64> {
        &self.value
    }

    pub fn uncertainty(&self) -> &Array1<f64> {
        &self.uncertainty
    }

    pub fn get(&self, k: usize) -> Option<PointRecord> {
        (k < self.len()).then(|| PointRecord {
            lon: self.lon[k],
            lat: self.lat[k],
            value: self.value[k],
            uncertainty: self.uncertainty[k],
        })
    }

    pub fn records(&self) -> impl Iterator<Item = PointRecord> + '_ {
        (0..self.len()).filter_map(move |k| self.get(k))
    }

    /// Same cloud with the uncertainty column turned from log10 RMSD into a
    /// linear standard deviation around each point's value.
    pub fn with_linear_uncertainty(&self) -> Result<Self> {
        Ok(Self {
            uncertainty: log_to_linear_std_array(&self.uncertainty, &self.value)?,
            ..self.clone()
        })
    }

    /// Min and max of the finite values in `column`, `None` if there are none.
    pub fn finite_range(column: &Array1<f64>) -> Option<(f64, f64)> {
        column
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
