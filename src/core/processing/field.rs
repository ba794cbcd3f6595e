use ndarray::{Array1, Array2, ArrayView2, Axis, Ix1, Ix2, Zip};
use tracing::debug;

use crate::error::{Error, Result};
use crate::io::source::RawVariable;
use crate::types::FillPolicy;

/// Per-cell validity over a 2D grid; `true` marks an invalid cell.
pub type Mask = Array2<bool>;

/// One 2D field at a fixed time index together with its validity mask.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    name: String,
    data: Array2<f64>,
    mask: Mask,
}

impl GridField {
    /// Select the `time_index` slice of `raw` (when it carries a leading time
    /// dimension) and mask cells equal to the effective fill value.
    pub fn load(raw: &RawVariable, time_index: usize, fill_policy: FillPolicy) -> Result<Self> {
        let slice = match raw.data.ndim() {
            3 => {
                let len = raw.data.len_of(Axis(0));
                if time_index >= len {
                    return Err(Error::TimeIndexOutOfRange {
                        name: raw.name.clone(),
                        index: time_index,
                        len,
                    });
                }
                raw.data.index_axis(Axis(0), time_index)
            }
            _ => raw.data.view(),
        };

        let rank = slice.ndim();
        let data = slice
            .into_dimensionality::<Ix2>()
            .map_err(|_| Error::Shape {
                name: raw.name.clone(),
                rank,
            })?
            .to_owned();

        let fill = fill_policy.resolve(raw.fill_value);
        let mask = match fill {
            Some(fill) if fill.is_nan() => data.mapv(f64::is_nan),
            Some(fill) => data.mapv(|v| v == fill),
            None => Array2::from_elem(data.dim(), false),
        };

        let field = Self {
            name: raw.name.clone(),
            data,
            mask,
        };
        debug!(
            "Loaded `{}` t={} shape={:?} fill={:?} valid={}",
            field.name,
            time_index,
            field.shape(),
            fill,
            field.valid_count()
        );
        Ok(field)
    }

    /// Field with every cell valid.
    pub fn fully_valid(name: impl Into<String>, data: Array2<f64>) -> Self {
        let mask = Array2::from_elem(data.dim(), false);
        Self {
            name: name.into(),
            data,
            mask,
        }
    }

    /// Pair `data` with an explicit mask of the same shape.
    pub fn with_mask(name: impl Into<String>, data: Array2<f64>, mask: Mask) -> Result<Self> {
        let name = name.into();
        if data.dim() != mask.dim() {
            return Err(Error::shape_mismatch(
                format!("mask of `{name}`"),
                data.shape(),
                mask.shape(),
            ));
        }
        Ok(Self { name, data, mask })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|&&invalid| !invalid).count()
    }

    /// Value at `(row, col)`, or `None` where the cell is invalid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match self.mask.get((row, col)) {
            Some(false) => self.data.get((row, col)).copied(),
            _ => None,
        }
    }

    /// Mark every cell this field considers invalid as invalid in `target`.
    pub(crate) fn merge_invalid_into(&self, target: &mut Mask) {
        Zip::from(target)
            .and(&self.mask)
            .for_each(|t, &m| *t = *t || m);
    }
}

/// Named 1D coordinate axis (longitude or latitude).
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateAxis {
    name: String,
    values: Array1<f64>,
}

impl CoordinateAxis {
    pub fn new(name: impl Into<String>, values: Array1<f64>) -> Result<Self> {
        let name = name.into();
        if values.is_empty() {
            return Err(Error::EmptyAxis { name });
        }
        Ok(Self { name, values })
    }

    /// Axis from a raw variable; it must be one-dimensional.
    pub fn from_raw(raw: &RawVariable) -> Result<Self> {
        let values = raw
            .data
            .view()
            .into_dimensionality::<Ix1>()
            .map_err(|_| Error::Shape {
                name: raw.name.clone(),
                rank: raw.data.ndim(),
            })?
            .to_owned();
        Self::new(raw.name.clone(), values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
