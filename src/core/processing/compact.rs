use ndarray::{Array1, ArrayView2};

use crate::core::processing::field::Mask;
use crate::error::{Error, Result};

/// Compact mask-aligned 2D arrays into parallel 1D arrays holding only the
/// cells where `mask` is `false`.
///
/// Every output uses the same row-major scan (row 0 left to right, then row
/// 1, ...), so index `k` refers to the same source cell in all outputs. An
/// all-invalid mask yields empty outputs.
pub fn compact(mask: &Mask, arrays: &[ArrayView2<'_, f64>]) -> Result<Vec<Array1<f64>>> {
    for (idx, array) in arrays.iter().enumerate() {
        if array.dim() != mask.dim() {
            return Err(Error::shape_mismatch(
                format!("array #{idx} compacted against mask"),
                mask.shape(),
                array.shape(),
            ));
        }
    }

    let valid = mask.iter().filter(|&&invalid| !invalid).count();
    let outputs = arrays
        .iter()
        .map(|array| {
            // `iter()` walks logical row-major order whatever the memory layout
            let mut out = Vec::with_capacity(valid);
            out.extend(
                mask.iter()
                    .zip(array.iter())
                    .filter(|&(&invalid, _)| !invalid)
                    .map(|(_, &v)| v),
            );
            Array1::from_vec(out)
        })
        .collect();
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn output_length_equals_valid_count() {
        let mask = array![[false, true, false], [true, true, false]];
        let a = Array2::<f64>::ones((2, 3));
        let out = compact(&mask, &[a.view()]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 3);
    }

    #[test]
    fn outputs_follow_row_major_order_together() {
        let mask = array![[false, true], [false, false]];
        let rows = Array2::from_shape_fn((2, 2), |(i, _)| i as f64);
        let cols = Array2::from_shape_fn((2, 2), |(_, j)| j as f64);
        let out = compact(&mask, &[rows.view(), cols.view()]).unwrap();
        assert_eq!(out[0], array![0.0, 1.0, 1.0]);
        assert_eq!(out[1], array![0.0, 0.0, 1.0]);
    }

    #[test]
    fn column_major_input_is_scanned_row_major() {
        let mask = Array2::from_elem((2, 3), false);
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let transposed = a.t().to_owned();
        let out = compact(&mask, &[transposed.t()]).unwrap();
        assert_eq!(out[0], array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn all_invalid_mask_gives_empty_outputs() {
        let mask = Array2::from_elem((2, 2), true);
        let a = Array2::<f64>::zeros((2, 2));
        let b = Array2::<f64>::ones((2, 2));
        let out = compact(&mask, &[a.view(), b.view()]).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|o| o.is_empty()));
    }

    #[test]
    fn mismatched_shape_is_an_error() {
        let mask = Array2::from_elem((3, 3), false);
        let a = Array2::<f64>::zeros((2, 2));
        match compact(&mask, &[a.view()]) {
            Err(Error::ShapeMismatch { expected, found, .. }) => {
                assert_eq!(expected, vec![3, 3]);
                assert_eq!(found, vec![2, 2]);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn no_arrays_is_fine() {
        let mask = Array2::from_elem((2, 2), false);
        assert!(compact(&mask, &[]).unwrap().is_empty());
    }
}
