use ndarray::{Array1, Zip};

use crate::error::{Error, Result};

/// Standard deviation given in log10 units converted to linear units around
/// `mean_linear`: `mean * (10^log_std - 1)`.
pub fn log_to_linear_std(log_std: f64, mean_linear: f64) -> f64 {
    mean_linear * (10f64.powf(log_std) - 1.0)
}

/// Element-wise [`log_to_linear_std`]. Both columns must have the same length.
pub fn log_to_linear_std_array(
    log_std: &Array1<f64>,
    mean_linear: &Array1<f64>,
) -> Result<Array1<f64>> {
    if log_std.len() != mean_linear.len() {
        return Err(Error::shape_mismatch(
            "log10 spread and mean",
            &[mean_linear.len()],
            &[log_std.len()],
        ));
    }
    Ok(Zip::from(log_std)
        .and(mean_linear)
        .map_collect(|&s, &m| log_to_linear_std(s, m)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn zero_log_std_is_zero_spread() {
        assert_eq!(log_to_linear_std(0.0, 5.0), 0.0);
    }

    #[test]
    fn one_decade() {
        assert!((log_to_linear_std(1.0, 2.0) - 18.0).abs() < 1e-12);
    }

    #[test]
    fn array_form_matches_scalar() {
        let s = array![0.0, 0.5, 1.0];
        let m = array![1.0, 2.0, 3.0];
        let out = log_to_linear_std_array(&s, &m).unwrap();
        for k in 0..3 {
            assert_eq!(out[k], log_to_linear_std(s[k], m[k]));
        }
    }

    #[test]
    fn array_form_rejects_unequal_lengths() {
        let err = log_to_linear_std_array(&array![0.0, 1.0], &array![1.0, 2.0, 3.0]);
        match err {
            Err(Error::ShapeMismatch { expected, found, .. }) => {
                assert_eq!(expected, vec![3]);
                assert_eq!(found, vec![2]);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }
}
