use ndarray::Array2;

use crate::core::processing::field::CoordinateAxis;

/// Broadcast 1D longitude (`N`) and latitude (`M`) axes into paired `(M, N)`
/// grids: `lon_grid[[i, j]] = lon[j]`, `lat_grid[[i, j]] = lat[i]`.
/// No masking happens here.
pub fn mesh(lon: &CoordinateAxis, lat: &CoordinateAxis) -> (Array2<f64>, Array2<f64>) {
    let shape = (lat.len(), lon.len());
    let (lon_values, lat_values) = (lon.values(), lat.values());
    let lon_grid = Array2::from_shape_fn(shape, |(_, j)| lon_values[j]);
    let lat_grid = Array2::from_shape_fn(shape, |(i, _)| lat_values[i]);
    (lon_grid, lat_grid)
}
