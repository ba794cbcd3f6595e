use tracing::info;

use crate::core::params::PipelineParams;
use crate::core::processing::cloud::PointCloud;
use crate::core::processing::field::{CoordinateAxis, GridField};
use crate::core::processing::mesh::mesh;
use crate::core::processing::observer::StageObserver;
use crate::core::processing::reconcile::MaskReconciler;
use crate::error::Result;
use crate::io::source::VariableSource;

/// Read the value and uncertainty fields plus both axes from `source` and
/// reduce them to a point cloud of the cells valid under the value field's
/// mask (or the intersection of masks, per `params.mask_policy`).
pub fn build_point_cloud<S: VariableSource + ?Sized>(
    source: &S,
    params: &PipelineParams,
    observer: &mut dyn StageObserver,
) -> Result<PointCloud> {
    let names = &params.variables;

    let value = GridField::load(
        &source.read_variable(&names.value)?,
        params.time_index,
        params.fill_policy,
    )?;
    observer.on_field_loaded(&value);

    let uncertainty = GridField::load(
        &source.read_variable(&names.uncertainty)?,
        params.time_index,
        params.fill_policy,
    )?;
    observer.on_field_loaded(&uncertainty);

    let lon_axis = CoordinateAxis::from_raw(&source.read_variable(&names.lon)?)?;
    let lat_axis = CoordinateAxis::from_raw(&source.read_variable(&names.lat)?)?;
    let (lon_grid, lat_grid) = mesh(&lon_axis, &lat_axis);
    let lon_grid = GridField::fully_valid(lon_axis.name(), lon_grid);
    let lat_grid = GridField::fully_valid(lat_axis.name(), lat_grid);
    observer.on_mesh_built(&lon_grid, &lat_grid);

    let group = MaskReconciler::new(params.mask_policy)
        .align(&value, &[&uncertainty, &lon_grid, &lat_grid])?;
    observer.on_aligned(&group);

    let cloud = PointCloud::from_compacted(group.compact()?)?;
    observer.on_compacted(&cloud);

    info!(
        "Point cloud: {} of {} cells valid (t={}, mask policy {})",
        cloud.len(),
        group.mask().len(),
        params.time_index,
        params.mask_policy
    );
    Ok(cloud)
}
