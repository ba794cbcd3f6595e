use tracing::debug;

use crate::core::processing::cloud::PointCloud;
use crate::core::processing::field::GridField;
use crate::core::processing::reconcile::AlignedGroup;

/// Hooks called at pipeline stage boundaries. All default to no-ops, so an
/// observer only implements the stages it cares about.
pub trait StageObserver {
    fn on_field_loaded(&mut self, _field: &GridField) {}

    fn on_mesh_built(&mut self, _lon_grid: &GridField, _lat_grid: &GridField) {}

    fn on_aligned(&mut self, _group: &AlignedGroup<'_>) {}

    fn on_compacted(&mut self, _cloud: &PointCloud) {}
}

/// Observer that ignores every stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {}

/// Logs shapes and valid-cell counts at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StageObserver for TracingObserver {
    fn on_field_loaded(&mut self, field: &GridField) {
        debug!(
            "field `{}`: shape={:?} valid={}",
            field.name(),
            field.shape(),
            field.valid_count()
        );
    }

    fn on_mesh_built(&mut self, lon_grid: &GridField, lat_grid: &GridField) {
        debug!(
            "mesh: lon={:?} lat={:?}",
            lon_grid.shape(),
            lat_grid.shape()
        );
    }

    fn on_aligned(&mut self, group: &AlignedGroup<'_>) {
        debug!(
            "aligned {:?}: shape={:?} valid={}",
            group.names(),
            group.shape(),
            group.valid_count()
        );
    }

    fn on_compacted(&mut self, cloud: &PointCloud) {
        debug!(
            "compacted: points={} value_range={:?} uncertainty_range={:?}",
            cloud.len(),
            PointCloud::finite_range(cloud.value()),
            PointCloud::finite_range(cloud.uncertainty())
        );
    }
}
