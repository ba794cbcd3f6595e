#![doc = r#"
OCMAP: ocean-color point maps from gridded satellite products.

This crate turns one time slice of a gridded ocean-color product (a mean
chlorophyll-a field and its log10 RMSD uncertainty on a lat/lon grid, read from
NetCDF) into a sparse point cloud of valid observations, and renders that cloud
as two projected scatter maps (value and uncertainty). It powers the `ocmap`
CLI and can be embedded in your own Rust applications.

Requirements
------------
- GDAL development headers and runtime (with the netCDF driver) on your system.
- Rust 2024 edition toolchain.

Pipeline
--------
1. `GridField::load` selects the time slice and masks fill values.
2. `mesh` broadcasts the lon/lat axes to the grid shape.
3. `MaskReconciler::align` forces the uncertainty field and both meshes onto
   the value field's mask (or the intersection of masks, see `MaskPolicy`).
4. `compact` keeps only the valid cells, row-major, as parallel columns.
5. The resulting `PointCloud` is projected and rendered twice.

Quick start: process a file to images
-------------------------------------
```rust,no_run
use std::path::Path;
use ocmap::{process_file_to_dir, PipelineParams, ProjectionChoice};

fn main() -> ocmap::Result<()> {
    let params = PipelineParams {
        projection: ProjectionChoice::Arctic,
        ..PipelineParams::default()
    };
    let report = process_file_to_dir(
        Path::new("data/SCHL_20190601_full.nc"),
        Path::new("figs"),
        &params,
    )?;
    println!("{} points -> {:?}", report.points, report.outputs);
    Ok(())
}
```

Build a point cloud from in-memory arrays
-----------------------------------------
```rust
use ocmap::{point_cloud_from_source, InMemorySource, PipelineParams, RawVariable};

fn main() -> ocmap::Result<()> {
    let source = InMemorySource::new()
        .with_variable(RawVariable::from_shape_vec(
            "chlor_a", &[1, 2, 2], vec![1.0, 99.0, 3.0, 4.0], Some(99.0),
        )?)
        .with_variable(RawVariable::from_shape_vec(
            "chlor_a_log10_rmsd", &[1, 2, 2], vec![5.0, 6.0, 7.0, 8.0], None,
        )?)
        .with_variable(RawVariable::from_shape_vec("lon", &[2], vec![10.0, 20.0], None)?)
        .with_variable(RawVariable::from_shape_vec("lat", &[2], vec![100.0, 200.0], None)?);

    let cloud = point_cloud_from_source(&source, &PipelineParams::default())?;
    assert_eq!(cloud.value().to_vec(), vec![1.0, 3.0, 4.0]);
    assert_eq!(cloud.lon().to_vec(), vec![10.0, 10.0, 20.0]);
    Ok(())
}
```

Error handling
--------------
All public functions return `ocmap::Result<T>`; match on `ocmap::Error` to handle
specific cases, e.g. missing variables or shape mismatches.

```rust,no_run
use std::path::Path;
use ocmap::{process_file_to_dir, Error, PipelineParams};

fn main() {
    match process_file_to_dir(Path::new("bad.nc"), Path::new("figs"), &PipelineParams::default()) {
        Ok(_) => {}
        Err(Error::MissingVariable { name }) => eprintln!("variable {name} not in file"),
        Err(Error::Gdal(e)) => eprintln!("GDAL error: {e}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`]: high-level, ergonomic entry points.
- [`core`]: field loading, meshing, mask reconciliation and compaction.
- [`render`]: projection presets and the scatter renderer.
- [`io`]: variable sources (GDAL, in-memory) and image writers.
- [`types`]: enums and small value types (`ProjectionChoice`, `MaskPolicy`, ...).
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod render;
pub mod types;

// Curated public API surface
// Types
pub use self::core::params::{PipelineParams, VariableNames};
pub use self::core::processing::cloud::{PointCloud, PointRecord};
pub use self::core::processing::compact::compact;
pub use self::core::processing::field::{CoordinateAxis, GridField, Mask};
pub use self::core::processing::mesh::mesh;
pub use self::core::processing::observer::{NoopObserver, StageObserver, TracingObserver};
pub use self::core::processing::ops::{log_to_linear_std, log_to_linear_std_array};
pub use self::core::processing::reconcile::{AlignedGroup, MaskReconciler};
pub use error::{Error, Result};
pub use types::{
    ColorBounds, FillPolicy, MaskPolicy, OutputFormat, ProjectionChoice, UncertaintyScale,
};

// Readers
pub use io::gdal::{GdalError, GdalVariableReader};
pub use io::source::{InMemorySource, RawVariable, VariableSource};

// High-level API re-exports
pub use api::{
    MapKind, RenderedMap, RunReport, date_label, point_cloud_from_source,
    point_cloud_with_observer, process_file_to_dir, render_point_cloud, save_maps,
};
