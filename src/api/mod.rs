//! High-level, ergonomic library API: build a point cloud from any
//! `VariableSource`, render it to the value and uncertainty maps, or run the
//! whole file-to-images flow. Prefer these entrypoints over the low-level
//! processing modules when integrating the crate.
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use image::RgbImage;
use ndarray::Array1;
use tracing::{info, warn};

use crate::core::params::PipelineParams;
use crate::core::processing::cloud::PointCloud;
use crate::core::processing::observer::{StageObserver, TracingObserver};
use crate::core::processing::pipeline::build_point_cloud;
use crate::error::Result;
use crate::io::gdal::GdalVariableReader;
use crate::io::source::VariableSource;
use crate::io::writers::jpeg::write_rgb_jpeg;
use crate::io::writers::png::write_rgb_png;
use crate::render::projection::MapView;
use crate::render::scatter::{ScatterStyle, render_scatter};
use crate::types::{OutputFormat, UncertaintyScale};

/// Which column of the point cloud a map is colored by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    Value,
    Uncertainty,
}

/// One rendered map, in memory
#[derive(Debug, Clone)]
pub struct RenderedMap {
    pub kind: MapKind,
    /// File name stem, e.g. `CHL_uncertainty_20190601`
    pub title: String,
    pub image: RgbImage,
}

/// Outcome of a file-to-images run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub points: usize,
    pub outputs: Vec<PathBuf>,
}

/// Build the point cloud from an already opened source.
pub fn point_cloud_from_source<S: VariableSource + ?Sized>(
    source: &S,
    params: &PipelineParams,
) -> Result<PointCloud> {
    params.validate()?;
    build_point_cloud(source, params, &mut TracingObserver)
}

/// Same as [`point_cloud_from_source`] with a caller-supplied stage observer.
pub fn point_cloud_with_observer<S: VariableSource + ?Sized>(
    source: &S,
    params: &PipelineParams,
    observer: &mut dyn StageObserver,
) -> Result<PointCloud> {
    params.validate()?;
    build_point_cloud(source, params, observer)
}

/// Render the value map and the uncertainty map for `cloud`, in that order.
pub fn render_point_cloud(
    cloud: &PointCloud,
    params: &PipelineParams,
    date_label: &str,
) -> Result<Vec<RenderedMap>> {
    params.validate()?;
    if cloud.is_empty() {
        warn!("Point cloud is empty; maps will only show the frame and color bar");
    }
    let view = MapView::for_choice(params.projection);
    let (x, y) = view.project_points(cloud.lon(), cloud.lat());

    let uncertainty: Array1<f64> = match params.uncertainty_scale {
        UncertaintyScale::Log10 => cloud.uncertainty().clone(),
        UncertaintyScale::Linear => cloud.with_linear_uncertainty()?.uncertainty().clone(),
    };

    let requests = [
        (
            MapKind::Value,
            format!("{}_{}", params.label, date_label),
            cloud.value(),
            params.value_bounds,
        ),
        (
            MapKind::Uncertainty,
            format!("{}_uncertainty_{}", params.label, date_label),
            &uncertainty,
            params.uncertainty_bounds,
        ),
    ];

    let mut maps = Vec::with_capacity(requests.len());
    for (kind, title, values, bounds) in requests {
        info!(
            "Rendering {} ({} projection, bounds {}..{})",
            title, params.projection, bounds.min, bounds.max
        );
        let style = ScatterStyle {
            width: params.width,
            graticule: params.graticule,
            title: &title,
        };
        let image = render_scatter(&view, &x, &y, values, bounds, style)?;
        maps.push(RenderedMap { kind, title, image });
    }
    Ok(maps)
}

/// Write rendered maps into `output_dir` as `<title>.<ext>`.
pub fn save_maps(maps: &[RenderedMap], output_dir: &Path, format: OutputFormat) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let mut outputs = Vec::with_capacity(maps.len());
    for map in maps {
        let path = output_dir.join(format!("{}.{}", map.title, format.extension()));
        match format {
            OutputFormat::PNG => write_rgb_png(&path, &map.image)?,
            OutputFormat::JPEG => write_rgb_jpeg(
                &path,
                map.image.width() as usize,
                map.image.height() as usize,
                map.image.as_raw(),
            )?,
        }
        info!("Saved {:?}", path);
        outputs.push(path);
    }
    Ok(outputs)
}

/// Label used in output names: the configured date, else the first
/// `YYYYMMDD` token of the input file name, else the file stem.
pub fn date_label(input: &Path, target_date: Option<NaiveDate>) -> String {
    if let Some(date) = target_date {
        return date.format("%Y%m%d").to_string();
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dated = stem
        .split(|c: char| !c.is_ascii_digit())
        .filter(|token| token.len() == 8)
        .find(|token| NaiveDate::parse_from_str(token, "%Y%m%d").is_ok())
        .map(str::to_string);
    dated.unwrap_or(stem)
}

/// Read `input`, build the point cloud and write both maps into `output_dir`.
pub fn process_file_to_dir(input: &Path, output_dir: &Path, params: &PipelineParams) -> Result<RunReport> {
    params.validate()?;
    let cloud = {
        let reader = GdalVariableReader::open(input)?;
        build_point_cloud(&reader, params, &mut TracingObserver)?
    };
    let label = date_label(input, params.target_date);
    let maps = render_point_cloud(&cloud, params, &label)?;
    let outputs = save_maps(&maps, output_dir, params.format)?;
    Ok(RunReport {
        points: cloud.len(),
        outputs,
    })
}
