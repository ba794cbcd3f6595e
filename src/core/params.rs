use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::render::scatter::MAX_MAP_WIDTH;
use crate::types::{
    ColorBounds, FillPolicy, MaskPolicy, OutputFormat, ProjectionChoice, UncertaintyScale,
};

/// Names of the variables the pipeline reads from the source container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableNames {
    pub value: String,
    pub uncertainty: String,
    pub lon: String,
    pub lat: String,
}

impl Default for VariableNames {
    fn default() -> Self {
        Self {
            value: "chlor_a".to_string(),
            uncertainty: "chlor_a_log10_rmsd".to_string(),
            lon: "lon".to_string(),
            lat: "lat".to_string(),
        }
    }
}

/// Pipeline parameters suitable for config files and CLI overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub variables: VariableNames,
    /// Index into the leading (time) dimension of 3D variables
    pub time_index: usize,
    pub fill_policy: FillPolicy,
    pub mask_policy: MaskPolicy,
    pub projection: ProjectionChoice,
    pub value_bounds: ColorBounds,
    pub uncertainty_bounds: ColorBounds,
    pub uncertainty_scale: UncertaintyScale,
    pub format: OutputFormat,
    /// Width of the map area in pixels (16 to 16384); height follows the map aspect ratio
    pub width: u32,
    /// Draw meridians and parallels
    pub graticule: bool,
    /// Date used in output file names; derived from the input name if absent
    pub target_date: Option<NaiveDate>,
    /// Output file name prefix, e.g. `CHL` gives `CHL_20190601.png`
    pub label: String,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            variables: VariableNames::default(),
            time_index: 0,
            fill_policy: FillPolicy::Declared,
            mask_policy: MaskPolicy::Adopt,
            projection: ProjectionChoice::Nordic,
            value_bounds: ColorBounds { min: 0.0, max: 10.0 },
            uncertainty_bounds: ColorBounds {
                min: 0.0,
                max: 100.0,
            },
            uncertainty_scale: UncertaintyScale::Log10,
            format: OutputFormat::PNG,
            width: 1200,
            graticule: true,
            target_date: None,
            label: "CHL".to_string(),
        }
    }
}

impl PipelineParams {
    /// Load from a JSON file; missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: PipelineParams = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        self.value_bounds.validate()?;
        self.uncertainty_bounds.validate()?;
        if self.label.is_empty() || self.label.contains(['/', '\\']) {
            return Err(crate::Error::InvalidArgument {
                arg: "label",
                value: self.label.clone(),
            });
        }
        if !(16..=MAX_MAP_WIDTH).contains(&self.width) {
            return Err(crate::Error::InvalidArgument {
                arg: "width",
                value: self.width.to_string(),
            });
        }
        Ok(())
    }
}
