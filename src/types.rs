//! Shared types and enums used across the crate.
//! Includes `ProjectionChoice`, `MaskPolicy`, `FillPolicy`, `OutputFormat`,
//! `UncertaintyScale` and the `ColorBounds` color-scale range.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Map preset used to project and frame the point cloud.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionChoice {
    /// North-polar azimuthal equidistant, bounded at 55°N
    Arctic,
    /// Cassini over the Nordic seas (-20..60°E, 55..75°N)
    Nordic,
    /// Cassini over the northern Pacific (160..240°E, 55..75°N)
    Pacific,
}

impl std::fmt::Display for ProjectionChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionChoice::Arctic => write!(f, "Arctic"),
            ProjectionChoice::Nordic => write!(f, "Nordic"),
            ProjectionChoice::Pacific => write!(f, "Pacific"),
        }
    }
}

/// How dependent arrays obtain the mask they share with the reference field.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskPolicy {
    /// Discard dependents' masks and adopt the reference mask verbatim.
    Adopt,
    /// Keep only cells valid in the reference and in every dependent.
    Intersect,
}

impl std::fmt::Display for MaskPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskPolicy::Adopt => write!(f, "Adopt"),
            MaskPolicy::Intersect => write!(f, "Intersect"),
        }
    }
}

/// Which sentinel, if any, marks a raw cell as invalid.
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Use the fill value the variable declares; all cells valid when it declares none.
    #[default]
    Declared,
    /// Treat every cell as valid.
    Ignore,
    /// Use this sentinel regardless of what the variable declares.
    Value(f64),
}

impl FillPolicy {
    /// Resolve the effective fill value for a variable with the given declaration.
    pub fn resolve(&self, declared: Option<f64>) -> Option<f64> {
        match self {
            FillPolicy::Declared => declared,
            FillPolicy::Ignore => None,
            FillPolicy::Value(v) => Some(*v),
        }
    }
}

/// Units the uncertainty column is rendered in.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UncertaintyScale {
    /// Raw log10 RMSD as stored in the file
    Log10,
    /// Linear standard deviation, `mean * (10^rmsd - 1)`
    Linear,
}

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    PNG,
    JPEG, // Lossy, preview only
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::PNG => "png",
            OutputFormat::JPEG => "jpg",
        }
    }
}

/// Fixed color-scale range; values outside are clamped to the end colors.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ColorBounds {
    pub min: f64,
    pub max: f64,
}

impl ColorBounds {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(Error::InvalidArgument {
                arg: "color_bounds",
                value: format!("{}..{}", self.min, self.max),
            });
        }
        Ok(())
    }

    /// Position of `value` in `[0, 1]`, clamped. `None` for non-finite values.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        Some(((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0))
    }
}

impl std::str::FromStr for ColorBounds {
    type Err = Error;

    /// Parses `min:max`, e.g. `0:10`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidArgument {
            arg: "color_bounds",
            value: s.to_string(),
        };
        let (lo, hi) = s.split_once(':').ok_or_else(invalid)?;
        let min = lo.trim().parse::<f64>().map_err(|_| invalid())?;
        let max = hi.trim().parse::<f64>().map_err(|_| invalid())?;
        ColorBounds::new(min, max)
    }
}
