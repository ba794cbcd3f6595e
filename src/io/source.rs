use std::collections::HashMap;

use ndarray::{ArrayD, IxDyn};

use crate::error::{Error, Result};

/// A named numeric array as stored in the source container, before any
/// time selection or masking.
#[derive(Debug, Clone)]
pub struct RawVariable {
    pub name: String,
    pub data: ArrayD<f64>,
    /// Declared fill value (`_FillValue` / GDAL no-data), if any
    pub fill_value: Option<f64>,
}

impl RawVariable {
    pub fn new(name: impl Into<String>, data: ArrayD<f64>, fill_value: Option<f64>) -> Self {
        Self {
            name: name.into(),
            data,
            fill_value,
        }
    }

    /// Build from a flat row-major buffer and an explicit shape.
    pub fn from_shape_vec(
        name: impl Into<String>,
        shape: &[usize],
        values: Vec<f64>,
        fill_value: Option<f64>,
    ) -> Result<Self> {
        let name = name.into();
        let found = values.len();
        let data = ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|_| {
            Error::shape_mismatch(
                format!("variable `{name}` buffer"),
                &[shape.iter().product()],
                &[found],
            )
        })?;
        Ok(Self::new(name, data, fill_value))
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }
}

/// By-name accessor over a structured array container.
pub trait VariableSource {
    /// Read variable `name` in full. Absent variables yield `Error::MissingVariable`.
    fn read_variable(&self, name: &str) -> Result<RawVariable>;

    /// Names of all variables the source exposes.
    fn variable_names(&self) -> Vec<String>;
}

/// Variables held in memory; used for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    variables: HashMap<String, RawVariable>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: RawVariable) {
        self.variables.insert(variable.name.clone(), variable);
    }

    pub fn with_variable(mut self, variable: RawVariable) -> Self {
        self.insert(variable);
        self
    }
}

impl VariableSource for InMemorySource {
    fn read_variable(&self, name: &str) -> Result<RawVariable> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::MissingVariable {
                name: name.to_string(),
            })
    }

    fn variable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.variables.keys().cloned().collect();
        names.sort();
        names
    }
}
