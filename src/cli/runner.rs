use chrono::NaiveDate;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ocmap::{ColorBounds, FillPolicy, PipelineParams, process_file_to_dir};

use super::args::CliArgs;
use super::errors::AppError;

fn parse_bounds(value: &str) -> Result<ColorBounds, AppError> {
    value.parse::<ColorBounds>().map_err(|_| AppError::InvalidBounds {
        value: value.to_string(),
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| AppError::InvalidDate {
            value: value.to_string(),
        })
}

/// Layer command-line flags over `params` (from a config file or defaults).
fn apply_overrides(mut params: PipelineParams, args: &CliArgs) -> Result<PipelineParams, AppError> {
    if let Some(t) = args.time_index {
        params.time_index = t;
    }
    if let Some(p) = args.projection {
        params.projection = p;
    }
    if let Some(m) = args.mask_policy {
        params.mask_policy = m;
    }
    match (args.ignore_fill, args.fill_value) {
        (true, Some(_)) => {
            return Err(AppError::Conflict {
                first: "--ignore-fill",
                second: "--fill-value",
            });
        }
        (true, None) => params.fill_policy = FillPolicy::Ignore,
        (false, Some(v)) => params.fill_policy = FillPolicy::Value(v),
        (false, None) => {}
    }
    if let Some(b) = &args.value_bounds {
        params.value_bounds = parse_bounds(b)?;
    }
    if let Some(b) = &args.uncertainty_bounds {
        params.uncertainty_bounds = parse_bounds(b)?;
    }
    if let Some(s) = args.uncertainty_scale {
        params.uncertainty_scale = s;
    }
    if let Some(f) = args.format {
        params.format = f;
    }
    if let Some(w) = args.width {
        params.width = w;
    }
    if args.no_graticule {
        params.graticule = false;
    }
    if let Some(d) = &args.date {
        params.target_date = Some(parse_date(d)?);
    }
    if let Some(label) = &args.label {
        params.label = label.clone();
    }
    if let Some(name) = &args.value_var {
        params.variables.value = name.clone();
    }
    if let Some(name) = &args.uncertainty_var {
        params.variables.uncertainty = name.clone();
    }
    if let Some(name) = &args.lon_var {
        params.variables.lon = name.clone();
    }
    if let Some(name) = &args.lat_var {
        params.variables.lat = name.clone();
    }
    Ok(params)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("ocmap=debug,info"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    if !args.input.is_file() {
        return Err(AppError::MissingInput {
            path: args.input.display().to_string(),
        }
        .into());
    }

    let base = match &args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            PipelineParams::from_json_file(path)?
        }
        None => PipelineParams::default(),
    };
    let params = apply_overrides(base, &args)?;
    params.validate()?;

    info!(
        "Processing {:?} -> {:?} (projection {}, t={})",
        args.input, args.output_dir, params.projection, params.time_index
    );
    let report = process_file_to_dir(&args.input, &args.output_dir, &params)?;
    info!(
        "Successfully processed: {} points -> {:?}",
        report.points, report.outputs
    );

    Ok(())
}
