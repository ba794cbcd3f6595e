use clap::Parser;
use std::path::PathBuf;

use ocmap::types::OutputFormat;
use ocmap::{MaskPolicy, ProjectionChoice, UncertaintyScale};

#[derive(Parser)]
#[command(name = "ocmap", version, about = "Ocean-color point maps from gridded NetCDF slices")]
pub struct CliArgs {
    /// Input NetCDF file with value, uncertainty, lon and lat variables
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for the rendered maps
    #[arg(short, long, default_value = "figs")]
    pub output_dir: PathBuf,

    /// JSON config file; command-line flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Index into the leading (time) dimension of the fields
    #[arg(long)]
    pub time_index: Option<usize>,

    /// Map preset (arctic, nordic or pacific)
    #[arg(short, long, value_enum)]
    pub projection: Option<ProjectionChoice>,

    /// How the uncertainty field and coordinates share the value field's mask
    #[arg(long, value_enum)]
    pub mask_policy: Option<MaskPolicy>,

    /// Treat this value as the fill sentinel instead of the declared one
    #[arg(long, allow_negative_numbers = true)]
    pub fill_value: Option<f64>,

    /// Ignore declared fill values (every cell valid)
    #[arg(long, default_value_t = false)]
    pub ignore_fill: bool,

    /// Color-scale bounds for the value map, `min:max`
    #[arg(long)]
    pub value_bounds: Option<String>,

    /// Color-scale bounds for the uncertainty map, `min:max`
    #[arg(long)]
    pub uncertainty_bounds: Option<String>,

    /// Render uncertainty as raw log10 RMSD or as linear standard deviation
    #[arg(long, value_enum)]
    pub uncertainty_scale: Option<UncertaintyScale>,

    /// Output format (png or jpeg)
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Map width in pixels (16 to 16384)
    #[arg(long)]
    pub width: Option<u32>,

    /// Skip meridians and parallels
    #[arg(long, default_value_t = false)]
    pub no_graticule: bool,

    /// Date used in output names (YYYYMMDD or YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Output file name prefix
    #[arg(long)]
    pub label: Option<String>,

    /// Name of the value variable
    #[arg(long)]
    pub value_var: Option<String>,

    /// Name of the uncertainty variable
    #[arg(long)]
    pub uncertainty_var: Option<String>,

    /// Name of the longitude axis variable
    #[arg(long)]
    pub lon_var: Option<String>,

    /// Name of the latitude axis variable
    #[arg(long)]
    pub lat_var: Option<String>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
