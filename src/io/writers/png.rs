use image::{ImageFormat, RgbImage};
use std::path::Path;

use crate::error::Result;

pub fn write_rgb_png(output: &Path, image: &RgbImage) -> Result<()> {
    image.save_with_format(output, ImageFormat::Png)?;
    Ok(())
}
