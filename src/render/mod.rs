//! Map rendering: projection presets, color map and the scatter renderer
//! that turns a projected point cloud into an RGB image.
pub mod colormap;
pub mod projection;
pub mod scatter;

pub use projection::{MapExtent, MapProjection, MapView};
pub use scatter::{CanvasLayout, MAX_MAP_WIDTH, ScatterStyle, render_scatter};
