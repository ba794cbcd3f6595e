//! Scatter rendering of projected points onto an RGB canvas: title on top,
//! graticule labels on the left and bottom, vertical color bar with value
//! labels on the right.

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;
use ndarray::Array1;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::render::colormap::viridis;
use crate::render::projection::{MapView, wrap_longitude};
use crate::types::ColorBounds;

/// Embedded font data - DejaVu Sans Mono
const FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");

/// Widest map area accepted, in pixels
pub const MAX_MAP_WIDTH: u32 = 16_384;

const TITLE_BAND: u32 = 32;
const LEFT_BAND: u32 = 48;
const BOTTOM_BAND: u32 = 28;
const BAR_GAP: u32 = 24;
const BAR_WIDTH: u32 = 24;
const TICK_LEN: u32 = 6;
const TICK_LABEL_GAP: u32 = 4;
const TICK_LABEL_BAND: u32 = 56;
const RIGHT_PAD: u32 = 8;
const MAX_ASPECT: f64 = 4.0;

const TITLE_SIZE: f32 = 18.0;
const LABEL_SIZE: f32 = 12.0;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const FRAME: Rgb<u8> = Rgb([105, 105, 105]);
const GRATICULE: Rgb<u8> = Rgb([170, 170, 170]);
const TEXT: Rgb<u8> = Rgb([33, 33, 33]);

/// Knobs of one rendered map.
#[derive(Debug, Clone, Copy)]
pub struct ScatterStyle<'a> {
    /// Width of the map area in pixels, at most [`MAX_MAP_WIDTH`]
    pub width: u32,
    /// Draw and label meridians and parallels
    pub graticule: bool,
    /// Centered above the map; empty for none
    pub title: &'a str,
}

/// Pixel geometry of a rendered map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasLayout {
    pub map_width: u32,
    pub map_height: u32,
}

impl CanvasLayout {
    /// Map area `width` pixels wide, height following the view's aspect ratio.
    pub fn for_view(view: &MapView, width: u32) -> Self {
        let width = width.max(2);
        let aspect = (view.extent.height() / view.extent.width()).clamp(1.0 / MAX_ASPECT, MAX_ASPECT);
        let map_height = ((width as f64) * aspect).round().max(2.0) as u32;
        Self {
            map_width: width,
            map_height,
        }
    }

    /// Top-left pixel of the map area.
    pub fn map_origin(&self) -> (u32, u32) {
        (LEFT_BAND, TITLE_BAND)
    }

    pub fn total_width(&self) -> Result<u32> {
        checked_sum(
            &[
                LEFT_BAND,
                self.map_width,
                BAR_GAP,
                BAR_WIDTH,
                TICK_LEN,
                TICK_LABEL_GAP,
                TICK_LABEL_BAND,
                RIGHT_PAD,
            ],
            "width",
            self.map_width,
        )
    }

    pub fn total_height(&self) -> Result<u32> {
        checked_sum(&[TITLE_BAND, self.map_height, BOTTOM_BAND], "height", self.map_height)
    }

    /// Canvas pixel for a projected coordinate inside the view.
    pub fn to_pixel(&self, view: &MapView, x: f64, y: f64) -> Option<(u32, u32)> {
        if !x.is_finite() || !y.is_finite() || !view.extent.contains(x, y) {
            return None;
        }
        let fx = (x - view.extent.x_min) / view.extent.width();
        let fy = (view.extent.y_max - y) / view.extent.height();
        let px = (fx * (self.map_width - 1) as f64).round() as u32;
        let py = (fy * (self.map_height - 1) as f64).round() as u32;
        Some((LEFT_BAND.checked_add(px)?, TITLE_BAND.checked_add(py)?))
    }

    fn map_right(&self) -> u32 {
        LEFT_BAND + self.map_width
    }

    fn map_bottom(&self) -> u32 {
        TITLE_BAND + self.map_height
    }
}

fn checked_sum(parts: &[u32], arg: &'static str, size: u32) -> Result<u32> {
    parts
        .iter()
        .try_fold(0u32, |acc, &p| acc.checked_add(p))
        .ok_or_else(|| Error::InvalidArgument {
            arg,
            value: size.to_string(),
        })
}

/// Where a graticule line leaves the map, and its label.
enum EdgeLabel {
    Bottom { text: String, x: u32 },
    Left { text: String, y: u32 },
}

/// Draw one map: graticule, then every point as a filled disc in input order
/// colored by `values` within `bounds`, then the frame, color bar and text.
///
/// `x`, `y` and `values` must be index-aligned. Points with non-finite
/// coordinates or values are skipped.
pub fn render_scatter(
    view: &MapView,
    x: &Array1<f64>,
    y: &Array1<f64>,
    values: &Array1<f64>,
    bounds: ColorBounds,
    style: ScatterStyle<'_>,
) -> Result<RgbImage> {
    if x.len() != values.len() || y.len() != values.len() {
        return Err(Error::shape_mismatch(
            "scatter inputs",
            &[values.len(), values.len()],
            &[x.len(), y.len()],
        ));
    }
    bounds.validate()?;
    if style.width > MAX_MAP_WIDTH {
        return Err(Error::InvalidArgument {
            arg: "width",
            value: style.width.to_string(),
        });
    }

    let layout = CanvasLayout::for_view(view, style.width);
    let mut img = RgbImage::from_pixel(layout.total_width()?, layout.total_height()?, BACKGROUND);

    let edge_labels = if style.graticule {
        draw_graticule(&mut img, view, &layout)
    } else {
        Vec::new()
    };

    let radius = view.marker_radius as i32;
    let mut drawn = 0usize;
    for ((&px, &py), &v) in x.iter().zip(y.iter()).zip(values.iter()) {
        let (Some(t), Some((cx, cy))) = (bounds.normalize(v), layout.to_pixel(view, px, py)) else {
            continue;
        };
        draw_filled_circle_mut(&mut img, (cx as i32, cy as i32), radius, Rgb(viridis(t)));
        drawn += 1;
    }

    clear_outside_map(&mut img, &layout);
    let (x0, y0) = layout.map_origin();
    draw_frame(&mut img, x0, y0, layout.map_width, layout.map_height);
    draw_color_bar(&mut img, &layout);

    match FontRef::try_from_slice(FONT_DATA) {
        Ok(font) => {
            draw_title(&mut img, &layout, &font, style.title);
            draw_tick_labels(&mut img, &layout, &font, bounds);
            draw_edge_labels(&mut img, &layout, &font, &edge_labels);
        }
        Err(e) => warn!("Failed to load font for map labels: {}", e),
    }

    debug!(
        "Rendered {} of {} points on {}x{} canvas",
        drawn,
        values.len(),
        img.width(),
        img.height()
    );
    Ok(img)
}

/// Meridians every 20° and parallels every 10°, sampled every quarter degree.
/// Returns a label for each line that reaches the bottom or left frame.
fn draw_graticule(img: &mut RgbImage, view: &MapView, layout: &CanvasLayout) -> Vec<EdgeLabel> {
    const STEP: f64 = 0.25;
    let samples = (360.0 / STEP) as i32;
    // a quarter degree can span several pixels on wide maps
    let reach = (layout.map_width / 50).max(4);
    let mut labels = Vec::new();

    for lon in (-180..180).step_by(20) {
        let mut lowest: Option<(u32, u32)> = None;
        for k in 0..=samples / 2 {
            let lat = -90.0 + k as f64 * STEP;
            if let Some((px, py)) = plot_geo(img, view, layout, lon as f64, lat) {
                if lowest.is_none_or(|(_, y)| py > y) {
                    lowest = Some((px, py));
                }
            }
        }
        if let Some((px, py)) = lowest {
            if py + reach >= layout.map_bottom() {
                labels.push(EdgeLabel::Bottom {
                    text: lon_label(lon as f64),
                    x: px,
                });
            }
        }
    }
    for lat in (-80..90).step_by(10) {
        let mut leftmost: Option<(u32, u32)> = None;
        for k in 0..samples {
            let lon = -180.0 + k as f64 * STEP;
            if let Some((px, py)) = plot_geo(img, view, layout, lon, lat as f64) {
                if leftmost.is_none_or(|(x, _)| px < x) {
                    leftmost = Some((px, py));
                }
            }
        }
        if let Some((px, py)) = leftmost {
            if px <= LEFT_BAND + reach {
                labels.push(EdgeLabel::Left {
                    text: lat_label(lat as f64),
                    y: py,
                });
            }
        }
    }
    labels
}

fn plot_geo(
    img: &mut RgbImage,
    view: &MapView,
    layout: &CanvasLayout,
    lon: f64,
    lat: f64,
) -> Option<(u32, u32)> {
    let (x, y) = view.project(lon, lat)?;
    let (px, py) = layout.to_pixel(view, x, y)?;
    img.put_pixel(px, py, GRATICULE);
    Some((px, py))
}

fn lon_label(lon: f64) -> String {
    let lon = wrap_longitude(lon);
    if lon == 0.0 || lon == -180.0 {
        format!("{:.0}°", lon.abs())
    } else if lon > 0.0 {
        format!("{lon:.0}°E")
    } else {
        format!("{:.0}°W", -lon)
    }
}

fn lat_label(lat: f64) -> String {
    if lat == 0.0 {
        "0°".to_string()
    } else if lat > 0.0 {
        format!("{lat:.0}°N")
    } else {
        format!("{:.0}°S", -lat)
    }
}

/// Color-bar value label: at most two decimals, trailing zeros dropped.
fn tick_label(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" { "0".to_string() } else { text.to_string() }
}

/// Discs near the frame may spill over it; the bands around the map stay blank.
fn clear_outside_map(img: &mut RgbImage, layout: &CanvasLayout) {
    let (w, h) = img.dimensions();
    let (x0, y0) = layout.map_origin();
    let (x1, y1) = (layout.map_right(), layout.map_bottom());
    for rect in [
        Rect::at(0, 0).of_size(w, y0),
        Rect::at(0, y1 as i32).of_size(w, h - y1),
        Rect::at(0, y0 as i32).of_size(x0, layout.map_height),
        Rect::at(x1 as i32, y0 as i32).of_size(w - x1, layout.map_height),
    ] {
        draw_filled_rect_mut(img, rect, BACKGROUND);
    }
}

fn draw_frame(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32) {
    draw_hollow_rect_mut(img, Rect::at(x0 as i32, y0 as i32).of_size(w, h), FRAME);
}

fn bar_left(layout: &CanvasLayout) -> u32 {
    layout.map_right() + BAR_GAP
}

/// Row of quarter tick `q` (0 = top = max) on the color bar.
fn tick_row(layout: &CanvasLayout, q: u32) -> u32 {
    TITLE_BAND + ((layout.map_height - 1) as f64 * q as f64 / 4.0).round() as u32
}

/// Vertical bar, high values on top, with ticks at quarter steps.
fn draw_color_bar(img: &mut RgbImage, layout: &CanvasLayout) {
    let x0 = bar_left(layout);
    let h = layout.map_height;
    for row in 0..h {
        let t = if h > 1 {
            1.0 - row as f64 / (h - 1) as f64
        } else {
            1.0
        };
        let color = Rgb(viridis(t));
        for col in 0..BAR_WIDTH {
            img.put_pixel(x0 + col, TITLE_BAND + row, color);
        }
    }
    draw_frame(img, x0, TITLE_BAND, BAR_WIDTH, h);

    for q in 0..=4u32 {
        let row = tick_row(layout, q);
        for col in 0..TICK_LEN {
            img.put_pixel(x0 + BAR_WIDTH + col, row, FRAME);
        }
    }
}

fn draw_title(img: &mut RgbImage, layout: &CanvasLayout, font: &FontRef<'_>, title: &str) {
    if title.is_empty() {
        return;
    }
    let scale = PxScale::from(TITLE_SIZE);
    let (tw, th) = text_size(scale, font, title);
    let x = LEFT_BAND + layout.map_width.saturating_sub(tw) / 2;
    let y = TITLE_BAND.saturating_sub(th) / 2;
    draw_text_mut(img, TEXT, x as i32, y as i32, scale, font, title);
}

fn draw_tick_labels(img: &mut RgbImage, layout: &CanvasLayout, font: &FontRef<'_>, bounds: ColorBounds) {
    let scale = PxScale::from(LABEL_SIZE);
    let x = (bar_left(layout) + BAR_WIDTH + TICK_LEN + TICK_LABEL_GAP) as i32;
    for q in 0..=4u32 {
        let value = bounds.max - (bounds.max - bounds.min) * q as f64 / 4.0;
        let text = tick_label(value);
        let (_, th) = text_size(scale, font, &text);
        let y = tick_row(layout, q) as i32 - th as i32 / 2;
        draw_text_mut(img, TEXT, x, y, scale, font, &text);
    }
}

fn draw_edge_labels(img: &mut RgbImage, layout: &CanvasLayout, font: &FontRef<'_>, labels: &[EdgeLabel]) {
    let scale = PxScale::from(LABEL_SIZE);
    for label in labels {
        match label {
            EdgeLabel::Bottom { text, x } => {
                let (tw, _) = text_size(scale, font, text);
                let left = *x as i32 - tw as i32 / 2;
                draw_text_mut(img, TEXT, left, (layout.map_bottom() + 6) as i32, scale, font, text);
            }
            EdgeLabel::Left { text, y } => {
                let (tw, th) = text_size(scale, font, text);
                let left = LEFT_BAND as i32 - 4 - tw as i32;
                draw_text_mut(img, TEXT, left, *y as i32 - th as i32 / 2, scale, font, text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectionChoice;
    use ndarray::array;

    fn style(width: u32, graticule: bool, title: &str) -> ScatterStyle<'_> {
        ScatterStyle {
            width,
            graticule,
            title,
        }
    }

    fn blank(view: &MapView, s: ScatterStyle<'_>) -> RgbImage {
        render_scatter(
            view,
            &array![],
            &array![],
            &array![],
            ColorBounds { min: 0.0, max: 1.0 },
            s,
        )
        .unwrap()
    }

    fn band_is_blank(img: &RgbImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> bool {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .all(|(x, y)| *img.get_pixel(x, y) == BACKGROUND)
    }

    #[test]
    fn layout_follows_view_aspect() {
        let view = MapView::for_choice(ProjectionChoice::Arctic);
        let layout = CanvasLayout::for_view(&view, 200);
        assert_eq!(layout.map_height, 200);
        assert_eq!(layout.total_height().unwrap(), TITLE_BAND + 200 + BOTTOM_BAND);
    }

    #[test]
    fn oversized_layout_is_an_error() {
        let layout = CanvasLayout {
            map_width: u32::MAX - 8,
            map_height: u32::MAX - 8,
        };
        assert!(matches!(
            layout.total_width(),
            Err(Error::InvalidArgument { arg: "width", .. })
        ));
        assert!(matches!(
            layout.total_height(),
            Err(Error::InvalidArgument { arg: "height", .. })
        ));
    }

    #[test]
    fn width_beyond_limit_is_rejected() {
        let view = MapView::for_choice(ProjectionChoice::Nordic);
        let err = render_scatter(
            &view,
            &array![],
            &array![],
            &array![],
            ColorBounds { min: 0.0, max: 1.0 },
            style(MAX_MAP_WIDTH + 1, false, ""),
        );
        assert!(matches!(err, Err(Error::InvalidArgument { arg: "width", .. })));
    }

    #[test]
    fn corners_map_to_map_area_corners() {
        let view = MapView::for_choice(ProjectionChoice::Arctic);
        let layout = CanvasLayout::for_view(&view, 101);
        let e = view.extent;
        let (x0, y0) = layout.map_origin();
        assert_eq!(layout.to_pixel(&view, e.x_min, e.y_max), Some((x0, y0)));
        assert_eq!(
            layout.to_pixel(&view, e.x_max, e.y_min),
            Some((x0 + 100, y0 + 100))
        );
        assert_eq!(layout.to_pixel(&view, e.x_max * 2.0, 0.0), None);
    }

    #[test]
    fn point_is_painted_with_its_color() {
        let view = MapView::for_choice(ProjectionChoice::Arctic);
        let (x, y) = view.project(0.0, 90.0).unwrap();
        let img = render_scatter(
            &view,
            &array![x],
            &array![y],
            &array![10.0],
            ColorBounds { min: 0.0, max: 10.0 },
            style(101, false, ""),
        )
        .unwrap();
        let layout = CanvasLayout::for_view(&view, 101);
        let (px, py) = layout.to_pixel(&view, x, y).unwrap();
        assert_eq!(img.get_pixel(px, py), &Rgb(viridis(1.0)));
        // disc of radius 3 around the pole
        assert_eq!(img.get_pixel(px + 3, py), &Rgb(viridis(1.0)));
        assert_eq!(img.get_pixel(px + 10, py), &BACKGROUND);
    }

    #[test]
    fn discs_do_not_spill_past_the_frame() {
        let view = MapView::for_choice(ProjectionChoice::Arctic);
        let e = view.extent;
        let img = render_scatter(
            &view,
            &array![e.x_min],
            &array![0.0],
            &array![5.0],
            ColorBounds { min: 0.0, max: 10.0 },
            style(101, false, ""),
        )
        .unwrap();
        let layout = CanvasLayout::for_view(&view, 101);
        let (x0, y0) = layout.map_origin();
        let row = y0 + 50;
        assert_eq!(img.get_pixel(x0, row), &FRAME);
        assert!(band_is_blank(&img, 0..x0, row - 3..row + 4));
    }

    #[test]
    fn nan_values_are_skipped() {
        let view = MapView::for_choice(ProjectionChoice::Arctic);
        let (x, y) = view.project(0.0, 90.0).unwrap();
        let img = render_scatter(
            &view,
            &array![x],
            &array![y],
            &array![f64::NAN],
            ColorBounds { min: 0.0, max: 10.0 },
            style(101, false, ""),
        )
        .unwrap();
        let layout = CanvasLayout::for_view(&view, 101);
        let (px, py) = layout.to_pixel(&view, x, y).unwrap();
        assert_eq!(img.get_pixel(px, py), &BACKGROUND);
    }

    #[test]
    fn misaligned_inputs_are_rejected() {
        let view = MapView::for_choice(ProjectionChoice::Nordic);
        let err = render_scatter(
            &view,
            &array![0.0, 1.0],
            &array![0.0],
            &array![1.0],
            ColorBounds { min: 0.0, max: 10.0 },
            style(64, true, ""),
        );
        assert!(matches!(err, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn color_bar_runs_from_high_to_low() {
        let view = MapView::for_choice(ProjectionChoice::Nordic);
        let img = blank(&view, style(64, true, ""));
        let layout = CanvasLayout::for_view(&view, 64);
        let bar_x = bar_left(&layout) + BAR_WIDTH / 2;
        let h = layout.map_height;
        let expected = |row: u32| Rgb(viridis(1.0 - row as f64 / (h - 1) as f64));
        assert_eq!(img.get_pixel(bar_x, TITLE_BAND + 1), &expected(1));
        assert_eq!(img.get_pixel(bar_x, TITLE_BAND + h - 2), &expected(h - 2));
        assert_ne!(expected(1), expected(h - 2));
    }

    #[test]
    fn title_is_drawn_above_the_map() {
        let view = MapView::for_choice(ProjectionChoice::Nordic);
        let layout = CanvasLayout::for_view(&view, 200);
        let xs = LEFT_BAND..layout.map_right();

        let untitled = blank(&view, style(200, false, ""));
        assert!(band_is_blank(&untitled, xs.clone(), 0..TITLE_BAND - 4));

        let titled = blank(&view, style(200, false, "CHL_20190601"));
        assert!(!band_is_blank(&titled, xs, 0..TITLE_BAND - 4));
    }

    #[test]
    fn color_bar_values_are_labelled() {
        let view = MapView::for_choice(ProjectionChoice::Nordic);
        let img = blank(&view, style(200, false, ""));
        let layout = CanvasLayout::for_view(&view, 200);
        let x0 = bar_left(&layout) + BAR_WIDTH + TICK_LEN + TICK_LABEL_GAP;
        let width = img.width();
        assert!(!band_is_blank(&img, x0..width, TITLE_BAND..layout.map_bottom()));
    }

    #[test]
    fn graticule_labels_sit_below_the_map() {
        let view = MapView::for_choice(ProjectionChoice::Nordic);
        let layout = CanvasLayout::for_view(&view, 200);
        let xs = LEFT_BAND..layout.map_right();
        let below = layout.map_bottom() + 2..layout.map_bottom() + BOTTOM_BAND;

        assert!(band_is_blank(&blank(&view, style(200, false, "")), xs.clone(), below.clone()));
        assert!(!band_is_blank(&blank(&view, style(200, true, "")), xs, below));
    }

    #[test]
    fn label_text() {
        assert_eq!(lon_label(20.0), "20°E");
        assert_eq!(lon_label(-40.0), "40°W");
        assert_eq!(lon_label(200.0), "160°W");
        assert_eq!(lon_label(0.0), "0°");
        assert_eq!(lon_label(-180.0), "180°");
        assert_eq!(lat_label(70.0), "70°N");
        assert_eq!(lat_label(-10.0), "10°S");
        assert_eq!(tick_label(2.5), "2.5");
        assert_eq!(tick_label(10.0), "10");
        assert_eq!(tick_label(0.0), "0");
        assert_eq!(tick_label(0.126), "0.13");
    }
}
