//! Spherical map projections for the supported map presets.
//!
//! Only two projections are needed:
//! - Cassini (transverse equirectangular), for regional views around a
//!   central meridian and latitude of origin
//! - North-polar azimuthal equidistant, for the Arctic view bounded by a
//!   parallel
//!
//! Both are the spherical forms; coordinates come out in meters on a sphere
//! of radius [`EARTH_RADIUS`].

use ndarray::{Array1, Zip};
use std::f64::consts::FRAC_PI_2;

use crate::types::ProjectionChoice;

/// Sphere radius in meters (Clarke 1866 authalic, as used by classic
/// matplotlib basemap)
pub const EARTH_RADIUS: f64 = 6_370_997.0;

/// Wrap a longitude difference into `[-180, 180)` degrees.
pub fn wrap_longitude(delta_deg: f64) -> f64 {
    (delta_deg + 180.0).rem_euclid(360.0) - 180.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapProjection {
    /// Spherical Cassini; `lon0`/`lat0` in degrees
    Cassini { lon0: f64, lat0: f64 },
    /// North-polar azimuthal equidistant; `lon0` (degrees) points down the page
    NorthPolarAzimuthalEquidistant { lon0: f64 },
}

impl MapProjection {
    /// Forward projection of a geographic point (degrees) to plane meters.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        match *self {
            MapProjection::Cassini { lon0, lat0 } => {
                let lambda = wrap_longitude(lon - lon0).to_radians();
                let x = (phi.cos() * lambda.sin()).clamp(-1.0, 1.0).asin();
                let y = phi.tan().atan2(lambda.cos()) - lat0.to_radians();
                (EARTH_RADIUS * x, EARTH_RADIUS * y)
            }
            MapProjection::NorthPolarAzimuthalEquidistant { lon0 } => {
                let lambda = wrap_longitude(lon - lon0).to_radians();
                let rho = EARTH_RADIUS * (FRAC_PI_2 - phi);
                (rho * lambda.sin(), -rho * lambda.cos())
            }
        }
    }
}

/// Axis-aligned rectangle in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapExtent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl MapExtent {
    /// Smallest extent containing both points.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x_min: a.0.min(b.0),
            x_max: a.0.max(b.0),
            y_min: a.1.min(b.1),
            y_max: a.1.max(b.1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

/// A projection plus the window of the plane that gets drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub projection: MapProjection,
    pub extent: MapExtent,
    /// Points south of this latitude are not drawn
    pub bounding_lat: Option<f64>,
    /// Scatter marker radius in pixels
    pub marker_radius: u32,
}

impl MapView {
    /// Cassini view framed by its lower-left and upper-right geographic corners.
    pub fn cassini(
        lon0: f64,
        lat0: f64,
        lower_left: (f64, f64),
        upper_right: (f64, f64),
        marker_radius: u32,
    ) -> Self {
        let projection = MapProjection::Cassini { lon0, lat0 };
        let extent = MapExtent::from_corners(
            projection.forward(lower_left.0, lower_left.1),
            projection.forward(upper_right.0, upper_right.1),
        );
        Self {
            projection,
            extent,
            bounding_lat: None,
            marker_radius,
        }
    }

    /// Polar view: the square around the circle of latitude `bounding_lat`.
    pub fn north_polar(lon0: f64, bounding_lat: f64, marker_radius: u32) -> Self {
        let projection = MapProjection::NorthPolarAzimuthalEquidistant { lon0 };
        let rho = EARTH_RADIUS * (FRAC_PI_2 - bounding_lat.to_radians());
        Self {
            projection,
            extent: MapExtent {
                x_min: -rho,
                x_max: rho,
                y_min: -rho,
                y_max: rho,
            },
            bounding_lat: Some(bounding_lat),
            marker_radius,
        }
    }

    pub fn for_choice(choice: ProjectionChoice) -> Self {
        match choice {
            ProjectionChoice::Arctic => Self::north_polar(0.0, 55.0, 3),
            ProjectionChoice::Nordic => Self::cassini(0.0, 70.0, (-20.0, 55.0), (60.0, 75.0), 2),
            ProjectionChoice::Pacific => {
                Self::cassini(180.0, 70.0, (160.0, 55.0), (240.0, 75.0), 2)
            }
        }
    }

    /// Projected position of a point, or `None` when it falls outside the view.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        if let Some(bound) = self.bounding_lat {
            if lat < bound {
                return None;
            }
        }
        let (x, y) = self.projection.forward(lon, lat);
        self.extent.contains(x, y).then_some((x, y))
    }

    /// Project parallel lon/lat columns. Points outside the view become NaN so
    /// that the outputs stay index-aligned with the inputs.
    pub fn project_points(&self, lon: &Array1<f64>, lat: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        let mut xs = Array1::from_elem(lon.len(), f64::NAN);
        let mut ys = Array1::from_elem(lon.len(), f64::NAN);
        Zip::from(&mut xs)
            .and(&mut ys)
            .and(lon)
            .and(lat)
            .par_for_each(|x, y, &lo, &la| {
                if let Some((px, py)) = self.project(lo, la) {
                    *x = px;
                    *y = py;
                }
            });
        (xs, ys)
    }
}
