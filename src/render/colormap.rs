//! Color map used for the scatter plots.

/// Viridis sampled at nine evenly spaced stops.
const VIRIDIS: [(f64, [u8; 3]); 9] = [
    (0.000, [68, 1, 84]),
    (0.125, [71, 44, 122]),
    (0.250, [59, 81, 139]),
    (0.375, [44, 113, 142]),
    (0.500, [33, 144, 141]),
    (0.625, [39, 173, 129]),
    (0.750, [92, 200, 99]),
    (0.875, [170, 220, 50]),
    (1.000, [253, 231, 37]),
];

/// Linear interpolation between two colors, `t` in `[0, 1]`.
pub fn interpolate_color(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

/// Viridis color at normalized position `t` (clamped to `[0, 1]`).
pub fn viridis(t: f64) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    for pair in VIRIDIS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            return interpolate_color(c0, c1, (t - t0) / (t1 - t0));
        }
    }
    VIRIDIS[VIRIDIS.len() - 1].1
}
