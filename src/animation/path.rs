use std::f64::consts::{PI, TAU};
use std::str::FromStr;

use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{PaperdanceError, PaperdanceResult};
use crate::foundation::rng::Rng64;

/// Shape family of a sprite's motion loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathStyle {
    /// Anchors evenly spaced by angle around the base point, radius jittered per anchor.
    Circle,
    /// Lissajous-style figure eight around the base point.
    #[serde(rename = "figure8")]
    Figure8,
    /// Horizontal double wave with a faster vertical ripple.
    Wave,
    /// Irregular loop through three random key points with perpendicular jitter.
    Organic,
    /// Base position held; only small noise offsets (no spline smoothing).
    FixedMicro,
    /// Free-roaming loop through random points anywhere inside the margins.
    Roaming,
}

impl PathStyle {
    /// Styles picked from when a sprite has a base position but no explicit style.
    pub const RANDOM_CHOICES: [PathStyle; 4] = [
        PathStyle::Circle,
        PathStyle::Figure8,
        PathStyle::Organic,
        PathStyle::Wave,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Figure8 => "figure8",
            Self::Wave => "wave",
            Self::Organic => "organic",
            Self::FixedMicro => "fixed-micro",
            Self::Roaming => "roaming",
        }
    }

    /// Spline sub-segments between consecutive anchors, or `None` when the anchors are used raw.
    pub fn subdivisions(self) -> Option<usize> {
        match self {
            Self::FixedMicro => None,
            Self::Roaming => Some(5),
            Self::Circle | Self::Figure8 | Self::Wave | Self::Organic => Some(4),
        }
    }

    fn table_index(self) -> usize {
        match self {
            Self::Circle => 0,
            Self::Figure8 => 1,
            Self::Wave => 2,
            Self::Organic => 3,
            Self::FixedMicro => 4,
            Self::Roaming => 5,
        }
    }
}

impl std::fmt::Display for PathStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathStyle {
    type Err = PaperdanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(Self::Circle),
            "figure8" => Ok(Self::Figure8),
            "wave" => Ok(Self::Wave),
            "organic" => Ok(Self::Organic),
            "fixed-micro" => Ok(Self::FixedMicro),
            "roaming" => Ok(Self::Roaming),
            other => Err(PaperdanceError::validation(format!(
                "unknown path style '{other}'"
            ))),
        }
    }
}

/// Geometry inputs shared by every anchor builder.
#[derive(Clone, Copy, Debug)]
pub struct PathParams {
    pub canvas: Canvas,
    /// Centre of the loop (ignored by [`PathStyle::Roaming`]).
    pub base: Point,
    /// Movement radius in pixels.
    pub move_range: f64,
    /// Noise amplitude in pixels for [`PathStyle::FixedMicro`].
    pub micro_movement: f64,
}

impl PathParams {
    pub fn new(canvas: Canvas, base: Point, move_range: f64) -> Self {
        Self {
            canvas,
            base,
            move_range,
            micro_movement: canvas.min_dim() * 0.02,
        }
    }
}

/// Dense, ordered point sequence sampled as a loop.
///
/// Holds at least two points. Sampling is periodic in its parameter (see
/// [`crate::PathSampler::position`]).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawControlPointPath")]
pub struct ControlPointPath {
    points: Vec<Point>,
}

#[derive(serde::Deserialize)]
struct RawControlPointPath {
    points: Vec<Point>,
}

impl TryFrom<RawControlPointPath> for ControlPointPath {
    type Error = PaperdanceError;

    fn try_from(raw: RawControlPointPath) -> Result<Self, Self::Error> {
        Self::new(raw.points)
    }
}

impl ControlPointPath {
    pub fn new(points: Vec<Point>) -> PaperdanceResult<Self> {
        if points.len() < 2 {
            return Err(PaperdanceError::degenerate_path(format!(
                "control point path needs at least 2 points, got {}",
                points.len()
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

type AnchorFn = fn(&PathParams, &mut Rng64) -> Vec<Point>;

// Indexed by `PathStyle::table_index`.
const ANCHOR_TABLE: [AnchorFn; 6] = [
    circle_anchors,
    figure8_anchors,
    wave_anchors,
    organic_anchors,
    fixed_micro_anchors,
    roaming_anchors,
];

/// Minimum anchors accepted by the smoothed styles.
pub const MIN_SPLINE_ANCHORS: usize = 3;

/// Generate the raw anchor points for `style`.
pub fn generate_anchors(style: PathStyle, params: &PathParams, rng: &mut Rng64) -> Vec<Point> {
    ANCHOR_TABLE[style.table_index()](params, rng)
}

/// Generate a complete control point path for `style`.
///
/// All randomness comes from `rng`; the same rng state and params always yield the same path.
pub fn generate_path(
    style: PathStyle,
    params: &PathParams,
    rng: &mut Rng64,
) -> PaperdanceResult<ControlPointPath> {
    let anchors = generate_anchors(style, params, rng);
    match style.subdivisions() {
        None => ControlPointPath::new(anchors),
        Some(segments) => {
            if anchors.len() < MIN_SPLINE_ANCHORS {
                return Err(PaperdanceError::degenerate_path(format!(
                    "{style} path needs at least {MIN_SPLINE_ANCHORS} anchors, got {}",
                    anchors.len()
                )));
            }
            smooth_closed(&anchors, segments, params.canvas)
        }
    }
}

/// Convert anchors into a closed Catmull-Rom point sequence.
///
/// Each anchor is emitted followed by `segments - 1` interpolated points towards its successor;
/// neighbours wrap around so the curve closes. Interpolated points are clamped into the canvas
/// margins.
pub fn smooth_closed(
    anchors: &[Point],
    segments: usize,
    canvas: Canvas,
) -> PaperdanceResult<ControlPointPath> {
    let n = anchors.len();
    if n < 2 {
        return Err(PaperdanceError::degenerate_path(format!(
            "spline needs at least 2 anchors, got {n}"
        )));
    }
    let segments = segments.max(1);

    let mut out = Vec::with_capacity(n * segments);
    for j in 0..n {
        let p0 = anchors[(j + n - 1) % n];
        let p1 = anchors[j];
        let p2 = anchors[(j + 1) % n];
        let p3 = anchors[(j + 2) % n];

        out.push(p1);
        for s in 1..segments {
            let t = s as f64 / segments as f64;
            let p = Point::new(
                catmull_rom(p0.x, p1.x, p2.x, p3.x, t),
                catmull_rom(p0.y, p1.y, p2.y, p3.y, t),
            );
            out.push(canvas.clamp_inside_margin(p));
        }
    }
    ControlPointPath::new(out)
}

fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

fn anchor_count(rng: &mut Rng64) -> u32 {
    rng.range_inclusive(6, 9)
}

fn circle_anchors(params: &PathParams, rng: &mut Rng64) -> Vec<Point> {
    let n = anchor_count(rng);
    (0..n)
        .map(|p| {
            let theta = f64::from(p) * TAU / f64::from(n);
            let radius = params.move_range * rng.uniform(0.7, 1.0);
            let pt = Point::new(
                params.base.x + theta.cos() * radius,
                params.base.y + theta.sin() * radius,
            );
            params.canvas.clamp_inside_margin(pt)
        })
        .collect()
}

fn figure8_anchors(params: &PathParams, rng: &mut Rng64) -> Vec<Point> {
    let n = anchor_count(rng);
    (0..n)
        .map(|p| {
            let theta = f64::from(p) * TAU / f64::from(n);
            let radius = params.move_range * rng.uniform(0.7, 1.0);
            let pt = Point::new(
                params.base.x + (2.0 * theta).sin() * radius * 0.5,
                params.base.y + theta.sin() * radius,
            );
            params.canvas.clamp_inside_margin(pt)
        })
        .collect()
}

fn wave_anchors(params: &PathParams, rng: &mut Rng64) -> Vec<Point> {
    let n = anchor_count(rng);
    (0..n)
        .map(|p| {
            let t = f64::from(p) / f64::from(n);
            // Two horizontal cycles, four vertical.
            let pt = Point::new(
                params.base.x + params.move_range * (t * 4.0 * PI).sin(),
                params.base.y + params.move_range * 0.3 * (t * 8.0 * PI).sin(),
            );
            params.canvas.clamp_inside_margin(pt)
        })
        .collect()
}

fn organic_anchors(params: &PathParams, rng: &mut Rng64) -> Vec<Point> {
    let canvas = params.canvas;
    let base = params.base;
    let range = params.move_range;

    let key_points: Vec<Point> = (0..3)
        .map(|_| {
            let angle = rng.next_f64_01() * TAU;
            let distance = range * rng.uniform(0.5, 1.0);
            canvas.clamp_inside_margin(Point::new(
                base.x + angle.cos() * distance,
                base.y + angle.sin() * distance,
            ))
        })
        .collect();

    let mut anchors = vec![base];
    for (j, &from) in key_points.iter().enumerate() {
        anchors.push(from);
        let to = key_points[(j + 1) % key_points.len()];
        let d = to - from;
        let len = d.hypot();
        let perp = if len > 0.0 {
            kurbo::Vec2::new(-d.y / len, d.x / len)
        } else {
            kurbo::Vec2::new(-d.y, d.x)
        };

        for _ in 0..rng.range_inclusive(1, 2) {
            let t = rng.next_f64_01();
            let offset = range * 0.2 * (rng.next_f64_01() - 0.5);
            let p = from + d * t + perp * offset;
            anchors.push(canvas.clamp_inside_margin(p));
        }
    }
    anchors
}

fn fixed_micro_anchors(params: &PathParams, rng: &mut Rng64) -> Vec<Point> {
    const POINTS: u32 = 8;
    (0..POINTS)
        .map(|p| {
            let t = f64::from(p) / f64::from(POINTS);
            let nx = (t * 6.28 + rng.next_f64_01() * 10.0).sin()
                * (t * 9.42 + rng.next_f64_01() * 10.0).sin();
            let ny = (t * 7.85 + rng.next_f64_01() * 10.0).sin()
                * (t * 5.67 + rng.next_f64_01() * 10.0).sin();
            Point::new(
                params.base.x + nx * params.micro_movement,
                params.base.y + ny * params.micro_movement,
            )
        })
        .collect()
}

fn roaming_anchors(params: &PathParams, rng: &mut Rng64) -> Vec<Point> {
    let canvas = params.canvas;
    let margin = canvas.margin();
    let n = rng.range_inclusive(4, 6);
    let mut key_points: Vec<Point> = (0..n)
        .map(|_| {
            Point::new(
                rng.uniform(margin, f64::from(canvas.width) - margin),
                rng.uniform(margin, f64::from(canvas.height) - margin),
            )
        })
        .collect();

    // Pull the last point towards the first so the loop closes without a long jump.
    let first = key_points[0];
    let last_idx = key_points.len() - 1;
    let last = key_points[last_idx];
    if first.distance(last) > canvas.min_dim() * 0.2 {
        key_points[last_idx] = first + (last - first) * 0.2;
    }
    key_points
}

#[cfg(test)]
#[path = "../../tests/unit/animation/path.rs"]
mod tests;
