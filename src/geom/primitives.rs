use super::core::{Point3, Tolerance, Vec3};

// ─────────────────────────────────────────────────────────────────────────────
// Plane
// ─────────────────────────────────────────────────────────────────────────────

/// An infinite plane through `origin` with unit normal `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vec3,
}

impl Plane {
    #[must_use]
    pub const fn new(origin: Point3, normal: Vec3) -> Self {
        Self { origin, normal }
    }

    /// Best-fit plane through a polygon loop via the Newell method.
    /// Returns `None` when the loop is degenerate (fewer than three points or
    /// zero area).
    #[must_use]
    pub fn from_polygon(points: &[Point3]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let mut normal = Vec3::ZERO;
        let mut centroid = Vec3::ZERO;
        for (i, p) in points.iter().enumerate() {
            let q = points[(i + 1) % points.len()];
            normal.x += (p.y - q.y) * (p.z + q.z);
            normal.y += (p.z - q.z) * (p.x + q.x);
            normal.z += (p.x - q.x) * (p.y + q.y);
            centroid = centroid.add(p.to_vec3());
        }
        let normal = normal.normalized()?;
        let centroid = centroid / points.len() as f64;
        Some(Self::new(Point3::new(centroid.x, centroid.y, centroid.z), normal))
    }

    /// Signed distance from a point to the plane, along the normal.
    #[must_use]
    pub fn signed_distance(self, p: Point3) -> f64 {
        p.sub_point(self.origin).dot(self.normal)
    }

    /// Orthogonal projection of a point onto the plane.
    #[must_use]
    pub fn project(self, p: Point3) -> Point3 {
        p - self.normal * self.signed_distance(p)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line3
// ─────────────────────────────────────────────────────────────────────────────

/// The infinite supporting line of a finite segment `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    #[must_use]
    pub const fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn direction(self) -> Vec3 {
        self.end.sub_point(self.start)
    }

    /// Parameter of the orthogonal projection of `p` onto the infinite line.
    /// `0` maps to `start`, `1` to `end`. `None` for a degenerate segment.
    #[must_use]
    pub fn project_parameter(self, p: Point3) -> Option<f64> {
        let dir = self.direction();
        let len_sq = dir.length_squared();
        if len_sq <= Tolerance::ZERO_LENGTH.value {
            return None;
        }
        Some(p.sub_point(self.start).dot(dir) / len_sq)
    }

    /// Orthogonal projection of `p` onto the infinite line.
    #[must_use]
    pub fn project(self, p: Point3) -> Option<Point3> {
        let t = self.project_parameter(p)?;
        Some(self.start + self.direction() * t)
    }

    /// True if `p` (assumed on the infinite line) lies on the finite segment.
    #[must_use]
    pub fn contains_projected(self, p: Point3, tol: Tolerance) -> bool {
        match self.project_parameter(p) {
            Some(t) => t >= -tol.value && t <= 1.0 + tol.value,
            None => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point-in-polygon classification
// ─────────────────────────────────────────────────────────────────────────────

/// Where a point on a face's plane sits relative to the polygon boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClassification {
    Inside,
    OnBoundary,
    Outside,
}

/// Classify a coplanar point against a planar polygon loop.
///
/// The polygon is projected onto the coordinate plane most perpendicular to
/// its normal and classified there with an even-odd crossing test; this keeps
/// the test exact for the axis-aligned cases and robust for skewed faces.
#[must_use]
pub fn classify_point_in_polygon(
    point: Point3,
    loop_points: &[Point3],
    normal: Vec3,
    tol: Tolerance,
) -> PointClassification {
    if loop_points.len() < 3 {
        return PointClassification::Outside;
    }

    // Drop the dominant normal axis to get a 2-D polygon.
    let (u, v) = dominant_axes(normal);
    let p = (pick(point, u), pick(point, v));

    let mut inside = false;
    for (i, a3) in loop_points.iter().enumerate() {
        let b3 = loop_points[(i + 1) % loop_points.len()];
        let a = (pick(*a3, u), pick(*a3, v));
        let b = (pick(b3, u), pick(b3, v));

        if on_segment_2d(p, a, b, tol) {
            return PointClassification::OnBoundary;
        }

        if (a.1 > p.1) != (b.1 > p.1) {
            let x_cross = a.0 + (p.1 - a.1) / (b.1 - a.1) * (b.0 - a.0);
            if p.0 < x_cross {
                inside = !inside;
            }
        }
    }

    if inside {
        PointClassification::Inside
    } else {
        PointClassification::Outside
    }
}

/// Indices of the two coordinate axes spanning the plane most perpendicular
/// to `normal`.
fn dominant_axes(normal: Vec3) -> (usize, usize) {
    let ax = normal.x.abs();
    let ay = normal.y.abs();
    let az = normal.z.abs();
    if az >= ax && az >= ay {
        (0, 1)
    } else if ay >= ax {
        (0, 2)
    } else {
        (1, 2)
    }
}

fn pick(p: Point3, axis: usize) -> f64 {
    match axis {
        0 => p.x,
        1 => p.y,
        _ => p.z,
    }
}

fn on_segment_2d(p: (f64, f64), a: (f64, f64), b: (f64, f64), tol: Tolerance) -> bool {
    let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    let len = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
    if len <= tol.value {
        return (p.0 - a.0).abs() <= tol.value && (p.1 - a.1).abs() <= tol.value;
    }
    if (cross / len).abs() > tol.value {
        return false;
    }
    let dot = (p.0 - a.0) * (b.0 - a.0) + (p.1 - a.1) * (b.1 - a.1);
    dot >= -tol.value * len && dot <= len * len + tol.value * len
}
