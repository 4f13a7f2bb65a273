use rand::Rng;

use super::core::{BBox, Point3, Tolerance, Transform, Vec3};
use super::primitives::{Line3, Plane, PointClassification, classify_point_in_polygon};
use super::sampling::{sample_symmetric, sample_uniform, sample_unit};

/// How a scattered copy is oriented at its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    /// Align the copy's vertical with the world Z axis regardless of the
    /// surface it lands on.
    Up,
    /// Align the copy's vertical with the primitive's normal.
    Normal,
}

/// Draw a point uniformly inside an axis-aligned bounding box, one
/// independent draw per axis.
#[must_use]
pub fn sample_point_in_bbox<R: Rng + ?Sized>(rng: &mut R, bounds: BBox) -> Point3 {
    Point3::new(
        bounds.min.x + sample_unit(rng) * bounds.width(),
        bounds.min.y + sample_unit(rng) * bounds.height(),
        bounds.min.z + sample_unit(rng) * bounds.depth(),
    )
}

/// One rejection-sampling attempt at a point on a face.
///
/// Draws inside the face's bounding box, projects onto the face plane and
/// keeps the point only if it classifies strictly interior to the polygon.
/// `None` is an expected outcome, not an error; the caller decides whether to
/// spend another attempt. Sampling the box and rejecting keeps the accepted
/// distribution uniform over the actual polygon, which a direct box
/// parameterization would not.
#[must_use]
pub fn sample_point_on_face<R: Rng + ?Sized>(
    rng: &mut R,
    loop_points: &[Point3],
    plane: Plane,
    bounds: BBox,
) -> Option<Point3> {
    let candidate = sample_point_in_bbox(rng, bounds);
    let projected = plane.project(candidate);
    match classify_point_in_polygon(projected, loop_points, plane.normal, Tolerance::default_geom())
    {
        PointClassification::Inside => Some(projected),
        PointClassification::OnBoundary | PointClassification::Outside => None,
    }
}

/// One rejection-sampling attempt at a point on an edge.
///
/// Draws inside the edge's bounding box, projects onto the supporting
/// infinite line and keeps the point only if the projection lands on the
/// finite segment.
#[must_use]
pub fn sample_point_on_edge<R: Rng + ?Sized>(
    rng: &mut R,
    line: Line3,
    bounds: BBox,
) -> Option<Point3> {
    let candidate = sample_point_in_bbox(rng, bounds);
    let projected = line.project(candidate)?;
    if line.contains_projected(projected, Tolerance::default_geom()) {
        Some(projected)
    } else {
        None
    }
}

/// Scale factor for a variation parameter `v`: `1 - v/2 + u * v`.
///
/// `v = 0` gives the identity scale; larger `v` widens the spread around 1.0.
/// The formula is intentionally not symmetric about 1.0 for large `v`; it is
/// the historical behavior and kept as-is.
#[must_use]
pub fn random_scale_factor<R: Rng + ?Sized>(rng: &mut R, variation: f64) -> f64 {
    1.0 - variation / 2.0 + sample_unit(rng) * variation
}

/// Rotation angle in radians drawn from `[-max_degrees, +max_degrees]`.
#[must_use]
pub fn random_rotation<R: Rng + ?Sized>(rng: &mut R, max_degrees: f64) -> f64 {
    sample_symmetric(rng, max_degrees).to_radians()
}

/// Offset distance drawn from `[min, max]`.
#[must_use]
pub fn random_offset<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    sample_uniform(rng, min, max)
}

/// Compose scale, rotation and translation into one transform.
///
/// The order is fixed: scale about `pivot`, then rotate about `pivot` and
/// `axis`, then translate. Reversing the order changes the visual result.
/// Returns `None` only for a degenerate rotation axis.
#[must_use]
pub fn compose(
    pivot: Point3,
    scale_factor: f64,
    rotation_axis: Vec3,
    rotation_angle: f64,
    translation: Vec3,
) -> Option<Transform> {
    let scale = Transform::scale_about(pivot, scale_factor);
    let rotate = Transform::rotate_about(pivot, rotation_axis, rotation_angle)?;
    Some(Transform::translate(translation).compose(rotate).compose(scale))
}

/// Build the instance transform for one scattered copy.
///
/// The copy's definition is first located at `pivot` with its vertical along
/// `axis`, then rotated about that axis by `angle`, then scaled about the
/// pivot. Falls back to the world vertical when `axis` has no direction
/// (e.g. two opposing face normals cancelling out).
#[must_use]
pub fn scatter_transform(
    pivot: Point3,
    scale_factor: f64,
    axis: Vec3,
    angle: f64,
) -> Option<Transform> {
    let axis = if axis.is_zero(Tolerance::ZERO_LENGTH) {
        Vec3::Z
    } else {
        axis
    };
    let locate = Transform::align_to(pivot, axis)?;
    let rotate = Transform::rotate_about(pivot, axis, angle)?;
    let scale = Transform::scale_about(pivot, scale_factor);
    Some(scale.compose(rotate).compose(locate))
}
