mod core;
mod placement;
mod primitives;
mod sampling;

pub use core::{BBox, Point3, Tolerance, Transform, Vec3};
pub use placement::{
    Orientation, compose, random_offset, random_rotation, random_scale_factor,
    sample_point_in_bbox, sample_point_on_edge, sample_point_on_face, scatter_transform,
};
pub use primitives::{Line3, Plane, PointClassification, classify_point_in_polygon};
pub use sampling::{CopyCount, accept, sample_symmetric, sample_uniform, sample_unit};

#[cfg(test)]
mod tests;
