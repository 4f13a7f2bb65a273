mod test_scatter_basic;

use crate::geom::{BBox, Point3};
use crate::scene::{DefinitionId, FaceId, Scene, VertexId};

/// A square face in the Z=0 plane with its normal up, spanning
/// `[0, size]` on both horizontal axes.
pub(crate) fn square_face(scene: &mut Scene, size: f64) -> FaceId {
    let loop_vertices: Vec<VertexId> = [
        Point3::ORIGIN,
        Point3::new(size, 0.0, 0.0),
        Point3::new(size, size, 0.0),
        Point3::new(0.0, size, 0.0),
    ]
    .into_iter()
    .map(|p| scene.add_vertex(p))
    .collect();
    scene.add_face(&loop_vertices)
}

/// The reference object the scatter tools place copies of.
pub(crate) fn reference_definition(scene: &mut Scene) -> DefinitionId {
    scene.add_definition(
        "Tree",
        BBox::new(Point3::ORIGIN, Point3::new(1.0, 1.0, 2.0)),
    )
}
