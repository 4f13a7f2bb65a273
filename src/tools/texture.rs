//! Randomize texture positions: re-anchor the 2-point texture alignment of
//! each target face with a point sampled from the face's bounding box, for
//! both the front and the back material.

use crate::geom::{Point3, sample_unit};
use crate::scene::{AggregateId, FaceId, Scene, TextureAlignment};

use super::{ToolContext, ToolError};

pub const TOOL_NAME: &str = "Randomize Texture Positions";

/// Faces one level inside a selected aggregate take part too; the aggregate
/// is made independently owned first so siblings sharing its definition keep
/// their texture placement.
pub fn run(
    scene: &mut Scene,
    faces: &[FaceId],
    aggregates: &[AggregateId],
    ctx: &mut ToolContext<'_>,
) -> Result<usize, ToolError> {
    let mut targets = faces.to_vec();
    for aggregate in aggregates {
        scene.make_aggregate_unique(*aggregate)?;
        let definition = scene
            .aggregate(*aggregate)
            .ok_or(crate::scene::SceneError::UnknownAggregate(*aggregate))?
            .definition;
        if let Some(def) = scene.aggregate_def(definition) {
            targets.extend(def.faces.iter().copied());
        }
    }

    for (i, face) in targets.iter().enumerate() {
        let loop_points = scene.face_loop(*face)?;
        let Some(first) = loop_points.first().copied() else {
            continue;
        };
        let bounds = scene.face_bounds(*face)?;

        // First anchor pins the texture to the face's first vertex; second
        // anchor scales it by a random fraction of the face extent.
        let alignment = TextureAlignment {
            anchors: [
                first,
                Point3::new(
                    sample_unit(ctx.rng) * bounds.width(),
                    sample_unit(ctx.rng) * bounds.height(),
                    0.0,
                ),
            ],
        };

        scene.position_material(*face, true, alignment)?;
        scene.position_material(*face, false, alignment)?;
        ctx.progress(TOOL_NAME, "face", i);
    }

    Ok(targets.len())
}
