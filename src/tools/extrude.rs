//! Random face push/pull: extrude each selected face along its normal by a
//! distance drawn uniformly from `[min, max]`.

use crate::geom::random_offset;
use crate::scene::{FaceId, Scene};

use super::{ToolContext, ToolError};

pub const TOOL_NAME: &str = "Random Face Push/Pull";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExtrudeParams {
    pub min: f64,
    pub max: f64,
    /// Keep the old boundary and join it to the moved face with side faces.
    pub create_faces: bool,
}

impl Default for ExtrudeParams {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 12.0,
            create_faces: true,
        }
    }
}

/// Extrude every face in the captured list. The distance is drawn
/// independently per face. Returns the number of faces processed.
pub fn run(
    scene: &mut Scene,
    faces: &[FaceId],
    params: &ExtrudeParams,
    ctx: &mut ToolContext<'_>,
) -> Result<usize, ToolError> {
    for (i, face) in faces.iter().enumerate() {
        let distance = random_offset(ctx.rng, params.min, params.max);
        scene.push_pull_face(*face, distance, params.create_faces)?;
        ctx.progress(TOOL_NAME, "face", i);
    }
    Ok(faces.len())
}
