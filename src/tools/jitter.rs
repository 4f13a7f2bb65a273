//! Random vertex positions: translate each unique vertex referenced by the
//! selected edges by an independent symmetric offset per axis.

use crate::geom::{Vec3, sample_symmetric};
use crate::scene::{EdgeId, Scene};

use super::{ToolContext, ToolError, collect_unique_vertices};

pub const TOOL_NAME: &str = "Random Vertex Positions";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JitterParams {
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

impl Default for JitterParams {
    fn default() -> Self {
        Self {
            max_x: 12.0,
            max_y: 12.0,
            max_z: 12.0,
        }
    }
}

/// Jitter the vertices of the selected edges. Deduplication happens before
/// any draw, so a vertex shared by two edges moves once. Returns the number
/// of vertices moved.
pub fn run(
    scene: &mut Scene,
    edges: &[EdgeId],
    params: &JitterParams,
    ctx: &mut ToolContext<'_>,
) -> Result<usize, ToolError> {
    let vertices = collect_unique_vertices(scene, edges);
    for (i, vertex) in vertices.iter().enumerate() {
        let offset = Vec3::new(
            sample_symmetric(ctx.rng, params.max_x),
            sample_symmetric(ctx.rng, params.max_y),
            sample_symmetric(ctx.rng, params.max_z),
        );
        scene.translate_vertex(*vertex, offset)?;
        ctx.progress(TOOL_NAME, "vertex", i);
    }
    Ok(vertices.len())
}
