//! Scatter copies of a reference definition over faces, edges or vertices.
//!
//! All three tools share the same placement pipeline: sample an anchor point
//! against the primitive's true geometry, build the copy's transform (locate,
//! rotate about the placement axis, scale about the anchor), then let the
//! probability gate decide whether the copy materializes. Copies land in a
//! dedicated aggregate on a user-chosen layer so they can be toggled as one.

use crate::geom::{
    Orientation, Vec3, accept, random_rotation, random_scale_factor, sample_point_on_edge,
    sample_point_on_face, scatter_transform, CopyCount, Point3,
};
use crate::scene::{
    AggregateId, DefinitionId, EdgeId, FaceId, InstanceId, LayerId, Scene,
};

use super::{ToolContext, ToolError, collect_unique_vertices};

pub const FACES_TOOL_NAME: &str = "Place Copies Randomly on Faces";
pub const EDGES_TOOL_NAME: &str = "Place Copies Randomly on Edges";
pub const VERTICES_TOOL_NAME: &str = "Place Copies Randomly on Vertices";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScatterParams {
    /// Copies per primitive; values below 1 mean a single attempt at that
    /// value times hundred percent.
    pub copies: f64,
    pub max_rotation_deg: f64,
    pub scale_variation: f64,
    pub orientation: Orientation,
    pub layer: LayerId,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            copies: 10.0,
            max_rotation_deg: 360.0,
            scale_variation: 0.5,
            orientation: Orientation::Normal,
            layer: LayerId(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VertexScatterParams {
    pub probability_percent: f64,
    pub max_rotation_deg: f64,
    pub scale_variation: f64,
    pub orientation: Orientation,
    pub layer: LayerId,
}

impl Default for VertexScatterParams {
    fn default() -> Self {
        Self {
            probability_percent: 50.0,
            max_rotation_deg: 360.0,
            scale_variation: 0.5,
            orientation: Orientation::Normal,
            layer: LayerId(0),
        }
    }
}

/// What a scatter run produced: the container aggregate and the instances
/// that made it through the gate.
#[derive(Debug)]
pub struct ScatterOutcome {
    pub container: AggregateId,
    pub placed: Vec<InstanceId>,
}

pub fn run_on_faces(
    scene: &mut Scene,
    faces: &[FaceId],
    reference: DefinitionId,
    params: &ScatterParams,
    ctx: &mut ToolContext<'_>,
) -> Result<ScatterOutcome, ToolError> {
    let count = CopyCount::resolve(params.copies);
    let container = scene.create_aggregate(params.layer);
    let mut placed = Vec::new();

    for (i, face) in faces.iter().enumerate() {
        let loop_points = scene.face_loop(*face)?;
        let plane = scene.face_plane(*face)?;
        let bounds = scene.face_bounds(*face)?;

        for _ in 0..count.repeat {
            // A rejected draw simply doesn't materialize; no retry.
            let Some(point) = sample_point_on_face(ctx.rng, &loop_points, plane, bounds) else {
                continue;
            };
            if let Some(id) = place_copy(
                scene,
                container,
                reference,
                params,
                point,
                plane.normal,
                count.percent,
                ctx,
            )? {
                placed.push(id);
            }
        }
        ctx.progress(FACES_TOOL_NAME, "face", i);
    }

    Ok(ScatterOutcome { container, placed })
}

pub fn run_on_edges(
    scene: &mut Scene,
    edges: &[EdgeId],
    reference: DefinitionId,
    params: &ScatterParams,
    ctx: &mut ToolContext<'_>,
) -> Result<ScatterOutcome, ToolError> {
    let count = CopyCount::resolve(params.copies);
    let container = scene.create_aggregate(params.layer);
    let mut placed = Vec::new();

    for (i, edge) in edges.iter().enumerate() {
        let line = scene.edge_line(*edge)?;
        let bounds = scene.edge_bounds(*edge)?;
        let normal = scene.edge_normal(*edge)?;

        for _ in 0..count.repeat {
            let Some(point) = sample_point_on_edge(ctx.rng, line, bounds) else {
                continue;
            };
            if let Some(id) = place_copy(
                scene,
                container,
                reference,
                params,
                point,
                normal,
                count.percent,
                ctx,
            )? {
                placed.push(id);
            }
        }
        ctx.progress(EDGES_TOOL_NAME, "edge", i);
    }

    Ok(ScatterOutcome { container, placed })
}

/// Scatter over the unique vertices of the selected edges. One gate decision
/// per vertex, no repeat count.
pub fn run_on_vertices(
    scene: &mut Scene,
    edges: &[EdgeId],
    reference: DefinitionId,
    params: &VertexScatterParams,
    ctx: &mut ToolContext<'_>,
) -> Result<ScatterOutcome, ToolError> {
    let container = scene.create_aggregate(params.layer);
    let mut placed = Vec::new();

    let vertices = collect_unique_vertices(scene, edges);
    for (i, vertex) in vertices.iter().enumerate() {
        let Some(pivot) = scene.vertex_position(*vertex) else {
            continue;
        };
        let normal = scene.vertex_normal(*vertex)?;

        let shared = ScatterParams {
            copies: 1.0,
            max_rotation_deg: params.max_rotation_deg,
            scale_variation: params.scale_variation,
            orientation: params.orientation,
            layer: params.layer,
        };
        if let Some(id) = place_copy(
            scene,
            container,
            reference,
            &shared,
            pivot,
            normal,
            params.probability_percent,
            ctx,
        )? {
            placed.push(id);
        }
        ctx.progress(VERTICES_TOOL_NAME, "vertex", i);
    }

    Ok(ScatterOutcome { container, placed })
}

/// One placement candidate: draw scale and rotation, build the transform from
/// the candidate's own pivot and normal, then gate. The draws happen whether
/// or not the gate accepts, so the candidate stream is independent of the
/// gate outcome.
#[allow(clippy::too_many_arguments)]
fn place_copy(
    scene: &mut Scene,
    container: AggregateId,
    reference: DefinitionId,
    params: &ScatterParams,
    pivot: Point3,
    normal: Vec3,
    percent: f64,
    ctx: &mut ToolContext<'_>,
) -> Result<Option<InstanceId>, ToolError> {
    let scale = random_scale_factor(ctx.rng, params.scale_variation);
    let axis = match params.orientation {
        Orientation::Up => Vec3::Z,
        Orientation::Normal => normal,
    };
    let angle = random_rotation(ctx.rng, params.max_rotation_deg);

    let Some(transform) = scatter_transform(pivot, scale, axis, angle) else {
        return Ok(None);
    };

    if accept(ctx.rng, percent) {
        let id = scene.add_instance_to_aggregate(container, reference, transform, params.layer)?;
        Ok(Some(id))
    } else {
        Ok(None)
    }
}
