//! Whole-object tools: randomize placement in place, swap identities among
//! instances, and probabilistic deletion.

use rand::seq::SliceRandom;

use crate::geom::{Vec3, accept, compose, random_rotation, random_scale_factor, sample_symmetric};
use crate::scene::{DefinitionId, InstanceId, ObjectRef, Scene};

use super::{ToolContext, ToolError};

pub const RANDOMIZE_TOOL_NAME: &str = "Randomize Objects (Scale, Rotation, Position)";
pub const SWAP_TOOL_NAME: &str = "Randomly Swap Objects";
pub const DELETE_TOOL_NAME: &str = "Randomly Erase Objects";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RandomizeParams {
    pub max_rotation_deg: f64,
    /// Positional jitter along the object's own horizontal axes.
    pub position_variation: f64,
    pub scale_variation: f64,
}

impl Default for RandomizeParams {
    fn default() -> Self {
        Self {
            max_rotation_deg: 360.0,
            position_variation: 0.0,
            scale_variation: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeleteParams {
    pub probability_percent: f64,
}

impl Default for DeleteParams {
    fn default() -> Self {
        Self {
            probability_percent: 50.0,
        }
    }
}

/// Rotate each object about its own vertical axis and center, scale about the
/// same center, and translate along its own local horizontal axes. The pivot
/// and axes come from the object's current transform, per candidate; a cached
/// global frame would rotate every object around the wrong center.
pub fn randomize(
    scene: &mut Scene,
    objects: &[ObjectRef],
    params: &RandomizeParams,
    ctx: &mut ToolContext<'_>,
) -> Result<usize, ToolError> {
    for (i, object) in objects.iter().enumerate() {
        let center = scene.object_center(*object)?;
        let frame = scene.object_transform(*object)?;

        let angle = random_rotation(ctx.rng, params.max_rotation_deg);
        let scale = random_scale_factor(ctx.rng, params.scale_variation);
        let offset = Vec3::linear_combination(
            sample_symmetric(ctx.rng, params.position_variation),
            frame.x_axis(),
            sample_symmetric(ctx.rng, params.position_variation),
            frame.y_axis(),
        );

        let Some(transform) = compose(center, scale, frame.z_axis(), angle, offset) else {
            // A sheared placement can collapse the local vertical; leave the
            // object alone rather than guess an axis.
            log::warn!("skipping object with degenerate vertical axis: {object:?}");
            continue;
        };
        scene.transform_object(*object, transform)?;
        ctx.progress(RANDOMIZE_TOOL_NAME, "object", i);
    }
    Ok(objects.len())
}

/// Shuffle the multiset of definitions among the selected instances. A plain
/// shuffle, so an instance may end up with its own definition again; the
/// multiset itself is preserved.
pub fn swap(
    scene: &mut Scene,
    instances: &[InstanceId],
    ctx: &mut ToolContext<'_>,
) -> Result<usize, ToolError> {
    let mut definitions: Vec<DefinitionId> = Vec::with_capacity(instances.len());
    for id in instances {
        let instance = scene
            .instance(*id)
            .ok_or(crate::scene::SceneError::UnknownInstance(*id))?;
        definitions.push(instance.definition);
    }

    definitions.shuffle(ctx.rng);

    for (i, (id, definition)) in instances.iter().zip(definitions).enumerate() {
        scene.set_instance_definition(*id, definition)?;
        ctx.progress(SWAP_TOOL_NAME, "object", i);
    }
    Ok(instances.len())
}

/// Gate every object, then erase the losers as one batch operation. Returns
/// the number of objects erased.
pub fn delete(
    scene: &mut Scene,
    objects: &[ObjectRef],
    params: &DeleteParams,
    ctx: &mut ToolContext<'_>,
) -> Result<usize, ToolError> {
    let doomed: Vec<ObjectRef> = objects
        .iter()
        .copied()
        .filter(|_| accept(ctx.rng, params.probability_percent))
        .collect();

    scene.erase_objects(&doomed);
    ctx.status
        .status(&format!("{DELETE_TOOL_NAME} | Done erasing objects"));
    Ok(doomed.len())
}
