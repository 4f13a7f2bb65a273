//! The per-tool drivers. Each tool gathers its target primitives from the
//! selection snapshot, draws its random parameters per candidate, and either
//! mutates geometry in place or spawns new instances. The surrounding batch
//! and parameter dialog live in the crate root.

pub mod extrude;
pub mod jitter;
pub mod objects;
pub mod scatter;
pub mod texture;

use std::collections::HashSet;

use rand::RngCore;

use crate::params::ParamError;
use crate::scene::{EdgeId, Scene, SceneError, StatusSink, VertexId};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The working selection holds nothing this tool can use. The message is
    /// the guidance text shown to the user; no batch is opened.
    #[error("{0}")]
    EmptySelection(String),
    #[error(transparent)]
    Param(#[from] ParamError),
    /// An unexpected fault while mutating scene state mid-batch. Iteration
    /// stops; the batch commits in its partial state.
    #[error("couldn't do it: {0}")]
    Mutation(#[from] SceneError),
}

/// Per-invocation context threaded through every tool: the invocation's
/// random source and the sink for progress text.
pub struct ToolContext<'a> {
    pub rng: &'a mut dyn RngCore,
    pub status: &'a mut dyn StatusSink,
}

impl ToolContext<'_> {
    pub(crate) fn progress(&mut self, tool: &str, item: &str, index: usize) {
        self.status
            .status(&format!("{tool} | Done with {item} {}", index + 1));
    }
}

/// Distinct vertices referenced by a set of edges, each exactly once.
///
/// Vertex-based tools must run over this set, never per edge; a vertex shared
/// by several selected edges would otherwise be processed twice.
#[must_use]
pub fn collect_unique_vertices(scene: &Scene, edges: &[EdgeId]) -> Vec<VertexId> {
    let mut seen = HashSet::new();
    let mut vertices = Vec::new();
    for id in edges {
        let Some(edge) = scene.edge(*id) else {
            continue;
        };
        for vertex in [edge.start, edge.end] {
            if seen.insert(vertex) {
                vertices.push(vertex);
            }
        }
    }
    vertices
}

#[cfg(test)]
mod tests;
