#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Randomizes geometry in a host 3-D scene: random face push/pull, vertex
//! jitter, scattering copies of a reference object over faces/edges/vertices,
//! whole-object randomization, identity swap, probabilistic deletion and
//! texture-alignment shuffling.
//!
//! [`RandomTools`] drives one tool invocation end to end: snapshot the
//! selection, prompt for parameters (with last-used values from the
//! preference store), open an undoable batch, run the tool, commit. The host
//! supplies the scene, the dialog ([`params::ParamSource`]), the random
//! source and the status sink.

pub mod geom;
pub mod params;
pub mod prefs;
pub mod scene;
pub mod tools;

use rand::RngCore;

use params::{
    ParamSource, Prompt, answer, parse_length, parse_number, parse_orientation, parse_yes_no,
};
use prefs::PrefStore;
use scene::{InstanceId, Scene, StatusSink};
use tools::{ToolContext, ToolError, extrude, jitter, objects, scatter, texture};

// ─────────────────────────────────────────────────────────────────────────────
// Command table
// ─────────────────────────────────────────────────────────────────────────────

/// One command per tool; the host builds its menu/toolbar from this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    ExtrudeFaces,
    JitterVertices,
    ScatterOnFaces,
    ScatterOnEdges,
    ScatterOnVertices,
    RandomizeObjects,
    SwapObjects,
    RandomDelete,
    RandomizeTextures,
}

impl ToolKind {
    pub const ALL: [Self; 9] = [
        Self::ExtrudeFaces,
        Self::JitterVertices,
        Self::ScatterOnFaces,
        Self::ScatterOnEdges,
        Self::ScatterOnVertices,
        Self::RandomizeObjects,
        Self::SwapObjects,
        Self::RandomDelete,
        Self::RandomizeTextures,
    ];

    /// Menu layout: tools grouped the way the host menu separates them.
    #[must_use]
    pub const fn menu_groups() -> &'static [&'static [Self]] {
        &[
            &[Self::ExtrudeFaces, Self::JitterVertices],
            &[
                Self::ScatterOnFaces,
                Self::ScatterOnEdges,
                Self::ScatterOnVertices,
            ],
            &[Self::RandomizeObjects, Self::SwapObjects, Self::RandomDelete],
            &[Self::RandomizeTextures],
        ]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExtrudeFaces => extrude::TOOL_NAME,
            Self::JitterVertices => jitter::TOOL_NAME,
            Self::ScatterOnFaces => scatter::FACES_TOOL_NAME,
            Self::ScatterOnEdges => scatter::EDGES_TOOL_NAME,
            Self::ScatterOnVertices => scatter::VERTICES_TOOL_NAME,
            Self::RandomizeObjects => objects::RANDOMIZE_TOOL_NAME,
            Self::SwapObjects => objects::SWAP_TOOL_NAME,
            Self::RandomDelete => objects::DELETE_TOOL_NAME,
            Self::RandomizeTextures => texture::TOOL_NAME,
        }
    }

    /// Status-bar guidance shown when the selection holds nothing usable.
    #[must_use]
    pub const fn guidance(self) -> &'static str {
        match self {
            Self::ExtrudeFaces => "Select at least one ungrouped face.",
            Self::JitterVertices => {
                "Select at least one ungrouped edge (e.g. a face border or line)."
            }
            Self::ScatterOnFaces => {
                "Select one object instance (a copy) and at least one ungrouped face."
            }
            Self::ScatterOnEdges | Self::ScatterOnVertices => {
                "Select one object instance (a copy) and at least one ungrouped edge."
            }
            Self::RandomizeObjects | Self::RandomDelete => {
                "Select at least one aggregate or object instance (i.e. objects in your model)."
            }
            Self::SwapObjects => {
                "Select at least one object instance (i.e. objects in your model)."
            }
            Self::RandomizeTextures => {
                "Select at least one face or aggregate that has an image texture applied \
                 directly to its face(s). Note: this tool makes all copies of aggregates unique."
            }
        }
    }

    /// Key the preference store files last-used values under.
    #[must_use]
    pub const fn pref_key(self) -> &'static str {
        match self {
            Self::ExtrudeFaces => "random_extrusion",
            Self::JitterVertices => "random_vertices",
            Self::ScatterOnFaces => "random_place_faces",
            Self::ScatterOnEdges => "random_place_edges",
            Self::ScatterOnVertices => "random_place_vertices",
            Self::RandomizeObjects => "randomize_objects",
            Self::SwapObjects => "randomize_swap",
            Self::RandomDelete => "random_delete",
            Self::RandomizeTextures => "random_texture_placement",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Invocation driver
// ─────────────────────────────────────────────────────────────────────────────

/// What one completed invocation did.
#[derive(Debug, Default)]
pub struct ToolReport {
    /// Primitives or objects the tool worked through.
    pub processed: usize,
    /// Instances a scatter tool spawned.
    pub created: Vec<InstanceId>,
    /// Objects the delete tool erased.
    pub erased: usize,
}

/// Outcome of one invocation: the user may cancel the parameter dialog, in
/// which case nothing was touched.
#[derive(Debug)]
pub enum ToolRun {
    Cancelled,
    Completed(ToolReport),
}

/// Public entry point for consumers.
#[derive(Debug, Default)]
pub struct RandomTools {
    prefs: PrefStore,
}

impl RandomTools {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefs: PrefStore::in_memory(),
        }
    }

    #[must_use]
    pub fn with_prefs(prefs: PrefStore) -> Self {
        Self { prefs }
    }

    /// Run one tool invocation against the scene.
    ///
    /// The selection is snapshotted up front; anything the tool creates never
    /// re-enters the iteration. An empty qualifying selection returns
    /// [`ToolError::EmptySelection`] with the tool's guidance text before any
    /// batch opens. A mutation failure mid-batch stops the iteration, is
    /// reported through the status sink, and the batch commits in its partial
    /// state; the error still propagates so the host can show it.
    pub fn run_tool(
        &mut self,
        kind: ToolKind,
        scene: &mut Scene,
        input: &mut dyn ParamSource,
        rng: &mut dyn RngCore,
        status: &mut dyn StatusSink,
    ) -> Result<ToolRun, ToolError> {
        match kind {
            ToolKind::ExtrudeFaces => self.run_extrude(scene, input, rng, status),
            ToolKind::JitterVertices => self.run_jitter(scene, input, rng, status),
            ToolKind::ScatterOnFaces => self.run_scatter_faces(scene, input, rng, status),
            ToolKind::ScatterOnEdges => self.run_scatter_edges(scene, input, rng, status),
            ToolKind::ScatterOnVertices => self.run_scatter_vertices(scene, input, rng, status),
            ToolKind::RandomizeObjects => self.run_randomize(scene, input, rng, status),
            ToolKind::SwapObjects => Self::run_swap(scene, rng, status),
            ToolKind::RandomDelete => self.run_delete(scene, input, rng, status),
            ToolKind::RandomizeTextures => Self::run_textures(scene, rng, status),
        }
    }

    /// Ask the dialog, remembering the answers as the next invocation's
    /// defaults. `None` means the user cancelled.
    fn ask(
        &mut self,
        kind: ToolKind,
        input: &mut dyn ParamSource,
        mut prompts: Vec<Prompt>,
    ) -> Option<Vec<String>> {
        let defaults: Vec<String> = prompts.iter().map(|p| p.default.clone()).collect();
        let stored = self.prefs.read_defaults(kind.pref_key(), &defaults);
        for (prompt, default) in prompts.iter_mut().zip(stored) {
            prompt.default = default;
        }
        let answers = input.input(kind.label(), &prompts)?;
        self.prefs.write_values(kind.pref_key(), &answers);
        Some(answers)
    }

    fn run_extrude(
        &mut self,
        scene: &mut Scene,
        input: &mut dyn ParamSource,
        rng: &mut dyn RngCore,
        status: &mut dyn StatusSink,
    ) -> Result<ToolRun, ToolError> {
        let kind = ToolKind::ExtrudeFaces;
        let faces = scene.selection().faces();
        if faces.is_empty() {
            return Err(ToolError::EmptySelection(kind.guidance().to_owned()));
        }

        let Some(answers) = self.ask(
            kind,
            input,
            vec![
                Prompt::free("MIN Extrusion (distance)", "0"),
                Prompt::free("MAX Extrusion (distance)", "1'"),
                Prompt::choice("Create New Faces", "Yes", &["Yes", "No"]),
            ],
        ) else {
            return Ok(ToolRun::Cancelled);
        };
        let params = extrude::ExtrudeParams {
            min: parse_length("MIN Extrusion", answer(&answers, 0, "MIN Extrusion")?)?,
            max: parse_length("MAX Extrusion", answer(&answers, 1, "MAX Extrusion")?)?,
            create_faces: parse_yes_no("Create New Faces", answer(&answers, 2, "Create New Faces")?)?,
        };

        scene.begin_batch(kind.label());
        let mut ctx = ToolContext { rng: &mut *rng, status: &mut *status };
        let result = extrude::run(scene, &faces, &params, &mut ctx);
        Self::finish(scene, status, result).map(|processed| {
            ToolRun::Completed(ToolReport {
                processed,
                ..ToolReport::default()
            })
        })
    }

    fn run_jitter(
        &mut self,
        scene: &mut Scene,
        input: &mut dyn ParamSource,
        rng: &mut dyn RngCore,
        status: &mut dyn StatusSink,
    ) -> Result<ToolRun, ToolError> {
        let kind = ToolKind::JitterVertices;
        let edges = scene.selection().edges();
        if edges.is_empty() {
            return Err(ToolError::EmptySelection(kind.guidance().to_owned()));
        }

        let Some(answers) = self.ask(
            kind,
            input,
            vec![
                Prompt::free("MAX Variation RED (x distance)", "1'"),
                Prompt::free("MAX Variation GREEN (y distance)", "1'"),
                Prompt::free("MAX Variation BLUE (z distance)", "1'"),
            ],
        ) else {
            return Ok(ToolRun::Cancelled);
        };
        let params = jitter::JitterParams {
            max_x: parse_length("MAX Variation RED", answer(&answers, 0, "MAX Variation RED")?)?,
            max_y: parse_length("MAX Variation GREEN", answer(&answers, 1, "MAX Variation GREEN")?)?,
            max_z: parse_length("MAX Variation BLUE", answer(&answers, 2, "MAX Variation BLUE")?)?,
        };

        scene.begin_batch(kind.label());
        let mut ctx = ToolContext { rng: &mut *rng, status: &mut *status };
        let result = jitter::run(scene, &edges, &params, &mut ctx);
        Self::finish(scene, status, result).map(|processed| {
            ToolRun::Completed(ToolReport {
                processed,
                ..ToolReport::default()
            })
        })
    }

    /// The reference definition for scatter tools: the first selected
    /// instance's definition.
    fn reference_definition(scene: &Scene) -> Option<scene::DefinitionId> {
        let first = scene.selection().instances().first().copied()?;
        scene.instance(first).map(|i| i.definition)
    }

    fn scatter_prompts(scene: &Scene, target: &str, default_copies: &str) -> Vec<Prompt> {
        let layers = scene.layer_names();
        let layer_refs: Vec<&str> = layers.iter().map(String::as_str).collect();
        let first_layer = layer_refs.first().copied().unwrap_or("Layer0");
        vec![
            Prompt::free(
                &format!("MAX Number of Copies per {target} (<1 for Probability)"),
                default_copies,
            ),
            Prompt::free("MAX Rotation Variation (+/- degrees)", "360"),
            Prompt::free("Scale Variation Factor (0 = none)", "0.5"),
            Prompt::choice("Orientation", "Normal", &["Up", "Normal"]),
            Prompt::choice("Place Copies on Tag/Layer", first_layer, &layer_refs),
        ]
    }

    fn parse_scatter(scene: &Scene, answers: &[String]) -> Result<scatter::ScatterParams, ToolError> {
        let layer_name = answer(answers, 4, "Place Copies on Tag/Layer")?;
        let layer = scene
            .layer_by_name(layer_name)
            .ok_or_else(|| params::ParamError::UnknownLayer {
                name: layer_name.to_owned(),
            })?;
        Ok(scatter::ScatterParams {
            copies: parse_number("MAX Number of Copies", answer(answers, 0, "MAX Number of Copies")?)?,
            max_rotation_deg: parse_number(
                "MAX Rotation Variation",
                answer(answers, 1, "MAX Rotation Variation")?,
            )?,
            scale_variation: parse_number(
                "Scale Variation Factor",
                answer(answers, 2, "Scale Variation Factor")?,
            )?,
            orientation: parse_orientation("Orientation", answer(answers, 3, "Orientation")?)?,
            layer,
        })
    }

    fn run_scatter_faces(
        &mut self,
        scene: &mut Scene,
        input: &mut dyn ParamSource,
        rng: &mut dyn RngCore,
        status: &mut dyn StatusSink,
    ) -> Result<ToolRun, ToolError> {
        let kind = ToolKind::ScatterOnFaces;
        let faces = scene.selection().faces();
        let Some(reference) = Self::reference_definition(scene) else {
            return Err(ToolError::EmptySelection(kind.guidance().to_owned()));
        };
        if faces.is_empty() {
            return Err(ToolError::EmptySelection(kind.guidance().to_owned()));
        }

        let prompts = Self::scatter_prompts(scene, "Face", "10");
        let Some(answers) = self.ask(kind, input, prompts) else {
            return Ok(ToolRun::Cancelled);
        };
        let params = Self::parse_scatter(scene, &answers)?;

        scene.begin_batch(kind.label());
        let mut ctx = ToolContext { rng: &mut *rng, status: &mut *status };
        let result = scatter::run_on_faces(scene, &faces, reference, &params, &mut ctx);
        Self::finish(scene, status, result).map(|outcome| {
            ToolRun::Completed(ToolReport {
                processed: faces.len(),
                created: outcome.placed,
                erased: 0,
            })
        })
    }

    fn run_scatter_edges(
        &mut self,
        scene: &mut Scene,
        input: &mut dyn ParamSource,
        rng: &mut dyn RngCore,
        status: &mut dyn StatusSink,
    ) -> Result<ToolRun, ToolError> {
        let kind = ToolKind::ScatterOnEdges;
        let edges = scene.selection().edges();
        let Some(reference) = Self::reference_definition(scene) else {
            return Err(ToolError::EmptySelection(kind.guidance().to_owned()));
        };
        if edges.is_empty() {
            return Err(ToolError::EmptySelection(kind.guidance().to_owned()));
        }

        let prompts = Self::scatter_prompts(scene, "Edge", "2");
        let Some(answers) = self.ask(kind, input, prompts) else {
            return Ok(ToolRun::Cancelled);
        };
        let params = Self::parse_scatter(scene, &answers)?;

        scene.begin_batch(kind.label());
        let mut ctx = ToolContext { rng: &mut *rng, status: &mut *status };
        let result = scatter::run_on_edges(scene, &edges, reference, &params, &mut ctx);
        Self::finish(scene, status, result).map(|outcome| {
            ToolRun::Completed(ToolReport {
                processed: edges.len(),
                created: outcome.placed,
                erased: 0,
            })
        })
    }

    fn run_scatter_vertices(
        &mut self,
        scene: &mut Scene,
        input: &mut dyn ParamSource,
        rng: &mut dyn RngCore,
        status: &mut dyn StatusSink,
    ) -> Result<ToolRun, ToolError> {
        let kind = ToolKind::ScatterOnVertices;
        let edges = scene.selection().edges();
        let Some(reference) = Self::reference_definition(scene) else {
            return Err(ToolError::EmptySelection(kind.guidance().to_owned()));
        };
        if edges.is_empty() {
            return Err(ToolError::EmptySelection(kind.guidance().to_owned()));
        }

        let layers = scene.layer_names();
        let layer_refs: Vec<&str> = layers.iter().map(String::as_str).collect();
        let first_layer = layer_refs.first().copied().unwrap_or("Layer0");
        let prompts = vec![
            Prompt::choice(
                "Placement Probability (%)",
                "50",
                &["10", "25", "50", "75", "100"],
            ),
            Prompt::free("MAX Rotation Variation (+/- degrees)", "360"),
            Prompt::free("Scale Variation Factor (0 = none)", "0.5"),
            Prompt::choice("Orientation", "Normal", &["Up", "Normal"]),
            Prompt::choice("Place Copies on Tag/Layer", first_layer, &layer_refs),
        ];
        let Some(answers) = self.ask(kind, input, prompts) else {
            return Ok(ToolRun::Cancelled);
        };
        let layer_name = answer(&answers, 4, "Place Copies on Tag/Layer")?;
        let layer = scene
            .layer_by_name(layer_name)
            .ok_or_else(|| params::ParamError::UnknownLayer {
                name: layer_name.to_owned(),
            })?;
        let params = scatter::VertexScatterParams {
            probability_percent: parse_number(
                "Placement Probability",
                answer(&answers, 0, "Placement Probability")?,
            )?,
            max_rotation_deg: parse_number(
                "MAX Rotation Variation",
                answer(&answers, 1, "MAX Rotation Variation")?,
            )?,
            scale_variation: parse_number(
                "Scale Variation Factor",
                answer(&answers, 2, "Scale Variation Factor")?,
            )?,
            orientation: parse_orientation("Orientation", answer(&answers, 3, "Orientation")?)?,
            layer,
        };

        scene.begin_batch(kind.label());
        let mut ctx = ToolContext { rng: &mut *rng, status: &mut *status };
        let result = scatter::run_on_vertices(scene, &edges, reference, &params, &mut ctx);
        Self::finish(scene, status, result).map(|outcome| {
            ToolRun::Completed(ToolReport {
                processed: edges.len(),
                created: outcome.placed,
                erased: 0,
            })
        })
    }

    fn run_randomize(
        &mut self,
        scene: &mut Scene,
        input: &mut dyn ParamSource,
        rng: &mut dyn RngCore,
        status: &mut dyn StatusSink,
    ) -> Result<ToolRun, ToolError> {
        let kind = ToolKind::RandomizeObjects;
        let objects = scene.selection().objects();
        if objects.is_empty() {
            return Err(ToolError::EmptySelection(kind.guidance().to_owned()));
        }

        let Some(answers) = self.ask(
            kind,
            input,
            vec![
                Prompt::free("MAX Rotation Variation (+/- degrees)", "360"),
                Prompt::free("MAX Position Variation (+/- distance)", "0"),
                Prompt::free("Scale Variation Factor (0 = none)", "0.5"),
            ],
        ) else {
            return Ok(ToolRun::Cancelled);
        };
        let params = objects::RandomizeParams {
            max_rotation_deg: parse_number(
                "MAX Rotation Variation",
                answer(&answers, 0, "MAX Rotation Variation")?,
            )?,
            position_variation: parse_length(
                "MAX Position Variation",
                answer(&answers, 1, "MAX Position Variation")?,
            )?,
            scale_variation: parse_number(
                "Scale Variation Factor",
                answer(&answers, 2, "Scale Variation Factor")?,
            )?,
        };

        scene.begin_batch(kind.label());
        let mut ctx = ToolContext { rng: &mut *rng, status: &mut *status };
        let result = objects::randomize(scene, &objects, &params, &mut ctx);
        Self::finish(scene, status, result).map(|processed| {
            ToolRun::Completed(ToolReport {
                processed,
                ..ToolReport::default()
            })
        })
    }

    /// Swap takes no parameters; the dialog round-trip is skipped entirely.
    fn run_swap(
        scene: &mut Scene,
        rng: &mut dyn RngCore,
        status: &mut dyn StatusSink,
    ) -> Result<ToolRun, ToolError> {
        let kind = ToolKind::SwapObjects;
        let instances = scene.selection().instances();
        if instances.is_empty() {
            return Err(ToolError::EmptySelection(kind.guidance().to_owned()));
        }

        scene.begin_batch(kind.label());
        let mut ctx = ToolContext { rng: &mut *rng, status: &mut *status };
        let result = objects::swap(scene, &instances, &mut ctx);
        Self::finish(scene, status, result).map(|processed| {
            ToolRun::Completed(ToolReport {
                processed,
                ..ToolReport::default()
            })
        })
    }

    fn run_delete(
        &mut self,
        scene: &mut Scene,
        input: &mut dyn ParamSource,
        rng: &mut dyn RngCore,
        status: &mut dyn StatusSink,
    ) -> Result<ToolRun, ToolError> {
        let kind = ToolKind::RandomDelete;
        let objects = scene.selection().objects();
        if objects.is_empty() {
            return Err(ToolError::EmptySelection(kind.guidance().to_owned()));
        }

        let Some(answers) = self.ask(
            kind,
            input,
            vec![Prompt::choice(
                "Deletion Probability (%)",
                "50",
                &["10", "25", "50", "75", "90"],
            )],
        ) else {
            return Ok(ToolRun::Cancelled);
        };
        let params = objects::DeleteParams {
            probability_percent: parse_number(
                "Deletion Probability",
                answer(&answers, 0, "Deletion Probability")?,
            )?,
        };

        scene.begin_batch(kind.label());
        let mut ctx = ToolContext { rng: &mut *rng, status: &mut *status };
        let result = objects::delete(scene, &objects, &params, &mut ctx);
        Self::finish(scene, status, result).map(|erased| {
            ToolRun::Completed(ToolReport {
                processed: objects.len(),
                created: Vec::new(),
                erased,
            })
        })
    }

    /// Texture randomization takes no parameters either.
    fn run_textures(
        scene: &mut Scene,
        rng: &mut dyn RngCore,
        status: &mut dyn StatusSink,
    ) -> Result<ToolRun, ToolError> {
        let kind = ToolKind::RandomizeTextures;
        let selection = scene.selection();
        let faces = selection.faces();
        let aggregates = selection.aggregates();
        if faces.is_empty() && aggregates.is_empty() {
            return Err(ToolError::EmptySelection(kind.guidance().to_owned()));
        }

        scene.begin_batch(kind.label());
        let mut ctx = ToolContext { rng: &mut *rng, status: &mut *status };
        let result = texture::run(scene, &faces, &aggregates, &mut ctx);
        Self::finish(scene, status, result).map(|processed| {
            ToolRun::Completed(ToolReport {
                processed,
                ..ToolReport::default()
            })
        })
    }

    /// Close out a batch. A mutation failure is reported and the batch still
    /// commits in its partial state; the transaction wrapper was already
    /// running when the fault happened.
    fn finish<T>(
        scene: &mut Scene,
        status: &mut dyn StatusSink,
        result: Result<T, ToolError>,
    ) -> Result<T, ToolError> {
        if let Err(err) = &result {
            log::error!("{err}");
            status.status(&format!("Couldn't do it! Error: {err}"));
        }
        scene.commit_batch();
        result
    }
}
