//! In-process model of the host scene surface the tools mutate: mesh
//! primitives, reusable definitions, placed instances and aggregates, layers,
//! the selection snapshot and the undoable batch boundary.

mod status;

use std::collections::BTreeMap;

use crate::geom::{BBox, Line3, Plane, Point3, Transform, Vec3};

pub use status::{CollectStatus, LogStatus, StatusSink};

// ─────────────────────────────────────────────────────────────────────────────
// Ids
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(pub usize);
    };
}

id_type!(
    /// Identity of a vertex; two edges sharing an endpoint share this id.
    VertexId
);
id_type!(EdgeId);
id_type!(FaceId);
id_type!(
    /// Reusable geometry a copy instantiates. Definitions are never deleted
    /// by the tools, only their instances.
    DefinitionId
);
id_type!(AggregateDefId);
id_type!(InstanceId);
id_type!(AggregateId);
id_type!(LayerId);

// ─────────────────────────────────────────────────────────────────────────────
// Entities
// ─────────────────────────────────────────────────────────────────────────────

/// Closed set of things a selection can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Face(FaceId),
    Edge(EdgeId),
    Vertex(VertexId),
    Instance(InstanceId),
    Aggregate(AggregateId),
}

/// The object subset of [`Entity`]: a placed instance or a grouped aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectRef {
    Instance(InstanceId),
    Aggregate(AggregateId),
}

#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: Point3,
    pub faces: Vec<FaceId>,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub start: VertexId,
    pub end: VertexId,
    pub faces: Vec<FaceId>,
}

/// 2-point texture alignment: a world anchor on the face and a scale/offset
/// anchor in texture space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureAlignment {
    pub anchors: [Point3; 2],
}

/// One side of a face: an optional material name plus its alignment.
#[derive(Debug, Clone, Default)]
pub struct FaceSide {
    pub material: Option<String>,
    pub alignment: Option<TextureAlignment>,
}

#[derive(Debug, Clone)]
pub struct Face {
    pub vertices: Vec<VertexId>,
    pub front: FaceSide,
    pub back: FaceSide,
}

#[derive(Debug, Clone)]
pub struct Definition {
    pub name: String,
    /// Local bounding volume of the definition's geometry.
    pub bounds: BBox,
}

#[derive(Debug, Clone)]
pub struct Instance {
    pub definition: DefinitionId,
    pub transform: Transform,
    pub layer: LayerId,
}

/// Shared content of one or more aggregates. Stays shared until
/// [`Scene::make_aggregate_unique`] copies it.
#[derive(Debug, Clone, Default)]
pub struct AggregateDef {
    pub faces: Vec<FaceId>,
    pub instances: Vec<InstanceId>,
}

#[derive(Debug, Clone)]
pub struct Aggregate {
    pub definition: AggregateDefId,
    pub transform: Transform,
    pub layer: LayerId,
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("unknown or erased vertex {0:?}")]
    UnknownVertex(VertexId),
    #[error("unknown or erased edge {0:?}")]
    UnknownEdge(EdgeId),
    #[error("unknown or erased face {0:?}")]
    UnknownFace(FaceId),
    #[error("unknown definition {0:?}")]
    UnknownDefinition(DefinitionId),
    #[error("unknown or erased instance {0:?}")]
    UnknownInstance(InstanceId),
    #[error("unknown or erased aggregate {0:?}")]
    UnknownAggregate(AggregateId),
    #[error("unknown layer {0:?}")]
    UnknownLayer(LayerId),
    #[error("face {0:?} has a degenerate boundary loop")]
    DegenerateFace(FaceId),
    #[error("edge {0:?} has coincident endpoints")]
    DegenerateEdge(EdgeId),
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable snapshot of the host selection taken at tool start. Entities the
/// tool creates afterwards never show up here.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    entities: Vec<Entity>,
}

impl Selection {
    #[must_use]
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn faces(&self) -> Vec<FaceId> {
        self.entities
            .iter()
            .filter_map(|e| match e {
                Entity::Face(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn edges(&self) -> Vec<EdgeId> {
        self.entities
            .iter()
            .filter_map(|e| match e {
                Entity::Edge(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn instances(&self) -> Vec<InstanceId> {
        self.entities
            .iter()
            .filter_map(|e| match e {
                Entity::Instance(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn aggregates(&self) -> Vec<AggregateId> {
        self.entities
            .iter()
            .filter_map(|e| match e {
                Entity::Aggregate(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Instances first, then aggregates; tools iterate objects in this
    /// order.
    #[must_use]
    pub fn objects(&self) -> Vec<ObjectRef> {
        let mut objects: Vec<ObjectRef> = self
            .instances()
            .into_iter()
            .map(ObjectRef::Instance)
            .collect();
        objects.extend(self.aggregates().into_iter().map(ObjectRef::Aggregate));
        objects
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scene
// ─────────────────────────────────────────────────────────────────────────────

/// Everything a batch snapshot has to capture.
#[derive(Debug, Clone, Default)]
struct SceneData {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    definitions: Vec<Definition>,
    aggregate_defs: Vec<AggregateDef>,
    instances: BTreeMap<InstanceId, Instance>,
    aggregates: BTreeMap<AggregateId, Aggregate>,
    layers: Vec<Layer>,
    selection: Vec<Entity>,
    next_instance: usize,
    next_aggregate: usize,
}

#[derive(Debug)]
struct ActiveBatch {
    name: String,
    before: SceneData,
}

#[derive(Debug)]
struct CommittedBatch {
    name: String,
    before: SceneData,
}

/// The scene itself. One tool invocation assumes exclusive access; nothing in
/// here locks.
#[derive(Debug, Default)]
pub struct Scene {
    data: SceneData,
    active: Option<ActiveBatch>,
    undo: Vec<CommittedBatch>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── layers ──────────────────────────────────────────────────────────────

    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        self.data.layers.push(Layer { name: name.into() });
        LayerId(self.data.layers.len() - 1)
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.data.layers
    }

    #[must_use]
    pub fn layer_names(&self) -> Vec<String> {
        self.data.layers.iter().map(|l| l.name.clone()).collect()
    }

    #[must_use]
    pub fn layer_by_name(&self, name: &str) -> Option<LayerId> {
        self.data
            .layers
            .iter()
            .position(|l| l.name == name)
            .map(LayerId)
    }

    // ── mesh construction ──────────────────────────────────────────────────

    pub fn add_vertex(&mut self, position: Point3) -> VertexId {
        self.data.vertices.push(Vertex {
            position,
            faces: Vec::new(),
        });
        VertexId(self.data.vertices.len() - 1)
    }

    /// Add a bare edge between two vertices. Reuses an existing edge with the
    /// same endpoints so adjacency accumulates on one record.
    pub fn add_edge(&mut self, start: VertexId, end: VertexId) -> EdgeId {
        if let Some(existing) = self.find_edge(start, end) {
            return existing;
        }
        self.data.edges.push(Edge {
            start,
            end,
            faces: Vec::new(),
        });
        EdgeId(self.data.edges.len() - 1)
    }

    fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.data
            .edges
            .iter()
            .position(|e| (e.start == a && e.end == b) || (e.start == b && e.end == a))
            .map(EdgeId)
    }

    /// Add a planar face over an existing vertex loop. Boundary edges are
    /// created (or reused, so shared borders keep one edge record) and
    /// adjacency is recorded on both vertices and edges.
    pub fn add_face(&mut self, loop_vertices: &[VertexId]) -> FaceId {
        let id = FaceId(self.data.faces.len());
        self.data.faces.push(Face {
            vertices: loop_vertices.to_vec(),
            front: FaceSide::default(),
            back: FaceSide::default(),
        });
        for (i, &v) in loop_vertices.iter().enumerate() {
            let next = loop_vertices[(i + 1) % loop_vertices.len()];
            let edge = self.add_edge(v, next);
            self.data.edges[edge.0].faces.push(id);
            self.data.vertices[v.0].faces.push(id);
        }
        id
    }

    // ── objects ────────────────────────────────────────────────────────────

    pub fn add_definition(&mut self, name: impl Into<String>, bounds: BBox) -> DefinitionId {
        self.data.definitions.push(Definition {
            name: name.into(),
            bounds,
        });
        DefinitionId(self.data.definitions.len() - 1)
    }

    pub fn add_instance(
        &mut self,
        definition: DefinitionId,
        transform: Transform,
        layer: LayerId,
    ) -> InstanceId {
        let id = InstanceId(self.data.next_instance);
        self.data.next_instance += 1;
        self.data.instances.insert(
            id,
            Instance {
                definition,
                transform,
                layer,
            },
        );
        id
    }

    /// Create an empty aggregate ("group") on the given layer, with its own
    /// fresh definition.
    pub fn create_aggregate(&mut self, layer: LayerId) -> AggregateId {
        self.data.aggregate_defs.push(AggregateDef::default());
        let definition = AggregateDefId(self.data.aggregate_defs.len() - 1);
        let id = AggregateId(self.data.next_aggregate);
        self.data.next_aggregate += 1;
        self.data.aggregates.insert(
            id,
            Aggregate {
                definition,
                transform: Transform::identity(),
                layer,
            },
        );
        id
    }

    /// Create an aggregate sharing an existing aggregate's definition
    /// (a copy of a group before anything makes it unique).
    pub fn copy_aggregate(&mut self, source: AggregateId) -> Result<AggregateId, SceneError> {
        let src = self
            .data
            .aggregates
            .get(&source)
            .ok_or(SceneError::UnknownAggregate(source))?
            .clone();
        let id = AggregateId(self.data.next_aggregate);
        self.data.next_aggregate += 1;
        self.data.aggregates.insert(id, src);
        Ok(id)
    }

    /// Spawn a new instance inside an aggregate's definition.
    pub fn add_instance_to_aggregate(
        &mut self,
        aggregate: AggregateId,
        definition: DefinitionId,
        transform: Transform,
        layer: LayerId,
    ) -> Result<InstanceId, SceneError> {
        let def = self
            .data
            .aggregates
            .get(&aggregate)
            .ok_or(SceneError::UnknownAggregate(aggregate))?
            .definition;
        let id = self.add_instance(definition, transform, layer);
        self.data.aggregate_defs[def.0].instances.push(id);
        Ok(id)
    }

    pub fn add_face_to_aggregate(
        &mut self,
        aggregate: AggregateId,
        face: FaceId,
    ) -> Result<(), SceneError> {
        let def = self
            .data
            .aggregates
            .get(&aggregate)
            .ok_or(SceneError::UnknownAggregate(aggregate))?
            .definition;
        self.data.aggregate_defs[def.0].faces.push(face);
        Ok(())
    }

    /// Give an aggregate its own copy of a shared definition so edits do not
    /// leak into sibling copies. Member faces are deep-copied with fresh
    /// vertices; member instances are re-instantiated against the same
    /// definitions. A definition with a single user stays as it is.
    pub fn make_aggregate_unique(&mut self, id: AggregateId) -> Result<(), SceneError> {
        let def_id = self
            .data
            .aggregates
            .get(&id)
            .ok_or(SceneError::UnknownAggregate(id))?
            .definition;
        let users = self
            .data
            .aggregates
            .values()
            .filter(|a| a.definition == def_id)
            .count();
        if users <= 1 {
            return Ok(());
        }

        let source = self.data.aggregate_defs[def_id.0].clone();
        let mut copy = AggregateDef::default();

        for face_id in source.faces {
            let old = self
                .data
                .faces
                .get(face_id.0)
                .ok_or(SceneError::UnknownFace(face_id))?
                .clone();
            let positions: Vec<Point3> = old
                .vertices
                .iter()
                .map(|v| self.data.vertices[v.0].position)
                .collect();
            let loop_vertices: Vec<VertexId> = positions
                .into_iter()
                .map(|p| self.add_vertex(p))
                .collect();
            let new_face = self.add_face(&loop_vertices);
            self.data.faces[new_face.0].front = old.front.clone();
            self.data.faces[new_face.0].back = old.back.clone();
            copy.faces.push(new_face);
        }

        for instance_id in source.instances {
            let old = self
                .data
                .instances
                .get(&instance_id)
                .ok_or(SceneError::UnknownInstance(instance_id))?
                .clone();
            let new_instance = self.add_instance(old.definition, old.transform, old.layer);
            copy.instances.push(new_instance);
        }

        self.data.aggregate_defs.push(copy);
        let new_def = AggregateDefId(self.data.aggregate_defs.len() - 1);
        if let Some(agg) = self.data.aggregates.get_mut(&id) {
            agg.definition = new_def;
        }
        Ok(())
    }

    /// Erase a batch of objects in one go. Erasing an aggregate also erases
    /// the instances inside its definition; the definitions themselves stay.
    pub fn erase_objects(&mut self, objects: &[ObjectRef]) {
        for object in objects {
            match object {
                ObjectRef::Instance(id) => {
                    self.data.instances.remove(id);
                }
                ObjectRef::Aggregate(id) => {
                    if let Some(agg) = self.data.aggregates.remove(id) {
                        let members =
                            self.data.aggregate_defs[agg.definition.0].instances.clone();
                        for member in members {
                            self.data.instances.remove(&member);
                        }
                    }
                }
            }
        }
        self.data.selection.retain(|e| match e {
            Entity::Instance(id) => self.data.instances.contains_key(id),
            Entity::Aggregate(id) => self.data.aggregates.contains_key(id),
            _ => true,
        });
    }

    // ── reads ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn vertex_position(&self, id: VertexId) -> Option<Point3> {
        self.data.vertices.get(id.0).map(|v| v.position)
    }

    #[must_use]
    pub fn vertex_faces(&self, id: VertexId) -> &[FaceId] {
        self.data
            .vertices
            .get(id.0)
            .map_or(&[], |v| v.faces.as_slice())
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.data.edges.get(id.0)
    }

    #[must_use]
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.data.faces.get(id.0)
    }

    pub fn face_mut(&mut self, id: FaceId) -> Option<&mut Face> {
        self.data.faces.get_mut(id.0)
    }

    #[must_use]
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.data.instances.get(&id)
    }

    #[must_use]
    pub fn aggregate(&self, id: AggregateId) -> Option<&Aggregate> {
        self.data.aggregates.get(&id)
    }

    #[must_use]
    pub fn aggregate_def(&self, id: AggregateDefId) -> Option<&AggregateDef> {
        self.data.aggregate_defs.get(id.0)
    }

    #[must_use]
    pub fn definition(&self, id: DefinitionId) -> Option<&Definition> {
        self.data.definitions.get(id.0)
    }

    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.data.instances.len()
    }

    #[must_use]
    pub fn instance_ids(&self) -> Vec<InstanceId> {
        self.data.instances.keys().copied().collect()
    }

    #[must_use]
    pub fn instances_on_layer(&self, layer: LayerId) -> Vec<InstanceId> {
        self.data
            .instances
            .iter()
            .filter(|(_, inst)| inst.layer == layer)
            .map(|(id, _)| *id)
            .collect()
    }

    /// World positions of a face's boundary loop.
    pub fn face_loop(&self, id: FaceId) -> Result<Vec<Point3>, SceneError> {
        let face = self.data.faces.get(id.0).ok_or(SceneError::UnknownFace(id))?;
        face.vertices
            .iter()
            .map(|v| {
                self.data
                    .vertices
                    .get(v.0)
                    .map(|vert| vert.position)
                    .ok_or(SceneError::UnknownVertex(*v))
            })
            .collect()
    }

    pub fn face_plane(&self, id: FaceId) -> Result<Plane, SceneError> {
        let loop_points = self.face_loop(id)?;
        Plane::from_polygon(&loop_points).ok_or(SceneError::DegenerateFace(id))
    }

    pub fn face_normal(&self, id: FaceId) -> Result<Vec3, SceneError> {
        Ok(self.face_plane(id)?.normal)
    }

    pub fn face_bounds(&self, id: FaceId) -> Result<BBox, SceneError> {
        let loop_points = self.face_loop(id)?;
        BBox::from_points(&loop_points).ok_or(SceneError::DegenerateFace(id))
    }

    pub fn edge_line(&self, id: EdgeId) -> Result<Line3, SceneError> {
        let edge = self.data.edges.get(id.0).ok_or(SceneError::UnknownEdge(id))?;
        let start = self
            .vertex_position(edge.start)
            .ok_or(SceneError::UnknownVertex(edge.start))?;
        let end = self
            .vertex_position(edge.end)
            .ok_or(SceneError::UnknownVertex(edge.end))?;
        if start == end {
            return Err(SceneError::DegenerateEdge(id));
        }
        Ok(Line3::new(start, end))
    }

    pub fn edge_bounds(&self, id: EdgeId) -> Result<BBox, SceneError> {
        let line = self.edge_line(id)?;
        Ok(BBox::from_points(&[line.start, line.end])
            .unwrap_or(BBox::new(line.start, line.end)))
    }

    /// Placement normal of an edge: one adjoining face's normal, the sum of
    /// two, or world up when the edge borders no face.
    pub fn edge_normal(&self, id: EdgeId) -> Result<Vec3, SceneError> {
        let edge = self.data.edges.get(id.0).ok_or(SceneError::UnknownEdge(id))?;
        match edge.faces.as_slice() {
            [] => Ok(Vec3::Z),
            [single] => self.face_normal(*single),
            [first, second, ..] => {
                Ok(self.face_normal(*first)?.add(self.face_normal(*second)?))
            }
        }
    }

    /// Placement normal of a vertex: the sum of all adjoining face normals,
    /// or world up for an isolated vertex.
    pub fn vertex_normal(&self, id: VertexId) -> Result<Vec3, SceneError> {
        let vertex = self
            .data
            .vertices
            .get(id.0)
            .ok_or(SceneError::UnknownVertex(id))?;
        if vertex.faces.is_empty() {
            return Ok(Vec3::Z);
        }
        let mut normal = Vec3::ZERO;
        for face in vertex.faces.clone() {
            normal = normal.add(self.face_normal(face)?);
        }
        Ok(normal)
    }

    // ── object reads ───────────────────────────────────────────────────────

    pub fn object_transform(&self, object: ObjectRef) -> Result<Transform, SceneError> {
        match object {
            ObjectRef::Instance(id) => self
                .data
                .instances
                .get(&id)
                .map(|i| i.transform)
                .ok_or(SceneError::UnknownInstance(id)),
            ObjectRef::Aggregate(id) => self
                .data
                .aggregates
                .get(&id)
                .map(|a| a.transform)
                .ok_or(SceneError::UnknownAggregate(id)),
        }
    }

    pub fn object_bounds(&self, object: ObjectRef) -> Result<BBox, SceneError> {
        match object {
            ObjectRef::Instance(id) => {
                let instance = self
                    .data
                    .instances
                    .get(&id)
                    .ok_or(SceneError::UnknownInstance(id))?;
                let definition = self
                    .data
                    .definitions
                    .get(instance.definition.0)
                    .ok_or(SceneError::UnknownDefinition(instance.definition))?;
                Ok(definition.bounds.transformed(instance.transform))
            }
            ObjectRef::Aggregate(id) => {
                let aggregate = self
                    .data
                    .aggregates
                    .get(&id)
                    .ok_or(SceneError::UnknownAggregate(id))?;
                let def = &self.data.aggregate_defs[aggregate.definition.0];
                let mut bounds: Option<BBox> = None;
                for face in &def.faces {
                    let face_bounds = self.face_bounds(*face)?;
                    bounds = Some(match bounds {
                        Some(b) => b.union(face_bounds),
                        None => face_bounds,
                    });
                }
                for instance in &def.instances {
                    let inst_bounds = self.object_bounds(ObjectRef::Instance(*instance))?;
                    bounds = Some(match bounds {
                        Some(b) => b.union(inst_bounds),
                        None => inst_bounds,
                    });
                }
                let local = bounds.unwrap_or(BBox::new(Point3::ORIGIN, Point3::ORIGIN));
                Ok(local.transformed(aggregate.transform))
            }
        }
    }

    /// The pivot the randomize tool turns an object around: an instance's
    /// local origin, an aggregate's bounding-box center.
    pub fn object_center(&self, object: ObjectRef) -> Result<Point3, SceneError> {
        match object {
            ObjectRef::Instance(_) => Ok(self.object_transform(object)?.origin()),
            ObjectRef::Aggregate(_) => Ok(self.object_bounds(object)?.center()),
        }
    }

    // ── mutations ──────────────────────────────────────────────────────────

    pub fn translate_vertex(&mut self, id: VertexId, offset: Vec3) -> Result<(), SceneError> {
        let vertex = self
            .data
            .vertices
            .get_mut(id.0)
            .ok_or(SceneError::UnknownVertex(id))?;
        vertex.position = vertex.position + offset;
        Ok(())
    }

    /// Push/pull a face along its normal. With `create_faces` the old
    /// boundary is kept as fresh vertices and joined to the moved loop with
    /// one quad per boundary edge.
    pub fn push_pull_face(
        &mut self,
        id: FaceId,
        distance: f64,
        create_faces: bool,
    ) -> Result<(), SceneError> {
        let normal = self.face_normal(id)?;
        let loop_vertices = self
            .data
            .faces
            .get(id.0)
            .ok_or(SceneError::UnknownFace(id))?
            .vertices
            .clone();
        let old_positions: Vec<Point3> = loop_vertices
            .iter()
            .map(|v| self.data.vertices[v.0].position)
            .collect();

        let offset = normal.mul_scalar(distance);
        for v in &loop_vertices {
            self.data.vertices[v.0].position = self.data.vertices[v.0].position + offset;
        }

        if create_faces && distance != 0.0 {
            let old_vertices: Vec<VertexId> = old_positions
                .iter()
                .map(|p| self.add_vertex(*p))
                .collect();
            for i in 0..loop_vertices.len() {
                let j = (i + 1) % loop_vertices.len();
                self.add_face(&[
                    old_vertices[i],
                    old_vertices[j],
                    loop_vertices[j],
                    loop_vertices[i],
                ]);
            }
        }
        Ok(())
    }

    /// Pre-compose `transform` onto an object's current placement.
    pub fn transform_object(
        &mut self,
        object: ObjectRef,
        transform: Transform,
    ) -> Result<(), SceneError> {
        match object {
            ObjectRef::Instance(id) => {
                let instance = self
                    .data
                    .instances
                    .get_mut(&id)
                    .ok_or(SceneError::UnknownInstance(id))?;
                instance.transform = transform.compose(instance.transform);
            }
            ObjectRef::Aggregate(id) => {
                let aggregate = self
                    .data
                    .aggregates
                    .get_mut(&id)
                    .ok_or(SceneError::UnknownAggregate(id))?;
                aggregate.transform = transform.compose(aggregate.transform);
            }
        }
        Ok(())
    }

    pub fn set_instance_definition(
        &mut self,
        id: InstanceId,
        definition: DefinitionId,
    ) -> Result<(), SceneError> {
        if definition.0 >= self.data.definitions.len() {
            return Err(SceneError::UnknownDefinition(definition));
        }
        let instance = self
            .data
            .instances
            .get_mut(&id)
            .ok_or(SceneError::UnknownInstance(id))?;
        instance.definition = definition;
        Ok(())
    }

    /// Re-anchor one side's texture alignment. A side without a material
    /// keeps its (absent) alignment, matching how the host ignores the call.
    pub fn position_material(
        &mut self,
        id: FaceId,
        front: bool,
        alignment: TextureAlignment,
    ) -> Result<(), SceneError> {
        let face = self
            .data
            .faces
            .get_mut(id.0)
            .ok_or(SceneError::UnknownFace(id))?;
        let side = if front { &mut face.front } else { &mut face.back };
        if side.material.is_some() {
            side.alignment = Some(alignment);
        }
        Ok(())
    }

    // ── selection ──────────────────────────────────────────────────────────

    pub fn set_selection(&mut self, entities: Vec<Entity>) {
        self.data.selection = entities;
    }

    /// Snapshot of the current selection; later scene edits do not feed back
    /// into it.
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection::new(self.data.selection.clone())
    }

    // ── undoable batches ───────────────────────────────────────────────────

    /// Open a named batch; everything until `commit_batch` becomes one undo
    /// step. An already-open batch is committed first, like the host does.
    pub fn begin_batch(&mut self, name: impl Into<String>) {
        if self.active.is_some() {
            log::warn!("batch opened while another is active; committing the old one");
            self.commit_batch();
        }
        self.active = Some(ActiveBatch {
            name: name.into(),
            before: self.data.clone(),
        });
    }

    pub fn commit_batch(&mut self) {
        if let Some(batch) = self.active.take() {
            self.undo.push(CommittedBatch {
                name: batch.name,
                before: batch.before,
            });
        }
    }

    /// Throw away the active batch and restore the scene as it was when the
    /// batch opened.
    pub fn abort_batch(&mut self) {
        if let Some(batch) = self.active.take() {
            self.data = batch.before;
        }
    }

    /// Undo the most recent committed batch. Returns the batch name.
    pub fn undo(&mut self) -> Option<String> {
        let batch = self.undo.pop()?;
        self.data = batch.before;
        Some(batch.name)
    }

    #[must_use]
    pub fn has_active_batch(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}
