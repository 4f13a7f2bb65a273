use rand::SeedableRng;
use rand::rngs::StdRng;

use randomize_engine::geom::{BBox, Point3, Transform, Vec3};
use randomize_engine::params::{AcceptDefaults, ScriptedInput};
use randomize_engine::scene::{CollectStatus, Entity, FaceId, Scene};
use randomize_engine::{RandomTools, ToolKind, ToolRun};

fn scene_with_face_and_reference() -> (Scene, FaceId) {
    let mut scene = Scene::new();
    let layer = scene.add_layer("Layer0");

    let loop_vertices: Vec<_> = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(10.0, 0.0, 0.0),
        Point3::new(10.0, 10.0, 0.0),
        Point3::new(0.0, 10.0, 0.0),
    ]
    .into_iter()
    .map(|p| scene.add_vertex(p))
    .collect();
    let face = scene.add_face(&loop_vertices);

    let definition = scene.add_definition(
        "Tree",
        BBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 2.0)),
    );
    let reference = scene.add_instance(
        definition,
        Transform::translate(Vec3::new(50.0, 0.0, 0.0)),
        layer,
    );
    scene.set_selection(vec![Entity::Face(face), Entity::Instance(reference)]);
    (scene, face)
}

fn run(
    tools: &mut RandomTools,
    kind: ToolKind,
    scene: &mut Scene,
    input: &mut ScriptedInput,
    seed: u64,
) -> Result<ToolRun, randomize_engine::tools::ToolError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut status = CollectStatus::default();
    tools.run_tool(kind, scene, input, &mut rng, &mut status)
}

#[test]
fn scatter_on_faces_end_to_end() {
    let (mut scene, face) = scene_with_face_and_reference();
    let before = scene.instance_count();

    let mut tools = RandomTools::new();
    let mut input = ScriptedInput::new(&["5", "360", "0.5", "Normal", "Layer0"]);
    let outcome = run(&mut tools, ToolKind::ScatterOnFaces, &mut scene, &mut input, 1).unwrap();

    let ToolRun::Completed(report) = outcome else {
        panic!("dialog was not cancelled");
    };
    // The square face fills its bounding box, so all five attempts land.
    assert_eq!(report.created.len(), 5);
    assert_eq!(scene.instance_count(), before + 5);

    let layer = scene.layer_by_name("Layer0").unwrap();
    let loop_points = scene.face_loop(face).unwrap();
    for id in &report.created {
        let instance = scene.instance(*id).unwrap();
        assert_eq!(instance.layer, layer);
        let anchor = instance.transform.apply_point(Point3::new(0.0, 0.0, 0.0));
        assert!(anchor.z.abs() < 1e-9);
        assert!(anchor.x > 0.0 && anchor.x < 10.0, "outside the face: {anchor:?}");
        assert!(anchor.y > 0.0 && anchor.y < 10.0, "outside the face: {anchor:?}");
    }
    assert_eq!(loop_points.len(), 4);

    // The whole run is one undo step.
    assert_eq!(scene.undo_depth(), 1);
    scene.undo();
    assert_eq!(scene.instance_count(), before);
}

#[test]
fn a_cancelled_dialog_touches_nothing() {
    let (mut scene, face) = scene_with_face_and_reference();
    let before = scene.face_loop(face).unwrap();

    let mut tools = RandomTools::new();
    let mut input = ScriptedInput::cancelled();
    let outcome = run(&mut tools, ToolKind::ExtrudeFaces, &mut scene, &mut input, 2).unwrap();

    assert!(matches!(outcome, ToolRun::Cancelled));
    assert_eq!(scene.face_loop(face).unwrap(), before);
    assert_eq!(scene.undo_depth(), 0);
    assert!(!scene.has_active_batch());
}

#[test]
fn an_empty_selection_fails_with_guidance_before_any_batch() {
    let mut scene = Scene::new();
    scene.add_layer("Layer0");

    let mut tools = RandomTools::new();
    let mut input = ScriptedInput::new(&[]);
    let err = run(&mut tools, ToolKind::ExtrudeFaces, &mut scene, &mut input, 3).unwrap_err();

    assert_eq!(err.to_string(), "Select at least one ungrouped face.");
    assert_eq!(scene.undo_depth(), 0);
}

#[test]
fn extrusion_accepts_lengths_in_feet() {
    let (mut scene, face) = scene_with_face_and_reference();

    let mut tools = RandomTools::new();
    let mut input = ScriptedInput::new(&["1'", "1'", "No"]);
    run(&mut tools, ToolKind::ExtrudeFaces, &mut scene, &mut input, 4).unwrap();

    // A collapsed [12, 12] range extrudes by exactly one foot.
    for point in scene.face_loop(face).unwrap() {
        assert!((point.z - 12.0).abs() < 1e-9, "not one foot up: {point:?}");
    }
}

#[test]
fn answers_become_the_next_invocation_defaults() {
    let mut tools = RandomTools::new();

    let (mut scene, _) = scene_with_face_and_reference();
    let mut input = ScriptedInput::new(&["2", "4", "No"]);
    run(&mut tools, ToolKind::ExtrudeFaces, &mut scene, &mut input, 5).unwrap();

    // Accepting the dialog now replays the remembered values.
    let (mut scene, face) = scene_with_face_and_reference();
    let mut rng = StdRng::seed_from_u64(6);
    let mut status = CollectStatus::default();
    tools
        .run_tool(
            ToolKind::ExtrudeFaces,
            &mut scene,
            &mut AcceptDefaults,
            &mut rng,
            &mut status,
        )
        .unwrap();

    for point in scene.face_loop(face).unwrap() {
        assert!(
            (2.0 - 1e-9..=4.0 + 1e-9).contains(&point.z),
            "remembered range ignored: {point:?}"
        );
    }
    // "No" was remembered too: the moved face stays the only face.
    assert!(scene.face(FaceId(1)).is_none());
}

#[test]
fn delete_reports_what_it_erased_and_undoes_in_one_step() {
    let mut scene = Scene::new();
    let layer = scene.add_layer("Layer0");
    let definition = scene.add_definition(
        "Rock",
        BBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)),
    );
    let instances: Vec<_> = (0..10)
        .map(|i| {
            scene.add_instance(
                definition,
                Transform::translate(Vec3::new(f64::from(i), 0.0, 0.0)),
                layer,
            )
        })
        .collect();
    scene.set_selection(instances.iter().map(|id| Entity::Instance(*id)).collect());

    let mut tools = RandomTools::new();
    let mut input = ScriptedInput::new(&["50"]);
    let outcome = run(&mut tools, ToolKind::RandomDelete, &mut scene, &mut input, 7).unwrap();

    let ToolRun::Completed(report) = outcome else {
        panic!("dialog was not cancelled");
    };
    assert_eq!(report.processed, 10);
    assert_eq!(report.erased + scene.instance_count(), 10);

    scene.undo();
    assert_eq!(scene.instance_count(), 10);
}

#[test]
fn swap_runs_without_a_dialog() {
    let mut scene = Scene::new();
    let layer = scene.add_layer("Layer0");
    let oak = scene.add_definition(
        "Oak",
        BBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 2.0)),
    );
    let pine = scene.add_definition(
        "Pine",
        BBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 3.0)),
    );
    let instances: Vec<_> = [oak, pine, pine]
        .iter()
        .map(|d| scene.add_instance(*d, Transform::identity(), layer))
        .collect();
    scene.set_selection(instances.iter().map(|id| Entity::Instance(*id)).collect());

    let mut tools = RandomTools::new();
    // A cancelled dialog is irrelevant: swap never asks.
    let mut input = ScriptedInput::cancelled();
    let outcome = run(&mut tools, ToolKind::SwapObjects, &mut scene, &mut input, 8).unwrap();
    assert!(matches!(outcome, ToolRun::Completed(_)));

    let mut defs: Vec<_> = instances
        .iter()
        .map(|id| scene.instance(*id).unwrap().definition)
        .collect();
    defs.sort();
    assert_eq!(defs, vec![oak, pine, pine]);
}

#[test]
fn a_mid_batch_fault_still_commits_the_partial_batch() {
    let mut scene = Scene::new();
    scene.add_layer("Layer0");
    // A face id the scene has never seen.
    scene.set_selection(vec![Entity::Face(FaceId(99))]);

    let mut tools = RandomTools::new();
    let mut input = ScriptedInput::new(&["0", "1", "No"]);
    let mut rng = StdRng::seed_from_u64(9);
    let mut status = CollectStatus::default();
    let err = tools
        .run_tool(
            ToolKind::ExtrudeFaces,
            &mut scene,
            &mut input,
            &mut rng,
            &mut status,
        )
        .unwrap_err();

    assert!(err.to_string().contains("couldn't do it"));
    assert!(status
        .lines
        .iter()
        .any(|line| line.starts_with("Couldn't do it! Error:")));
    // The batch was already open; it commits as-is instead of vanishing.
    assert_eq!(scene.undo_depth(), 1);
    assert!(!scene.has_active_batch());
}

#[test]
fn scatter_rejects_an_unknown_layer_by_name() {
    let (mut scene, _) = scene_with_face_and_reference();

    let mut tools = RandomTools::new();
    let mut input = ScriptedInput::new(&["5", "360", "0.5", "Normal", "Roof"]);
    let err = run(&mut tools, ToolKind::ScatterOnFaces, &mut scene, &mut input, 10).unwrap_err();
    assert!(err.to_string().contains("Roof"));
    assert_eq!(scene.undo_depth(), 0);
}
