use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::geom::{
    Orientation, Point3, PointClassification, Tolerance, Vec3, classify_point_in_polygon,
};
use crate::scene::{CollectStatus, Scene};
use crate::tools::ToolContext;
use crate::tools::scatter::{
    ScatterParams, VertexScatterParams, run_on_edges, run_on_faces, run_on_vertices,
};

use super::{reference_definition, square_face};

#[test]
fn face_scatter_places_the_requested_copies_inside_the_face() {
    let mut scene = Scene::new();
    let layer = scene.add_layer("Scatter");
    let face = square_face(&mut scene, 10.0);
    let reference = reference_definition(&mut scene);

    let mut rng = StdRng::seed_from_u64(40);
    let mut status = CollectStatus::default();
    let mut ctx = ToolContext {
        rng: &mut rng,
        status: &mut status,
    };
    let params = ScatterParams {
        copies: 20.0,
        max_rotation_deg: 360.0,
        scale_variation: 0.5,
        orientation: Orientation::Normal,
        layer,
    };
    let outcome = run_on_faces(&mut scene, &[face], reference, &params, &mut ctx).unwrap();

    // The square fills its own bounding box, so every attempt lands.
    assert_eq!(outcome.placed.len(), 20);

    let loop_points = scene.face_loop(face).unwrap();
    let normal = scene.face_normal(face).unwrap();
    for id in &outcome.placed {
        let instance = scene.instance(*id).unwrap();
        assert_eq!(instance.layer, layer);
        let anchor = instance.transform.apply_point(Point3::ORIGIN);
        assert!(anchor.z.abs() < 1e-9, "off the face plane: {anchor:?}");
        assert_eq!(
            classify_point_in_polygon(anchor, &loop_points, normal, Tolerance::default_geom()),
            PointClassification::Inside
        );
    }

    // Every copy went into the container aggregate.
    let container = scene.aggregate(outcome.container).unwrap();
    let members = &scene.aggregate_def(container.definition).unwrap().instances;
    assert_eq!(members.len(), outcome.placed.len());
}

#[test]
fn fractional_copy_count_is_a_single_gated_attempt_per_face() {
    let mut scene = Scene::new();
    let layer = scene.add_layer("Scatter");
    let face = square_face(&mut scene, 10.0);
    let reference = reference_definition(&mut scene);

    let mut rng = StdRng::seed_from_u64(41);
    let mut status = CollectStatus::default();
    let mut ctx = ToolContext {
        rng: &mut rng,
        status: &mut status,
    };
    let params = ScatterParams {
        copies: 0.5,
        max_rotation_deg: 0.0,
        scale_variation: 0.0,
        orientation: Orientation::Up,
        layer,
    };
    let outcome = run_on_faces(&mut scene, &[face], reference, &params, &mut ctx).unwrap();
    assert!(outcome.placed.len() <= 1);
}

#[test]
fn up_orientation_keeps_the_copy_vertical() {
    let mut scene = Scene::new();
    let layer = scene.add_layer("Scatter");
    // Tilted quad; its normal is nowhere near world up.
    let loop_vertices: Vec<_> = [
        Point3::ORIGIN,
        Point3::new(10.0, 0.0, 0.0),
        Point3::new(10.0, 10.0, 8.0),
        Point3::new(0.0, 10.0, 8.0),
    ]
    .into_iter()
    .map(|p| scene.add_vertex(p))
    .collect();
    let face = scene.add_face(&loop_vertices);
    let reference = reference_definition(&mut scene);

    let mut rng = StdRng::seed_from_u64(42);
    let mut status = CollectStatus::default();
    let mut ctx = ToolContext {
        rng: &mut rng,
        status: &mut status,
    };
    let params = ScatterParams {
        copies: 10.0,
        max_rotation_deg: 360.0,
        scale_variation: 0.0,
        orientation: Orientation::Up,
        layer,
    };
    let outcome = run_on_faces(&mut scene, &[face], reference, &params, &mut ctx).unwrap();
    assert!(!outcome.placed.is_empty());

    for id in &outcome.placed {
        let up = scene
            .instance(*id)
            .unwrap()
            .transform
            .apply_vec(Vec3::Z)
            .normalized()
            .unwrap();
        assert!((up.dot(Vec3::Z) - 1.0).abs() < 1e-9, "copy not vertical: {up:?}");
    }
}

#[test]
fn normal_orientation_follows_the_face_normal() {
    let mut scene = Scene::new();
    let layer = scene.add_layer("Scatter");
    let loop_vertices: Vec<_> = [
        Point3::ORIGIN,
        Point3::new(10.0, 0.0, 0.0),
        Point3::new(10.0, 10.0, 8.0),
        Point3::new(0.0, 10.0, 8.0),
    ]
    .into_iter()
    .map(|p| scene.add_vertex(p))
    .collect();
    let face = scene.add_face(&loop_vertices);
    let reference = reference_definition(&mut scene);
    let normal = scene.face_normal(face).unwrap();

    let mut rng = StdRng::seed_from_u64(43);
    let mut status = CollectStatus::default();
    let mut ctx = ToolContext {
        rng: &mut rng,
        status: &mut status,
    };
    let params = ScatterParams {
        copies: 10.0,
        max_rotation_deg: 360.0,
        scale_variation: 0.5,
        orientation: Orientation::Normal,
        layer,
    };
    let outcome = run_on_faces(&mut scene, &[face], reference, &params, &mut ctx).unwrap();
    assert!(!outcome.placed.is_empty());

    for id in &outcome.placed {
        let up = scene
            .instance(*id)
            .unwrap()
            .transform
            .apply_vec(Vec3::Z)
            .normalized()
            .unwrap();
        assert!((up.dot(normal) - 1.0).abs() < 1e-9, "copy ignores the normal: {up:?}");
    }
}

#[test]
fn edge_scatter_lands_every_copy_on_the_segment() {
    let mut scene = Scene::new();
    let layer = scene.add_layer("Scatter");
    let a = scene.add_vertex(Point3::ORIGIN);
    let b = scene.add_vertex(Point3::new(10.0, 0.0, 0.0));
    let edge = scene.add_edge(a, b);
    let reference = reference_definition(&mut scene);

    let mut rng = StdRng::seed_from_u64(44);
    let mut status = CollectStatus::default();
    let mut ctx = ToolContext {
        rng: &mut rng,
        status: &mut status,
    };
    let params = ScatterParams {
        copies: 10.0,
        max_rotation_deg: 360.0,
        scale_variation: 0.5,
        orientation: Orientation::Up,
        layer,
    };
    let outcome = run_on_edges(&mut scene, &[edge], reference, &params, &mut ctx).unwrap();

    // The segment is its own bounding box; no attempt is rejected.
    assert_eq!(outcome.placed.len(), 10);
    for id in &outcome.placed {
        let anchor = scene
            .instance(*id)
            .unwrap()
            .transform
            .apply_point(Point3::ORIGIN);
        assert!(anchor.y.abs() < 1e-9 && anchor.z.abs() < 1e-9);
        assert!((-1e-9..=10.0 + 1e-9).contains(&anchor.x));
    }
}

#[test]
fn vertex_scatter_at_full_certainty_covers_each_unique_vertex_once() {
    let mut scene = Scene::new();
    let layer = scene.add_layer("Scatter");
    let face = square_face(&mut scene, 10.0);
    let reference = reference_definition(&mut scene);
    let edges: Vec<_> = (0..)
        .map(crate::scene::EdgeId)
        .take_while(|e| scene.edge(*e).is_some())
        .collect();
    assert_eq!(edges.len(), 4);

    let mut rng = StdRng::seed_from_u64(45);
    let mut status = CollectStatus::default();
    let mut ctx = ToolContext {
        rng: &mut rng,
        status: &mut status,
    };
    let params = VertexScatterParams {
        probability_percent: 100.0,
        max_rotation_deg: 360.0,
        scale_variation: 0.5,
        orientation: Orientation::Normal,
        layer,
    };
    let outcome = run_on_vertices(&mut scene, &edges, reference, &params, &mut ctx).unwrap();
    assert_eq!(outcome.placed.len(), 4);

    let corners = scene.face_loop(face).unwrap();
    for (id, corner) in outcome.placed.iter().zip(corners) {
        let anchor = scene
            .instance(*id)
            .unwrap()
            .transform
            .apply_point(Point3::ORIGIN);
        assert!(anchor.sub_point(corner).length() < 1e-9);
    }
}

#[test]
fn vertex_scatter_at_zero_certainty_places_nothing() {
    let mut scene = Scene::new();
    let layer = scene.add_layer("Scatter");
    square_face(&mut scene, 10.0);
    let reference = reference_definition(&mut scene);
    let edges: Vec<_> = (0..4).map(crate::scene::EdgeId).collect();

    let mut rng = StdRng::seed_from_u64(46);
    let mut status = CollectStatus::default();
    let mut ctx = ToolContext {
        rng: &mut rng,
        status: &mut status,
    };
    let params = VertexScatterParams {
        probability_percent: 0.0,
        max_rotation_deg: 360.0,
        scale_variation: 0.5,
        orientation: Orientation::Normal,
        layer,
    };
    let outcome = run_on_vertices(&mut scene, &edges, reference, &params, &mut ctx).unwrap();
    assert!(outcome.placed.is_empty());
    // The container still exists, just empty, mirroring how the tool works.
    assert!(scene.aggregate(outcome.container).is_some());
}
