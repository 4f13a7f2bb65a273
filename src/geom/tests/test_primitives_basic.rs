use crate::geom::{
    Line3, Plane, Point3, PointClassification, Tolerance, Vec3, classify_point_in_polygon,
};

fn unit_square() -> Vec<Point3> {
    vec![
        Point3::ORIGIN,
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]
}

#[test]
fn plane_from_a_flat_polygon_recovers_the_normal() {
    let plane = Plane::from_polygon(&unit_square()).unwrap();
    assert!((plane.normal.dot(Vec3::Z).abs() - 1.0).abs() < 1e-9);
    assert!(plane.signed_distance(Point3::new(0.3, 0.7, 0.0)).abs() < 1e-9);
}

#[test]
fn plane_from_a_degenerate_loop_is_rejected() {
    assert!(Plane::from_polygon(&[Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0)]).is_none());
    let collinear = [
        Point3::ORIGIN,
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
    ];
    assert!(Plane::from_polygon(&collinear).is_none());
}

#[test]
fn projection_lands_on_the_plane() {
    let plane = Plane::new(Point3::new(0.0, 0.0, 2.0), Vec3::Z);
    let p = plane.project(Point3::new(3.0, -1.0, 7.0));
    assert!((p.z - 2.0).abs() < 1e-12);
    assert!((p.x - 3.0).abs() < 1e-12);
    assert!((p.y + 1.0).abs() < 1e-12);
}

#[test]
fn line_projection_parameter_maps_endpoints_to_zero_and_one() {
    let line = Line3::new(Point3::ORIGIN, Point3::new(2.0, 0.0, 0.0));
    assert!((line.project_parameter(Point3::ORIGIN).unwrap()).abs() < 1e-12);
    assert!((line.project_parameter(Point3::new(2.0, 0.0, 0.0)).unwrap() - 1.0).abs() < 1e-12);
    assert!((line.project_parameter(Point3::new(1.0, 5.0, 0.0)).unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn degenerate_segment_has_no_projection() {
    let line = Line3::new(Point3::ORIGIN, Point3::ORIGIN);
    assert!(line.project(Point3::new(1.0, 1.0, 1.0)).is_none());
}

#[test]
fn segment_containment_respects_the_finite_extent() {
    let line = Line3::new(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0));
    let tol = Tolerance::default_geom();
    assert!(line.contains_projected(Point3::new(0.5, 0.0, 0.0), tol));
    assert!(line.contains_projected(Point3::new(1.0, 0.0, 0.0), tol));
    assert!(!line.contains_projected(Point3::new(1.5, 0.0, 0.0), tol));
    assert!(!line.contains_projected(Point3::new(-0.5, 0.0, 0.0), tol));
}

#[test]
fn classification_distinguishes_inside_boundary_and_outside() {
    let square = unit_square();
    let tol = Tolerance::default_geom();
    assert_eq!(
        classify_point_in_polygon(Point3::new(0.5, 0.5, 0.0), &square, Vec3::Z, tol),
        PointClassification::Inside
    );
    assert_eq!(
        classify_point_in_polygon(Point3::new(0.5, 0.0, 0.0), &square, Vec3::Z, tol),
        PointClassification::OnBoundary
    );
    assert_eq!(
        classify_point_in_polygon(Point3::new(1.0, 1.0, 0.0), &square, Vec3::Z, tol),
        PointClassification::OnBoundary
    );
    assert_eq!(
        classify_point_in_polygon(Point3::new(1.5, 0.5, 0.0), &square, Vec3::Z, tol),
        PointClassification::Outside
    );
}

#[test]
fn classification_works_on_a_vertical_face() {
    // Square in the XZ plane; the Y axis is dropped during projection.
    let wall = [
        Point3::ORIGIN,
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, 1.0),
    ];
    let tol = Tolerance::default_geom();
    assert_eq!(
        classify_point_in_polygon(Point3::new(0.4, 0.0, 0.6), &wall, Vec3::Y, tol),
        PointClassification::Inside
    );
    assert_eq!(
        classify_point_in_polygon(Point3::new(0.4, 0.0, 1.6), &wall, Vec3::Y, tol),
        PointClassification::Outside
    );
}

#[test]
fn classification_handles_a_concave_polygon() {
    // L-shape: the notch at (0.5..1.0, 0.5..1.0) is outside.
    let l_shape = [
        Point3::ORIGIN,
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 0.5, 0.0),
        Point3::new(0.5, 0.5, 0.0),
        Point3::new(0.5, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let tol = Tolerance::default_geom();
    assert_eq!(
        classify_point_in_polygon(Point3::new(0.25, 0.75, 0.0), &l_shape, Vec3::Z, tol),
        PointClassification::Inside
    );
    assert_eq!(
        classify_point_in_polygon(Point3::new(0.75, 0.75, 0.0), &l_shape, Vec3::Z, tol),
        PointClassification::Outside
    );
}
