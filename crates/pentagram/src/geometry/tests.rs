use super::*;
use crate::linalg::Rounding;
use crate::ProjPoint;
use nalgebra::{matrix, Matrix3};

fn pt(x: f64, y: f64) -> ProjPoint {
    ProjPoint::new(x, y, 1.0)
}

fn cfg() -> Rounding {
    Rounding::default()
}

fn hexagon() -> Vec<ProjPoint> {
    vec![
        pt(2.0, 0.0),
        pt(1.0, 1.5),
        pt(-1.0, 1.7),
        pt(-2.0, 0.2),
        pt(-1.0, -1.5),
        pt(1.2, -1.3),
    ]
}

fn perspective() -> Matrix3<f64> {
    matrix![1.0, 0.2, 0.1; -0.1, 0.9, 0.3; 0.05, 0.1, 1.0]
}

fn star_7_2() -> Vec<ProjPoint> {
    let p = regular_polygon(7, 1.0);
    (0..7).map(|i| p[(2 * i) % 7]).collect()
}

fn close(a: &ProjPoint, b: &ProjPoint) -> bool {
    let (a, b) = (canonical(*a), canonical(*b));
    (a - b).amax() < 1e-8
}

#[test]
fn cross_ratio_on_the_x_axis() {
    let (a, b, c, d) = (pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0), pt(3.0, 0.0));
    assert!((inverse_cross_ratio(&a, &b, &c, &d) - 0.25).abs() < 1e-12);
    // Homogeneous scale of any argument is irrelevant.
    let d_scaled = d * -3.0;
    assert!((inverse_cross_ratio(&a, &b, &c, &d_scaled) - 0.25).abs() < 1e-12);
    // Point at infinity on the same line.
    let inf = ProjPoint::new(1.0, 0.0, 0.0);
    assert!((inverse_cross_ratio(&a, &b, &c, &inf) - 0.5).abs() < 1e-12);
}

#[test]
fn point_with_cross_ratio_inverts_chi() {
    let (a, b, c) = (pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0));
    let d = point_with_cross_ratio(&a, &b, &c, 0.25);
    assert!(close(&d, &pt(3.0, 0.0)));
    let (p, q, r) = (pt(0.0, 1.0), pt(1.0, 2.0), pt(-2.0, -1.0));
    for x in [-2.0, 0.3, 1.7, 5.0] {
        let s = point_with_cross_ratio(&p, &q, &r, x);
        assert!((inverse_cross_ratio(&p, &q, &r, &s) - x).abs() < 1e-9);
    }
}

#[test]
fn intersection_of_parallel_lines_is_at_infinity() {
    let p = intersection(&pt(0.0, 0.0), &pt(1.0, 0.0), &pt(0.0, 1.0), &pt(1.0, 1.0));
    assert!(is_at_infinity(&p, cfg()));
    assert!(affine(&p, cfg()).is_err());
    let q = intersection(&pt(0.0, 0.0), &pt(1.0, 1.0), &pt(1.0, 0.0), &pt(0.0, 1.0));
    assert_eq!(q, pt(0.5, 0.5));
}

#[test]
fn corner_invariants_rebuild_the_polygon() {
    let v = hexagon();
    let x = corner_invariants(&v);
    assert_eq!(x.len(), 12);
    let rebuilt = reconstruct_from([v[0], v[1], v[2], v[3]], &x, 8).unwrap();
    for i in 0..8 {
        assert!(close(&rebuilt[i], &v[i % 6]), "vertex {i}");
    }
}

#[test]
fn corner_invariants_are_projective_invariants() {
    let v = hexagon();
    let h = perspective();
    let w: Vec<ProjPoint> = v.iter().map(|p| h * p).collect();
    for (a, b) in corner_invariants(&v).iter().zip(corner_invariants(&w)) {
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    }
}

#[test]
fn corner_pairs_of_a_window_match_the_cyclic_values() {
    let v = hexagon();
    let cyclic = corner_invariants(&v);
    let window = corner_pairs_at(&v, 2..4).unwrap();
    assert_eq!(window, cyclic[4..8].to_vec());
    assert!(corner_pairs_at(&v, 1..3).is_err());
    assert!(corner_pairs_at(&v, 2..5).is_err());
}

#[test]
fn regular_polygons_have_constant_invariants() {
    let x = corner_invariants(&regular_polygon(9, 1.0));
    for pair in x.chunks(2) {
        assert!((pair[0] - x[0]).abs() < 1e-9);
        assert!((pair[1] - x[1]).abs() < 1e-9);
    }
}

#[test]
fn unit_square_reconstruction_starts_on_the_square() {
    let x = corner_invariants(&regular_polygon(7, 1.0));
    let v = reconstruct(&x[..2], 6).unwrap();
    assert_eq!(&v[..4], &unit_square()[..]);
    assert!(reconstruct(&x[..3], 6).is_err());
}

#[test]
fn point_and_line_degeneracy() {
    let same = vec![pt(0.5, 0.5), ProjPoint::new(1.0, 1.0, 2.0), pt(0.5, 0.5)];
    assert!(is_point(&same, cfg()));
    assert!(is_linear(&same, cfg()));
    let line = vec![pt(0.0, 0.0), pt(1.0, 1.0), pt(3.0, 3.0), pt(-2.0, -2.0)];
    assert!(!is_point(&line, cfg()));
    assert!(is_linear(&line, cfg()));
    assert!(!is_linear(&hexagon(), cfg()));
}

#[test]
fn shape_predicates_on_regular_and_star_polygons() {
    let hept = regular_polygon(7, 1.0);
    assert!(is_embedded(&hept, cfg()));
    assert!(is_convex(&hept, cfg()));
    assert!(is_bird(&hept, 2, cfg()));

    let star = star_7_2();
    assert!(!is_embedded(&star, cfg()));
    assert!(!is_convex(&star, cfg()));
    assert!(!is_bird(&star, 2, cfg()));

    let bowtie = vec![pt(0.0, 0.0), pt(1.0, 1.0), pt(1.0, 0.0), pt(0.0, 1.0)];
    assert!(!is_embedded(&bowtie, cfg()));

    // Non-convex but embedded arrowhead.
    let arrow = vec![pt(0.0, 0.0), pt(2.0, 1.0), pt(0.0, 2.0), pt(0.5, 1.0)];
    assert!(is_embedded(&arrow, cfg()));
    assert!(!is_convex(&arrow, cfg()));

    let with_infinite = vec![pt(0.0, 0.0), pt(1.0, 0.0), ProjPoint::new(1.0, 1.0, 0.0)];
    assert!(!is_embedded(&with_infinite, cfg()));
}

#[test]
fn energy_is_projectively_invariant() {
    let v = regular_polygon(9, 1.0)
        .into_iter()
        .enumerate()
        .map(|(i, p)| pt(p.x * (1.0 + 0.05 * i as f64), p.y))
        .collect::<Vec<_>>();
    let h = perspective();
    let w: Vec<ProjPoint> = v.iter().map(|p| h * p).collect();
    let e1 = energy(&v, 2, 1, cfg()).unwrap();
    let e2 = energy(&w, 2, 1, cfg()).unwrap();
    assert!(e1.is_finite());
    assert!((e1 - e2).abs() < 1e-8 * e1.abs().max(1.0), "{e1} vs {e2}");
}

#[test]
fn inertia_of_a_regular_polygon_is_isotropic() {
    let v = regular_polygon(8, 2.0);
    let com = center_of_mass(&v, cfg()).unwrap();
    assert!(com.norm() < 1e-12);
    let i = inertia_matrix(&v, cfg()).unwrap();
    assert!((i[(0, 0)] - 2.0).abs() < 1e-12);
    assert!((i[(1, 1)] - 2.0).abs() < 1e-12);
    assert!(i[(0, 1)].abs() < 1e-12);
}
