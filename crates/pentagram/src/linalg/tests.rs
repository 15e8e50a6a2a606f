use super::*;
use nalgebra::{dmatrix, matrix, DMatrix, Matrix2, Matrix3};
use proptest::prelude::*;

fn cfg() -> Rounding {
    Rounding::default()
}

#[test]
fn rounding_uses_ten_digits_by_default() {
    assert_eq!(round(1.234_567_891_26, 10), 1.234_567_891_3);
    assert!(cfg().is_zero(4e-11));
    assert!(!cfg().is_zero(6e-11));
    assert!(Rounding::new(3).is_zero(4e-4));
}

#[test]
fn multiply_rejects_mismatched_shapes() {
    let a = DMatrix::<f64>::zeros(2, 3);
    let b = DMatrix::<f64>::zeros(2, 2);
    assert_eq!(
        multiply(&a, &b),
        Err(crate::ProjError::Dimension {
            expected: 3,
            found: 2
        })
    );
    let c = DMatrix::<f64>::identity(3, 3);
    assert_eq!(multiply(&a, &c).unwrap().shape(), (2, 3));
}

#[test]
fn invert3x3_reports_singular_input() {
    let m = matrix![1.0, 2.0, 3.0; 2.0, 4.0, 6.0; 0.0, 1.0, 1.0];
    assert!(matches!(
        invert3x3(&m, cfg()),
        Err(crate::ProjError::SingularMatrix { .. })
    ));
    let h = matrix![2.0, 0.0, 1.0; 1.0, 3.0, 0.0; 0.0, 1.0, 1.0];
    let inv = invert3x3(&h, cfg()).unwrap();
    assert!((inv * h - Matrix3::identity()).amax() < 1e-12);
}

#[test]
fn cofactor_matches_adjugate_identity() {
    let m = matrix![1.0, 2.0, 0.5; -1.0, 0.0, 3.0; 2.0, 1.0, 1.0];
    let c = cofactor3x3(&m);
    // M · Cᵗ = det(M) · I
    let prod = m * c.transpose();
    let det = determinant3x3(&m);
    assert!((prod - Matrix3::identity() * det).amax() < 1e-12);
    assert!((det - m.determinant()).abs() < 1e-12);
}

#[test]
fn rref_reduces_known_system() {
    let a = dmatrix![
        1.0, 2.0, -1.0, -4.0;
        2.0, 3.0, -1.0, -11.0;
        -2.0, 0.0, -3.0, 22.0
    ];
    let r = solve_rref(&a, cfg());
    let expect = dmatrix![
        1.0, 0.0, 0.0, -8.0;
        0.0, 1.0, 0.0, 1.0;
        0.0, 0.0, 1.0, -2.0
    ];
    assert!((r - expect).amax() < 1e-12);
}

#[test]
fn rref_returns_partial_result_on_rank_deficiency() {
    let a = dmatrix![
        0.0, 1.0, 2.0;
        0.0, 2.0, 4.0;
        0.0, 0.0, 0.0
    ];
    let r = solve_rref(&a, cfg());
    assert_eq!(r, dmatrix![0.0, 1.0, 2.0; 0.0, 0.0, 0.0; 0.0, 0.0, 0.0]);
}

#[test]
fn spectral_decomposition_reassembles() {
    let s = matrix![2.0, 0.7; 0.7, 0.5];
    let sp = spectral_decomposition2x2(&s);
    let back = sp.q * sp.lambda() * sp.q.transpose();
    assert!((back - s).amax() < 1e-12);
    assert!((sp.q.transpose() * sp.q - Matrix2::identity()).amax() < 1e-12);
    let diag = spectral_decomposition2x2(&matrix![3.0, 0.0; 0.0, 1.0]);
    assert_eq!(diag.eigenvalues.as_slice(), &[3.0, 1.0]);
}

#[test]
fn characteristic_polynomial_of_diagonal() {
    let m = Matrix3::from_diagonal(&nalgebra::Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(characteristic_polynomial3x3(&m), [6.0, 11.0, 6.0]);
}

#[test]
fn eigenvalues_real_repeated_and_complex() {
    let m = Matrix3::from_diagonal(&nalgebra::Vector3::new(1.0, 2.0, 3.0));
    match eigenvalues3x3(&m) {
        Spectrum3::Real { values, repeated } => {
            assert!(!repeated);
            for (got, want) in values.iter().zip([3.0, 2.0, 1.0]) {
                assert!((got - want).abs() < 1e-9, "{values:?}");
            }
        }
        other => panic!("expected real spectrum, got {other:?}"),
    }

    let d = Matrix3::from_diagonal(&nalgebra::Vector3::new(2.0, 2.0, 5.0));
    match eigenvalues3x3(&d) {
        Spectrum3::Real { values, repeated } => {
            assert!(repeated);
            assert!((values[0] - 5.0).abs() < 1e-9);
            assert!((values[1] - 2.0).abs() < 1e-9);
            assert!((values[2] - 2.0).abs() < 1e-9);
        }
        other => panic!("expected repeated real spectrum, got {other:?}"),
    }

    let th: f64 = 0.7;
    let rot = matrix![th.cos(), -th.sin(), 0.0; th.sin(), th.cos(), 0.0; 0.0, 0.0, 1.0];
    match eigenvalues3x3(&rot) {
        Spectrum3::Complex { real, pair } => {
            assert!((real - 1.0).abs() < 1e-9);
            assert!((pair.re - th.cos()).abs() < 1e-9);
            assert!((pair.im - th.sin()).abs() < 1e-9);
        }
        other => panic!("expected complex pair, got {other:?}"),
    }
}

#[test]
fn l2_distance_checks_lengths() {
    assert_eq!(l2_distance(&[0.0, 3.0], &[4.0, 0.0]), Ok(5.0));
    assert!(l2_distance(&[0.0], &[0.0, 1.0]).is_err());
}

proptest! {
    #[test]
    fn invert2x2_then_multiply_rounds_to_identity(
        a in -10.0f64..10.0, b in -10.0f64..10.0,
        c in -10.0f64..10.0, d in -10.0f64..10.0,
    ) {
        let m = Matrix2::new(a, b, c, d);
        prop_assume!(determinant2x2(&m).abs() > 0.1);
        let inv = invert2x2(&m, cfg()).unwrap();
        let prod = multiply(
            &DMatrix::from_column_slice(2, 2, inv.as_slice()),
            &DMatrix::from_column_slice(2, 2, m.as_slice()),
        ).unwrap();
        let rounded = prod.map(|x| cfg().round(x));
        prop_assert_eq!(rounded, DMatrix::<f64>::identity(2, 2));
    }

    #[test]
    fn rref_is_idempotent(
        rows in 2usize..5,
        cols in 2usize..6,
        entries in proptest::collection::vec(-4i32..=4, 30),
    ) {
        let a = DMatrix::from_fn(rows, cols, |i, j| entries[i * cols + j] as f64);
        let once = solve_rref(&a, cfg());
        let twice = solve_rref(&once, cfg());
        prop_assert_eq!(once, twice);
    }
}
