use approx::assert_relative_eq;

use super::*;
use crate::field::F64Field;
use crate::linalg::LinalgError;
use crate::nodes;

fn grid_for(l: usize, k: usize) -> (Mesh<f64>, CollocationGrid<f64>) {
    let mesh = Mesh::uniform(l, &0.0_f64, &1.0).unwrap();
    let rho = nodes::gauss_legendre(k, &F64Field).unwrap();
    let grid = CollocationGrid::new(&mesh, &rho);
    (mesh, grid)
}

// ======================== tau table and mu-cache ========================

#[test]
fn taus_are_strictly_increasing_inside_the_mesh() {
    let (mesh, grid) = grid_for(4, 3);
    let taus = grid.taus();
    assert_eq!(taus.len(), 4 * 3);
    for w in taus.windows(2) {
        assert!(w[0] < w[1]);
    }
    assert!(taus[0] > *mesh.start() && taus[taus.len() - 1] < *mesh.end());
}

#[test]
fn mu_entries_lie_in_the_open_unit_interval() {
    let (_, grid) = grid_for(3, 4);
    for i in 0..3 {
        for j in 1..=4 {
            for r in 1..=5 {
                let m = grid.mu_pow(i, j, r, false);
                assert!(m > 0.0 && m < 1.0, "mu^{r} = {m} out of (0,1)");
            }
        }
    }
}

#[test]
fn mirror_identity() {
    let (_, grid) = grid_for(3, 4);
    for i in 0..3 {
        for j in 1..=4 {
            let direct = grid.mu_pow(i, j, 1, false);
            let inverse = grid.mu_pow(i, j, 1, true);
            assert_relative_eq!(direct + inverse, 1.0, epsilon = 1e-15);
        }
    }
}

#[test]
fn powers_multiply_up_from_the_base() {
    let (_, grid) = grid_for(2, 5);
    for j in 1..=5 {
        let base = grid.mu_pow(1, j, 1, false);
        for r in 2..=6 {
            assert_relative_eq!(grid.mu_pow(1, j, r, false), base.powi(r), max_relative = 1e-12);
        }
    }
}

#[test]
fn reciprocal_exponent() {
    let (_, grid) = grid_for(2, 2);
    let base = grid.mu_pow(0, 1, 1, false);
    assert_eq!(grid.mu_pow(0, 1, -1, false), base.recip());
    assert_eq!(grid.mu_pow(0, 1, 0, false), 1.0);
}

#[test]
fn tau_matches_the_affine_map() {
    let (mesh, grid) = grid_for(4, 2);
    let rho = nodes::gauss_legendre(2, &F64Field).unwrap();
    for i in 0..4 {
        for j in 1..=2 {
            let mid = (mesh.knot(i) + mesh.knot(i + 1)) / 2.0;
            let half = (mesh.knot(i + 1) - mesh.knot(i)) / 2.0;
            assert_relative_eq!(*grid.tau(i, j), mid + half * rho[j - 1], max_relative = 1e-15);
        }
    }
}

#[test]
#[should_panic(expected = "exponent")]
fn mu_cache_rejects_absurd_exponent() {
    let (_, grid) = grid_for(2, 2);
    grid.mu_pow(0, 1, 4, false);
}

#[test]
#[should_panic(expected = "out of range")]
fn mu_cache_rejects_absurd_local_index() {
    let (_, grid) = grid_for(2, 2);
    grid.mu_pow(0, 3, 1, false);
}

// ======================== driver ========================

#[test]
fn rejects_zero_collocation_points() {
    let mesh = Mesh::uniform(2, &0.0_f64, &1.0).unwrap();
    let err = solve_collocation(0, &mesh, &1.0, &0.0, &0.0, |_: &f64| 0.0, |_: &f64| 0.0, |_: &f64| 1.0)
        .unwrap_err();
    assert_eq!(err, CollocationError::InvalidOrder);
}

#[cfg(feature = "rug")]
#[test]
fn rejects_mixed_precision_inputs() {
    use crate::field::{MpField, RealField};

    let coarse = MpField::decimal(30);
    let fine = MpField::decimal(60);
    let mesh = Mesh::uniform(2, &fine.zero(), &fine.one()).unwrap();
    let err = solve_collocation(
        1,
        &mesh,
        &coarse.one(),
        &fine.zero(),
        &fine.zero(),
        |x| x.clone(),
        |x| x.clone(),
        |x| x.clone(),
    )
    .unwrap_err();
    assert_eq!(err, CollocationError::PrecisionMismatch);
}

#[test]
fn zero_operator_is_reported_singular() {
    // eps = 0, p = q = 0 collapses every collocation row to zero.
    let mesh = Mesh::uniform(2, &0.0_f64, &1.0).unwrap();
    let err = solve_collocation(2, &mesh, &0.0, &0.0, &0.0, |_: &f64| 0.0, |_: &f64| 0.0, |_: &f64| 1.0)
        .unwrap_err();
    assert_eq!(err, CollocationError::Linalg(LinalgError::Singular));
}

// y'' = 2, y(0) = y(1) = 0: exact solution x^2 - x, representable exactly
// by quadratic segments, which makes it a sharp check of the k = 1 layout.
#[test]
fn k1_layout_reproduces_a_quadratic() {
    let mesh = Mesh::uniform(3, &0.0_f64, &1.0).unwrap();
    let g = solve_collocation(1, &mesh, &-1.0, &0.0, &0.0, |_: &f64| 0.0, |_: &f64| 0.0, |_: &f64| 2.0)
        .unwrap();
    assert_eq!(g.intervals(), 3);
    for i in 0..=12 {
        let x = i as f64 / 12.0;
        assert_relative_eq!(g.value(&x), x * x - x, epsilon = 1e-12);
    }
    // C0 and C1 at the two interior knots, checked from both sides.
    for i in 1..3 {
        let knot = *g.knots().get(i).unwrap();
        let left = &g.segments()[i - 1];
        let right = &g.segments()[i];
        assert_relative_eq!(left.value(&knot), right.value(&knot), epsilon = 1e-12);
        assert_relative_eq!(
            left.derivative(&knot, 1),
            right.derivative(&knot, 1),
            epsilon = 1e-11
        );
    }
}

#[test]
fn k1_single_interval_layout() {
    let mesh = Mesh::uniform(1, &0.0_f64, &1.0).unwrap();
    let g = solve_collocation(1, &mesh, &-1.0, &0.0, &0.0, |_: &f64| 0.0, |_: &f64| 0.0, |_: &f64| 2.0)
        .unwrap();
    assert_relative_eq!(g.value(&0.5), -0.25, epsilon = 1e-13);
}

// -y'' - y' + 3y = e^x with u = e^x: exercises a nonzero convection term
// through every column of the collocation rows.
#[test]
fn convection_term_signs_are_consistent() {
    let mesh = Mesh::uniform(4, &0.0_f64, &1.0).unwrap();
    let e = 1.0_f64.exp();
    let g = solve_collocation(
        4,
        &mesh,
        &1.0,
        &0.0,
        &e,
        |_: &f64| 1.0,
        |_: &f64| 3.0,
        |x: &f64| x.exp(),
    )
    .unwrap();

    // Boundary values are hard constraints.
    assert_relative_eq!(g.value(&0.0), 1.0, epsilon = 1e-12);
    assert_relative_eq!(g.value(&1.0), e, epsilon = 1e-12);

    // Nodal errors sit at the superconvergence order, far below the f64
    // interpolation error elsewhere.
    for knot in g.knots() {
        assert_relative_eq!(g.value(knot), knot.exp(), epsilon = 1e-8);
    }

    // The residual -eps*g'' - p*g' + q*g - f vanishes at the collocation
    // points up to solver roundoff.
    let rho = nodes::gauss_legendre(4, &F64Field).unwrap();
    let grid = CollocationGrid::new(&mesh, &rho);
    for tau in grid.taus() {
        let residual =
            -g.derivative(tau, 2) - g.derivative(tau, 1) + 3.0 * g.value(tau) - tau.exp();
        assert!(residual.abs() < 1e-9, "residual {residual:e} at tau = {tau}");
    }

    // Global C1 continuity at the interior knots.
    for i in 1..4 {
        let knot = g.knots()[i];
        let left = &g.segments()[i - 1];
        let right = &g.segments()[i];
        assert_relative_eq!(left.value(&knot), right.value(&knot), epsilon = 1e-11);
        assert_relative_eq!(
            left.derivative(&knot, 1),
            right.derivative(&knot, 1),
            epsilon = 1e-9
        );
    }
}

#[test]
fn classical_sign_convention_via_negative_epsilon() {
    // y'' - 4y = 4*cosh(1) with y(0) = y(1) = 0: u = cosh(2x-1) - cosh(1).
    let mesh = Mesh::uniform(4, &0.0_f64, &1.0).unwrap();
    let f = 4.0 * 1.0_f64.cosh();
    let g = solve_collocation(
        3,
        &mesh,
        &-1.0,
        &0.0,
        &0.0,
        |_: &f64| 0.0,
        |_: &f64| -4.0,
        move |_: &f64| f,
    )
    .unwrap();
    // Mesh points enjoy the superconvergence order 2k...
    for knot in g.knots() {
        let u = (2.0 * knot - 1.0).cosh() - 1.0_f64.cosh();
        assert_relative_eq!(g.value(knot), u, epsilon = 1e-4);
    }
    // ...while generic points see the plain interpolation order k+2.
    for i in 0..8 {
        let x = i as f64 / 8.0 + 1.0 / 16.0;
        let u = (2.0 * x - 1.0).cosh() - 1.0_f64.cosh();
        assert_relative_eq!(g.value(&x), u, epsilon = 1e-2);
    }
}
