//! Property tests for the expectation estimator and density reconstruction.

use proptest::prelude::*;
use qrelay_teleport::{BlochVector, MarginalCounts, expectation, reconstruct_density};

proptest! {
    #[test]
    fn expectation_is_bounded(zeros in 0u64..10_000, ones in 0u64..10_000) {
        let e = expectation(&MarginalCounts::new(zeros, ones));
        prop_assert!((-1.0..=1.0).contains(&e));
        if zeros + ones == 0 {
            prop_assert_eq!(e, 0.0);
        }
    }

    #[test]
    fn inside_ball_is_unchanged(
        x in -1.0f64..1.0,
        y in -1.0f64..1.0,
        z in -1.0f64..1.0,
    ) {
        let r = BlochVector::new(x, y, z);
        prop_assume!(r.norm() <= 1.0);

        let back = reconstruct_density(x, y, z).bloch_vector();
        prop_assert!((back.x - x).abs() < 1e-12);
        prop_assert!((back.y - y).abs() < 1e-12);
        prop_assert!((back.z - z).abs() < 1e-12);
    }

    #[test]
    fn outside_ball_is_projected_onto_sphere(
        x in -3.0f64..3.0,
        y in -3.0f64..3.0,
        z in -3.0f64..3.0,
    ) {
        let r = BlochVector::new(x, y, z);
        prop_assume!(r.norm() > 1.0);

        let rho = reconstruct_density(x, y, z);
        let back = rho.bloch_vector();
        prop_assert!((back.norm() - 1.0).abs() < 1e-9);

        // parallel to the input
        let scale = r.norm();
        prop_assert!((back.x * scale - x).abs() < 1e-9);
        prop_assert!((back.y * scale - y).abs() < 1e-9);
        prop_assert!((back.z * scale - z).abs() < 1e-9);

        prop_assert!((rho.trace() - 1.0).abs() < 1e-12);
        prop_assert!((rho.purity() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn zero_state_roundtrip() {
    let rho = reconstruct_density(0.0, 0.0, 1.0);
    assert_eq!(rho.get(0, 0).re, 1.0);
    assert_eq!(rho.get(1, 1).re, 0.0);
    assert_eq!(rho.get(0, 1).norm(), 0.0);
}
