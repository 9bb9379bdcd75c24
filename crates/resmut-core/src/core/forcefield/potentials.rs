/// Conversion from kcal/mol to the internal energy unit (Hartree).
pub const KCAL_TO_HARTREE: f64 = 0.0015936011;

const MIN_DISTANCE_SQ: f64 = 1e-12;

/// AMBER 12-6 van der Waals energy from a squared distance.
///
/// `well_depth` is the combined depth in internal units and `r_eq_sq` the squared
/// equilibrium distance of the pair.
#[inline]
pub fn vdw_amber_squared(dist_sq: f64, well_depth: f64, r_eq_sq: f64) -> f64 {
    if well_depth == 0.0 {
        return 0.0;
    }
    if dist_sq < MIN_DISTANCE_SQ {
        return 1e10;
    }
    let rho2 = r_eq_sq / dist_sq;
    let rho6 = rho2 * rho2 * rho2;
    well_depth * (rho6 * rho6 - 2.0 * rho6)
}

/// Electrostatic energy as `coulomb_factor / r²`.
///
/// The squared distance is consumed directly, so the interaction falls off as 1/r²
/// rather than the Coulombic 1/r.
#[inline]
pub fn electrostatic_r2_squared(dist_sq: f64, coulomb_factor: f64) -> f64 {
    if coulomb_factor == 0.0 {
        return 0.0;
    }
    if dist_sq < MIN_DISTANCE_SQ {
        return coulomb_factor.signum() * 1e10;
    }
    coulomb_factor / dist_sq
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn vdw_at_equilibrium_distance_returns_negative_well_depth() {
        let energy = vdw_amber_squared(9.0, 0.2, 9.0);
        assert!(f64_approx_equal(energy, -0.2));
    }

    #[test]
    fn vdw_with_zero_well_depth_is_zero_even_when_overlapping() {
        assert_eq!(vdw_amber_squared(0.5, 0.0, 9.0), 0.0);
    }

    #[test]
    fn vdw_is_repulsive_inside_equilibrium_distance() {
        assert!(vdw_amber_squared(4.0, 0.2, 9.0) > 0.0);
    }

    #[test]
    fn vdw_at_vanishing_distance_returns_large_positive_energy() {
        assert!(f64_approx_equal(vdw_amber_squared(0.0, 0.2, 9.0), 1e10));
    }

    #[test]
    fn vdw_magnitude_decays_beyond_equilibrium() {
        let mut previous = f64::INFINITY;
        for r in [4.0_f64, 5.0, 6.0, 8.0, 12.0] {
            let magnitude = vdw_amber_squared(r * r, 0.2, 9.0).abs();
            assert!(magnitude < previous);
            previous = magnitude;
        }
    }

    #[test]
    fn electrostatic_divides_by_squared_distance() {
        assert!(f64_approx_equal(electrostatic_r2_squared(4.0, 2.0), 0.5));
        assert!(f64_approx_equal(electrostatic_r2_squared(4.0, -2.0), -0.5));
    }

    #[test]
    fn electrostatic_with_zero_factor_is_zero() {
        assert_eq!(electrostatic_r2_squared(0.0, 0.0), 0.0);
    }

    #[test]
    fn electrostatic_at_vanishing_distance_keeps_sign() {
        assert!(f64_approx_equal(electrostatic_r2_squared(0.0, 1.0), 1e10));
        assert!(f64_approx_equal(electrostatic_r2_squared(0.0, -1.0), -1e10));
    }
}
