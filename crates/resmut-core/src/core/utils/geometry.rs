use nalgebra::{Point3, Rotation3, Unit, Vector3};

const DEGENERATE_NORM: f64 = 1e-9;

/// Shifts every point by `offset`.
pub fn translate(points: &mut [Point3<f64>], offset: &Vector3<f64>) {
    for point in points {
        *point += offset;
    }
}

/// Rotation taking the direction of `from` onto the direction of `to`.
///
/// Antiparallel inputs get a half turn about an arbitrary axis perpendicular to `from`.
/// Returns `None` when either vector has (near) zero length.
pub fn rotation_to_align(from: &Vector3<f64>, to: &Vector3<f64>) -> Option<Rotation3<f64>> {
    if from.norm() < DEGENERATE_NORM || to.norm() < DEGENERATE_NORM {
        return None;
    }
    if let Some(rotation) = Rotation3::rotation_between(from, to) {
        return Some(rotation);
    }
    let helper = if from.x.abs() < 0.9 * from.norm() {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let axis = Unit::try_new(from.cross(&helper), DEGENERATE_NORM)?;
    Some(Rotation3::from_axis_angle(&axis, std::f64::consts::PI))
}

/// Right-handed rotation of `angle_degrees` about `axis`; `None` for a zero-length axis.
pub fn rotation_from_axis_angle(axis: &Vector3<f64>, angle_degrees: f64) -> Option<Rotation3<f64>> {
    let axis = Unit::try_new(*axis, DEGENERATE_NORM)?;
    Some(Rotation3::from_axis_angle(&axis, angle_degrees.to_radians()))
}

/// Applies `rotation` to `point` about an axis passing through `origin`.
#[inline]
pub fn rotate_about_axis(
    point: &Point3<f64>,
    origin: &Point3<f64>,
    rotation: &Rotation3<f64>,
) -> Point3<f64> {
    origin + rotation * (point - origin)
}

/// Torsion angle p1-p2-p3-p4 in degrees, in (-180, 180].
///
/// Positive when p4 is reached from p1's half-plane by a right-handed turn about p2→p3.
pub fn dihedral_angle(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;
    let n2 = b2.cross(&b3);
    let y = b2.norm() * b1.dot(&n2);
    let x = b1.cross(&b2).dot(&n2);
    y.atan2(x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn points_approx_equal(a: &Point3<f64>, b: &Point3<f64>) -> bool {
        (a - b).norm() < TOLERANCE
    }

    #[test]
    fn translate_shifts_all_points() {
        let mut points = vec![Point3::origin(), Point3::new(1.0, 2.0, 3.0)];
        translate(&mut points, &Vector3::new(1.0, -1.0, 0.5));
        assert!(points_approx_equal(&points[0], &Point3::new(1.0, -1.0, 0.5)));
        assert!(points_approx_equal(&points[1], &Point3::new(2.0, 1.0, 3.5)));
    }

    #[test]
    fn rotation_to_align_maps_direction() {
        let from = Vector3::new(1.0, 0.0, 0.0);
        let to = Vector3::new(0.0, 2.0, 0.0);
        let rotation = rotation_to_align(&from, &to).unwrap();
        let mapped = rotation * from;
        assert!((mapped.normalize() - to.normalize()).norm() < TOLERANCE);
    }

    #[test]
    fn rotation_to_align_handles_antiparallel_vectors() {
        let from = Vector3::new(0.0, 0.0, 1.0);
        let to = Vector3::new(0.0, 0.0, -3.0);
        let rotation = rotation_to_align(&from, &to).unwrap();
        let mapped = rotation * from;
        assert!((mapped - Vector3::new(0.0, 0.0, -1.0)).norm() < TOLERANCE);
    }

    #[test]
    fn rotation_to_align_rejects_zero_vectors() {
        assert!(rotation_to_align(&Vector3::zeros(), &Vector3::x()).is_none());
        assert!(rotation_to_align(&Vector3::x(), &Vector3::zeros()).is_none());
    }

    #[test]
    fn rotation_from_axis_angle_rejects_zero_axis() {
        assert!(rotation_from_axis_angle(&Vector3::zeros(), 90.0).is_none());
    }

    #[test]
    fn rotate_about_axis_turns_around_offset_origin() {
        let rotation = rotation_from_axis_angle(&Vector3::z(), 90.0).unwrap();
        let origin = Point3::new(1.0, 1.0, 0.0);
        let rotated = rotate_about_axis(&Point3::new(2.0, 1.0, 5.0), &origin, &rotation);
        assert!(points_approx_equal(&rotated, &Point3::new(1.0, 2.0, 5.0)));
    }

    #[test]
    fn dihedral_angle_follows_right_hand_rule() {
        let p1 = Point3::new(1.0, 0.0, 0.0);
        let p2 = Point3::origin();
        let p3 = Point3::new(0.0, 0.0, 1.0);
        for angle in [0.0_f64, 60.0, 120.0, -45.0, -170.0, 180.0] {
            let (s, c) = angle.to_radians().sin_cos();
            let p4 = Point3::new(c, s, 1.0);
            let measured = dihedral_angle(&p1, &p2, &p3, &p4);
            assert!((measured - angle).abs() < 1e-6, "{angle} measured as {measured}");
        }
    }

    #[test]
    fn rotating_by_negative_dihedral_zeroes_it() {
        let p1 = Point3::new(1.2, -0.3, 0.1);
        let p2 = Point3::new(0.0, 0.0, 0.0);
        let p3 = Point3::new(0.2, 0.1, 1.5);
        let p4 = Point3::new(-0.8, 0.9, 2.0);
        let angle = dihedral_angle(&p1, &p2, &p3, &p4);
        let rotation = rotation_from_axis_angle(&(p3 - p2), -angle).unwrap();
        let rotated = rotate_about_axis(&p4, &p2, &rotation);
        assert!(dihedral_angle(&p1, &p2, &p3, &rotated).abs() < 1e-6);
    }
}
