/*
 * Planar vector helpers. Points and displacements are both plain DVec2s; the
 * engine's frame has x pointing east and y pointing south, so a positive angle
 * turns clockwise on screen.
 */

use glam::DVec2;

pub type Point = DVec2;
pub type Vector = DVec2;

// Unit vector along v, or the zero vector when v has no length (a pod sitting
// exactly on its target)
pub fn normalize_or_zero(v: Vector) -> Vector {
    let length = v.length();
    if length == 0.0 || !length.is_finite() {
        return DVec2::ZERO;
    }
    v / length
}

// Unsigned angle in radians. The dot product is clamped before acos since two
// nearly parallel unit vectors can drift just past 1.0.
pub fn angle_between(v1: Vector, v2: Vector) -> f64 {
    let n1 = normalize_or_zero(v1);
    let n2 = normalize_or_zero(v2);
    if n1 == DVec2::ZERO || n2 == DVec2::ZERO {
        return 0.0;
    }
    n1.dot(n2).clamp(-1.0, 1.0).acos()
}

// Signed angle in degrees needed to rotate `from` onto `to`, in (-180, 180]
pub fn signed_angle_degrees(from: Vector, to: Vector) -> f64 {
    if from == DVec2::ZERO || to == DVec2::ZERO {
        return 0.0;
    }
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.dot(to);
    wrap_degrees(cross.atan2(dot).to_degrees())
}

pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

pub fn normalize_heading(degrees: f64) -> f64 {
    let heading = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if heading >= 360.0 {
        0.0
    } else {
        heading
    }
}

pub fn heading_to_vector(degrees: f64) -> Vector {
    let (sin, cos) = degrees.to_radians().sin_cos();
    DVec2::new(cos, sin)
}

// Heading in [0, 360) of a displacement; None for the zero vector
pub fn vector_to_heading(v: Vector) -> Option<f64> {
    if v == DVec2::ZERO {
        return None;
    }
    Some(normalize_heading(v.y.atan2(v.x).to_degrees()))
}

pub fn truncate(v: Vector) -> Vector {
    DVec2::new(v.x.trunc(), v.y.trunc())
}

pub fn round(v: Vector) -> Vector {
    DVec2::new(v.x.round(), v.y.round())
}

// Integer coordinates as written on the wire
pub fn to_grid(v: Point) -> (i64, i64) {
    (v.x as i64, v.y as i64)
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize_or_zero(DVec2::ZERO), DVec2::ZERO);
        assert!(normalize_or_zero(DVec2::new(3.0, 4.0)).abs_diff_eq(DVec2::new(0.6, 0.8), 1e-12));
    }

    #[test]
    fn test_angle_between_parallel_vectors_is_not_nan() {
        // these normalise to a dot product a hair above 1.0 without the clamp
        let v1 = DVec2::new(0.1, 0.7);
        let v2 = DVec2::new(0.1 * 3.0, 0.7 * 3.0);
        let angle = angle_between(v1, v2);
        assert!(!angle.is_nan());
        assert!(angle.abs() < 1e-6);

        let opposite = angle_between(DVec2::X, -DVec2::X);
        assert!((opposite - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(angle_between(DVec2::ZERO, DVec2::X), 0.0);
    }

    #[test]
    fn test_signed_angle_is_clockwise_positive() {
        // east to south is a quarter turn clockwise on screen
        let angle = signed_angle_degrees(DVec2::X, DVec2::Y);
        assert!((angle - 90.0).abs() < 1e-9);
        let angle = signed_angle_degrees(DVec2::X, -DVec2::Y);
        assert!((angle + 90.0).abs() < 1e-9);
        assert_eq!(signed_angle_degrees(DVec2::ZERO, DVec2::Y), 0.0);
    }

    #[test]
    fn test_heading_conventions() {
        assert!(heading_to_vector(0.0).abs_diff_eq(DVec2::X, 1e-12));
        assert!(heading_to_vector(90.0).abs_diff_eq(DVec2::Y, 1e-12));
        assert_eq!(vector_to_heading(DVec2::new(0.0, 5.0)), Some(90.0));
        assert_eq!(vector_to_heading(DVec2::new(-1.0, 0.0)), Some(180.0));
        assert_eq!(vector_to_heading(DVec2::new(0.0, -2.0)), Some(270.0));
        assert_eq!(vector_to_heading(DVec2::ZERO), None);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert_eq!(normalize_heading(-18.0), 342.0);
        assert_eq!(normalize_heading(360.0), 0.0);
    }

    #[test]
    fn test_truncate_and_round() {
        assert_eq!(truncate(DVec2::new(85.9, -12.7)), DVec2::new(85.0, -12.0));
        assert_eq!(round(DVec2::new(99.5, -3.4)), DVec2::new(100.0, -3.0));
        assert_eq!(to_grid(DVec2::new(10.9, -3.2)), (10, -3));
    }
}
