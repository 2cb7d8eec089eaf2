use super::vector::{DEGENERATE_LENGTH, Vec2, Vec3, rotate_around_axis};

/// Largest drift outside the clamp range still attributed to float noise.
pub const GROSS_CLAMP_DRIFT: f64 = 1.0;

/// Clamps `value` into `[min, max]` ahead of an `acos`.
///
/// Dot products of unit vectors drift slightly outside `[-1, 1]`; that is
/// clamped silently. A drift larger than [`GROSS_CLAMP_DRIFT`] means a caller
/// passed vectors that were never normalized, and panics.
pub fn pre_acos_clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        assert!(
            min - value <= GROSS_CLAMP_DRIFT,
            "gross clamping error: {value} below {min}"
        );
        min
    } else if value > max {
        assert!(
            value - max <= GROSS_CLAMP_DRIFT,
            "gross clamping error: {value} above {max}"
        );
        max
    } else {
        value
    }
}

pub fn clamped_acos(cos: f64) -> f64 {
    pre_acos_clamp(cos, -1.0, 1.0).acos()
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Builds a view `(dir, up)` pair looking at the origin from azimuth
/// `az_el.x` and elevation `az_el.y`, both in degrees.
///
/// Starts from `dir = -X, up = +Z`, tilts by the elevation about Y, then turns
/// by the azimuth about Z.
pub fn direction_from_az_el(az_el: Vec2) -> (Vec3, Vec3) {
    let mut dir = -Vec3::X;
    let mut up = Vec3::Z;

    let elevation = (-az_el.y).to_radians();
    dir = rotate_around_axis(dir, Vec3::ZERO, Vec3::Y, elevation);
    up = rotate_around_axis(up, Vec3::ZERO, Vec3::Y, elevation);

    let azimuth = az_el.x.to_radians();
    dir = rotate_around_axis(dir, Vec3::ZERO, Vec3::Z, azimuth);
    up = rotate_around_axis(up, Vec3::ZERO, Vec3::Z, azimuth);

    (dir, up)
}

/// Azimuth of `dir` measured from +X toward +Y in `[0, 360)`, and its
/// depression below the XY plane (positive when pointing down), in degrees.
///
/// A vertical `dir` has no azimuth; it reports 0 and an elevation of +/-90.
pub fn az_el_from_direction(dir: Vec3) -> Vec2 {
    let dir = dir.normalized();
    let right = dir.cross(Vec3::Z);
    let Some(in_plane) = Vec3::Z.cross(right).try_normalized() else {
        let elevation = if dir.z >= 0.0 { -90.0 } else { 90.0 };
        return Vec2::new(0.0, elevation);
    };

    let mut azimuth = clamped_acos(in_plane.dot(Vec3::X));
    if in_plane.dot(Vec3::Y) < 0.0 {
        azimuth = std::f64::consts::TAU - azimuth;
    }

    let mut elevation = clamped_acos(dir.dot(in_plane));
    if dir.dot(Vec3::Z) >= 0.0 {
        elevation = -elevation;
    }

    Vec2::new(wrap_degrees(azimuth.to_degrees()), elevation.to_degrees())
}

/// Axis and angle of the shortest rotation taking `from` onto `to`.
///
/// Opposite vectors rotate half a turn about any axis perpendicular to
/// `from`. Returns `None` if either input has no direction.
pub fn rotation_arc(from: Vec3, to: Vec3) -> Option<(Vec3, f64)> {
    let from = from.try_normalized()?;
    let to = to.try_normalized()?;
    let angle = clamped_acos(from.dot(to));

    if let Some(axis) = from.cross(to).try_normalized() {
        return Some((axis, angle));
    }
    if from.dot(to) > 0.0 {
        return Some((Vec3::Z, 0.0));
    }

    let mut axis = from.cross(Vec3::X);
    if axis.length() <= DEGENERATE_LENGTH.sqrt() {
        axis = from.cross(Vec3::Y);
    }
    Some((axis.normalized(), std::f64::consts::PI))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_passes_small_drift() {
        assert_eq!(pre_acos_clamp(1.0 + 1.0e-12, -1.0, 1.0), 1.0);
        assert_eq!(pre_acos_clamp(-1.0 - 1.0e-12, -1.0, 1.0), -1.0);
        assert_eq!(pre_acos_clamp(0.25, -1.0, 1.0), 0.25);
    }

    #[test]
    #[should_panic(expected = "gross clamping error")]
    fn clamp_rejects_gross_drift() {
        pre_acos_clamp(2.5, -1.0, 1.0);
    }

    #[test]
    fn wrap_keeps_range() {
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
    }
}
