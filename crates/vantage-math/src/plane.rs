use super::vector::{Vec3, Vec4};

/// Plane with unit normal `normal` passing through `point`.
pub fn plane_through_point(normal: Vec3, point: Vec3) -> Vec4 {
    let normal = normal.normalized();
    normal.extend(-point.dot(normal))
}

/// Intersects the line through `p0` and `p1` with `plane`.
///
/// The line is unbounded in both directions. Returns `None` when it runs
/// parallel to the plane.
pub fn intersect_plane_ray(plane: Vec4, p0: Vec3, p1: Vec3) -> Option<Vec3> {
    let normal = plane.xyz();
    let dir = p1 - p0;
    let dot_vd = dir.dot(normal);
    if dot_vd == 0.0 {
        return None;
    }
    let t = -(normal.dot(p0) + plane.w) / dot_vd;
    Some(p0 + dir * t)
}
