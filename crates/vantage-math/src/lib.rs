pub mod angles;
pub mod matrix;
pub mod plane;
pub mod vector;

pub use angles::{
    az_el_from_direction, clamped_acos, direction_from_az_el, pre_acos_clamp, rotation_arc,
    wrap_degrees,
};
pub use matrix::Mat4;
pub use plane::{intersect_plane_ray, plane_through_point};
pub use vector::{Vec2, Vec3, Vec4, rotate_around_axis};
