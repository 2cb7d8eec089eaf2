use std::f64::consts::TAU;

use tracing::{debug, warn};
use vantage_base::{Result, Tolerance};
use vantage_math::{
    Mat4, Vec2, Vec3, Vec4, az_el_from_direction, clamped_acos, direction_from_az_el,
    rotate_around_axis, rotation_arc, wrap_degrees,
};

use crate::bounds::BoundingSphere;
use crate::event::CameraEvent;
use crate::gesture::GestureKind;
use crate::settings::ManipulationSettings;
use crate::view_state::ViewState;

/// Vertical field of view restored by [`CameraModel::fit_to_screen`].
pub const DEFAULT_FOV_Y: f64 = 30.0;
/// Smallest view distance a dolly step may reach before pressure builds.
pub const DOLLY_DISTANCE_FLOOR: f64 = 1.0;

const DEFAULT_VIEW_DISTANCE: f64 = 20.0;
const PERSPECTIVE_NEAR_FALLBACK_RATIO: f64 = 2000.0;

/// The authoritative camera: a view basis plus projection parameters and
/// the interaction state of the gesture in progress.
///
/// The eye is never stored; it is always `center - dir * distance`.
#[derive(Clone, Debug)]
pub struct CameraModel {
    pub(crate) view_up: Vec3,
    pub(crate) view_dir: Vec3,
    pub(crate) view_center: Vec3,
    pub(crate) view_distance: f64,
    pub(crate) fov_y: f64,
    pub(crate) aspect: f64,
    pub(crate) ortho: bool,
    pub(crate) ortho_bottom: f64,
    pub(crate) ortho_top: f64,
    pub(crate) settings: ManipulationSettings,
    pub(crate) bound: Option<BoundingSphere>,
    pub(crate) active_gesture: Option<GestureKind>,
    pub(crate) starting_ndc: Vec2,
    pub(crate) pan_plane: Option<Vec4>,
    pub(crate) dolly_pressure: u32,
    stashed_view: Option<String>,
    cull_mask: u32,
    events: Vec<CameraEvent>,
}

impl Default for CameraModel {
    fn default() -> Self {
        Self::with_settings(ManipulationSettings::default())
    }
}

impl CameraModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ManipulationSettings) -> Self {
        Self {
            view_up: Vec3::Z,
            view_dir: Vec3::Y,
            view_center: Vec3::ZERO,
            view_distance: DEFAULT_VIEW_DISTANCE,
            fov_y: DEFAULT_FOV_Y,
            aspect: 1.0,
            ortho: false,
            ortho_bottom: 0.0,
            ortho_top: 0.0,
            settings,
            bound: None,
            active_gesture: None,
            starting_ndc: Vec2::ZERO,
            pan_plane: None,
            dolly_pressure: 0,
            stashed_view: None,
            cull_mask: u32::MAX,
            events: Vec::new(),
        }
    }

    pub fn view_up(&self) -> Vec3 {
        self.view_up
    }

    pub fn view_dir(&self) -> Vec3 {
        self.view_dir
    }

    pub fn view_center(&self) -> Vec3 {
        self.view_center
    }

    pub fn view_distance(&self) -> f64 {
        self.view_distance
    }

    /// Vertical field of view in degrees.
    pub fn fov_y(&self) -> f64 {
        self.fov_y
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn is_ortho(&self) -> bool {
        self.ortho
    }

    pub fn ortho_bottom(&self) -> f64 {
        self.ortho_bottom
    }

    pub fn ortho_top(&self) -> f64 {
        self.ortho_top
    }

    pub fn settings(&self) -> &ManipulationSettings {
        &self.settings
    }

    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        self.bound
    }

    pub fn cull_mask(&self) -> u32 {
        self.cull_mask
    }

    pub fn dolly_pressure(&self) -> u32 {
        self.dolly_pressure
    }

    /// Drains queued notifications in the order they were raised.
    pub fn take_events(&mut self) -> Vec<CameraEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn notify_changed(&mut self) {
        self.events.push(CameraEvent::Changed);
    }

    // Configuration

    pub fn set_settings(&mut self, settings: ManipulationSettings) {
        self.settings = settings;
        self.notify_changed();
    }

    pub fn set_bounding_sphere(&mut self, bound: Option<BoundingSphere>) {
        if self.bound == bound {
            return;
        }
        self.bound = bound;
        self.notify_changed();
    }

    pub fn set_fov_y_scale_factor(&mut self, factor: f64) {
        if !(factor > 1.0) || !factor.is_finite() {
            debug!(factor, "ignoring fov scale factor outside (1, inf)");
            return;
        }
        self.settings.fov_y_scale_factor = factor;
        self.notify_changed();
    }

    /// Sets the clamp policy and pulls the current FOV into range.
    pub fn set_clamp_fov_y_scale(&mut self, clamp: bool, min: f64, max: f64) {
        self.settings.clamp_fov_y = clamp;
        self.settings.fov_y_range.min = min.min(max);
        self.settings.fov_y_range.max = max.max(min);
        if let Some(range) = self.settings.fov_y_clamp() {
            self.fov_y = range.clamp(self.fov_y);
        }
        self.notify_changed();
    }

    pub fn set_trackball_roll_sensitivity(&mut self, sensitivity: f64) {
        self.settings.trackball_roll_sensitivity = sensitivity;
        self.notify_changed();
    }

    pub fn set_dolly_can_change_center(&mut self, enabled: bool) {
        self.settings.dolly_can_change_center = enabled;
        self.notify_changed();
    }

    pub fn set_dolly_center_change_threshold(&mut self, threshold: u32) {
        self.settings.dolly_center_change_threshold = threshold;
        self.notify_changed();
    }

    pub fn set_cull_mask(&mut self, mask: u32) {
        self.cull_mask = mask;
        self.events.push(CameraEvent::CullMaskChanged(mask));
    }

    pub fn set_cull_mask_bits(&mut self, bits: u32) {
        self.set_cull_mask(self.cull_mask | bits);
    }

    pub fn clear_cull_mask_bits(&mut self, bits: u32) {
        self.set_cull_mask(self.cull_mask & !bits);
    }

    // Basis setters

    pub fn set_view_up(&mut self, up: Vec3) {
        if up == self.view_up {
            return;
        }
        if let Some((axis, angle)) = rotation_arc(self.view_up, up) {
            self.view_dir = rotate_around_axis(self.view_dir, Vec3::ZERO, axis, angle);
        }
        self.view_up = up;
        self.orthonormalize();
        self.notify_changed();
    }

    pub fn set_view_dir(&mut self, dir: Vec3) {
        if dir == self.view_dir {
            return;
        }
        if dir.try_normalized().is_none() {
            debug!(?dir, "ignoring degenerate view direction");
            return;
        }
        if let Some((axis, angle)) = rotation_arc(self.view_dir, dir) {
            self.view_up = rotate_around_axis(self.view_up, Vec3::ZERO, axis, angle);
        }
        self.view_dir = dir;
        self.orthonormalize();
        self.notify_changed();
    }

    pub fn set_up_and_dir(&mut self, up: Vec3, dir: Vec3) {
        if dir.try_normalized().is_none() {
            debug!(?dir, "ignoring degenerate view direction");
            return;
        }
        self.view_up = up;
        self.view_dir = dir;
        self.orthonormalize();
        self.notify_changed();
    }

    /// Moves the center while the eye stays put; the camera turns to look
    /// at the new center and the distance becomes `|center - eye|`.
    ///
    /// Keeping `dir` and recomputing only the distance would instead move
    /// the eye whenever the new center is off the view axis.
    pub fn set_view_center(&mut self, center: Vec3) {
        if center == self.view_center {
            return;
        }
        let eye = self.eye_position();
        let (dir, distance) = (center - eye).normalize_with_length();
        if distance == 0.0 {
            debug!(?center, "view center coincides with the eye; ignoring");
            return;
        }
        self.carry_up_to(dir);
        self.view_center = center;
        self.view_distance = distance;
        self.notify_changed();
    }

    pub fn set_view_distance(&mut self, distance: f64) {
        if distance == self.view_distance {
            return;
        }
        if !(distance > 0.0) || !distance.is_finite() {
            debug!(distance, "ignoring non-positive view distance");
            return;
        }
        self.view_distance = distance;
        self.notify_changed();
    }

    pub fn set_fov_y(&mut self, fov_y: f64) {
        let fov_y = match self.settings.fov_y_clamp() {
            Some(range) => range.clamp(fov_y),
            None => fov_y,
        };
        if fov_y == self.fov_y {
            return;
        }
        self.fov_y = fov_y;
        self.notify_changed();
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        if aspect == self.aspect {
            return;
        }
        if !(aspect > 0.0) || !aspect.is_finite() {
            debug!(aspect, "ignoring non-positive aspect ratio");
            return;
        }
        self.aspect = aspect;
        self.notify_changed();
    }

    /// Switching to ortho with empty extents sizes them to match what the
    /// perspective view shows at the center.
    pub fn set_ortho(&mut self, ortho: bool) {
        if ortho == self.ortho {
            return;
        }
        self.ortho = ortho;
        if ortho && !has_ortho_extent(self.ortho_bottom, self.ortho_top) {
            self.ortho_top = (self.fov_y.to_radians() * 0.5).tan() * self.view_distance;
            self.ortho_bottom = -self.ortho_top;
            debug!(top = self.ortho_top, "derived ortho extents from the field of view");
        }
        self.notify_changed();
    }

    pub fn set_ortho_extents(&mut self, bottom: f64, top: f64) {
        self.ortho_bottom = bottom;
        self.ortho_top = top;
        self.notify_changed();
    }

    // Derived representations

    pub fn eye_position(&self) -> Vec3 {
        self.view_center - self.view_dir * self.view_distance
    }

    /// Places the eye at `eye`, keeping the center fixed.
    pub fn set_eye_position(&mut self, eye: Vec3) {
        let (dir, distance) = (self.view_center - eye).normalize_with_length();
        if distance == 0.0 {
            debug!(?eye, "eye coincides with the view center; ignoring");
            return;
        }
        if distance == self.view_distance && dir == self.view_dir {
            return;
        }
        self.carry_up_to(dir);
        self.view_distance = distance;
        self.notify_changed();
    }

    /// Rigid transform from camera space to world space. Columns are
    /// right, up, back (`-dir`) and the eye.
    pub fn camera_to_world(&self) -> Mat4 {
        let right = self.view_dir.cross(self.view_up);
        Mat4::from_cols(
            right.extend(0.0),
            self.view_up.extend(0.0),
            (-self.view_dir).extend(0.0),
            self.eye_position().extend(1.0),
        )
    }

    /// World-to-camera transform: the inverse of [`Self::camera_to_world`].
    pub fn view_matrix(&self) -> Mat4 {
        let right = self.view_dir.cross(self.view_up);
        let back = -self.view_dir;
        let eye = self.eye_position();
        Mat4::from_rows([
            [right.x, right.y, right.z, -right.dot(eye)],
            [self.view_up.x, self.view_up.y, self.view_up.z, -self.view_up.dot(eye)],
            [back.x, back.y, back.z, -back.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Near and far clip distances derived from the scene bound.
    pub fn clip_planes(&self) -> Option<(f64, f64)> {
        self.bound.map(|bound| self.clip_planes_for(&bound))
    }

    pub(crate) fn clip_planes_for(&self, bound: &BoundingSphere) -> (f64, f64) {
        let eye_to_center = (bound.center - self.eye_position()).length();
        let radius = bound.effective_radius();
        if self.ortho {
            return (eye_to_center - radius, eye_to_center + radius);
        }
        let near = eye_to_center - radius;
        let far = near + 2.0 * radius;
        if near < 0.0 {
            (far / PERSPECTIVE_NEAR_FALLBACK_RATIO, far)
        } else {
            (near, far)
        }
    }

    /// Identity when no bound has been set.
    pub fn projection_matrix(&self) -> Mat4 {
        match self.bound {
            Some(bound) => self.projection_for(&bound),
            None => {
                warn!("projection requested without a bounding volume; using identity");
                Mat4::IDENTITY
            }
        }
    }

    pub(crate) fn projection_for(&self, bound: &BoundingSphere) -> Mat4 {
        let (near, far) = self.clip_planes_for(bound);
        if self.ortho {
            if !has_ortho_extent(self.ortho_bottom, self.ortho_top) {
                warn!(
                    bottom = self.ortho_bottom,
                    top = self.ortho_top,
                    "empty ortho extents; using identity projection"
                );
                return Mat4::IDENTITY;
            }
            let right = self.aspect * (self.ortho_top - self.ortho_bottom) * 0.5;
            Mat4::ortho(-right, right, self.ortho_bottom, self.ortho_top, near, far)
        } else {
            Mat4::perspective(self.fov_y, self.aspect, near, far)
        }
    }

    /// Yaw, pitch and roll in degrees relative to world +Z up and +X north.
    ///
    /// Looking straight up or down, yaw is read from the up vector and roll
    /// is reported as zero.
    pub fn yaw_pitch_roll(&self) -> Vec3 {
        let dir = self.view_dir;
        let up = self.view_up;
        let dir_x_base_up = dir.cross(Vec3::Z);

        let projected_dir = Vec3::Z.cross(dir_x_base_up).try_normalized().or_else(|| {
            let heading = if dir.z < 0.0 { up } else { -up };
            Vec3::new(heading.x, heading.y, 0.0).try_normalized()
        });
        let yaw = projected_dir.map_or(0.0, |projected| {
            let mut yaw = clamped_acos(projected.dot(Vec3::X));
            if projected.dot(-Vec3::Y) > 0.0 {
                yaw = TAU - yaw;
            }
            yaw
        });

        let mut pitch = clamped_acos(up.dot(Vec3::Z).abs());
        if dir.dot(Vec3::Z) < 0.0 {
            pitch = -pitch;
        }

        let roll = dir_x_base_up
            .cross(dir)
            .try_normalized()
            .map_or(0.0, |projected_up| {
                let right = dir.cross(projected_up);
                let mut roll = clamped_acos(projected_up.dot(up));
                if up.dot(right) > 0.0 {
                    roll = TAU - roll;
                }
                roll
            });

        Vec3::new(
            wrap_degrees(yaw.to_degrees()),
            pitch.to_degrees(),
            wrap_degrees(roll.to_degrees()),
        )
    }

    /// Azimuth and elevation of the view, in the convention accepted by
    /// [`Self::set_view_dir_from_az_el`].
    pub fn az_el(&self) -> Vec2 {
        let raw = az_el_from_direction(self.view_dir);
        Vec2::new(wrap_degrees(raw.x - 180.0), raw.y)
    }

    pub fn set_view_dir_from_az_el(&mut self, az_el: Vec2) {
        let (dir, up) = direction_from_az_el(az_el);
        self.view_dir = dir;
        self.view_up = up;
        self.orthonormalize();
        self.notify_changed();
    }

    /// Restores `dir` and `up` to unit length and mutual orthogonality,
    /// keeping `dir` and re-deriving `up`.
    pub fn orthonormalize(&mut self) {
        let Some(dir) = self.view_dir.try_normalized() else {
            debug!(dir = ?self.view_dir, "degenerate view direction; basis left as is");
            return;
        };
        let up = dir
            .cross(self.view_up)
            .cross(dir)
            .try_normalized()
            .unwrap_or_else(|| {
                debug!(up = ?self.view_up, "view up parallel to direction; using world up");
                default_up(dir)
            });
        self.view_dir = dir;
        self.view_up = up;
    }

    pub(crate) fn is_orthonormal(&self) -> bool {
        let tolerance = Tolerance::default();
        tolerance.linear_eq(self.view_dir.length(), 1.0)
            && tolerance.linear_eq(self.view_up.length(), 1.0)
            && tolerance.angular_eq(self.view_dir.dot(self.view_up), 0.0)
    }

    fn carry_up_to(&mut self, dir: Vec3) {
        if let Some((axis, angle)) = rotation_arc(self.view_dir, dir) {
            self.view_up = rotate_around_axis(self.view_up, Vec3::ZERO, axis, angle);
        }
        self.view_dir = dir;
        self.orthonormalize();
    }

    // Field of view

    pub fn fov_y_scale_up(&mut self) {
        self.scale_fov_y(self.settings.fov_y_scale_factor);
        self.notify_changed();
    }

    pub fn fov_y_scale_down(&mut self) {
        self.scale_fov_y(1.0 / self.settings.fov_y_scale_factor);
        self.notify_changed();
    }

    /// Ortho extents follow the same factor so both projections zoom alike.
    pub(crate) fn scale_fov_y(&mut self, factor: f64) {
        self.fov_y *= factor;
        if let Some(range) = self.settings.fov_y_clamp() {
            self.fov_y = if factor > 1.0 {
                self.fov_y.min(range.max)
            } else {
                self.fov_y.max(range.min)
            };
        }
        self.ortho_bottom *= factor;
        self.ortho_top *= factor;
    }

    // Framing

    /// Frames the bound: centers on it and backs off until it fills the
    /// default field of view.
    pub fn fit_to_screen(&mut self) {
        if self.frame_bound() {
            self.notify_changed();
        }
    }

    /// Looks along world +Y with +Z up, then frames the bound.
    pub fn compute_initial_view(&mut self) {
        self.view_up = Vec3::Z;
        self.view_dir = Vec3::Y;
        self.frame_bound();
        self.notify_changed();
    }

    fn frame_bound(&mut self) -> bool {
        let Some(bound) = self.bound else {
            warn!("fit requested without a bounding volume");
            return false;
        };
        let radius = bound.effective_radius();
        self.view_center = bound.center;
        self.fov_y = DEFAULT_FOV_Y;
        let half_fov_tan = (self.fov_y.to_radians() * 0.5).tan();
        self.view_distance = radius / half_fov_tan;
        self.ortho_top = half_fov_tan * self.view_distance;
        self.ortho_bottom = -self.ortho_top;
        debug!(
            center = ?self.view_center,
            radius,
            distance = self.view_distance,
            "framed bounding volume"
        );
        true
    }

    // Persistence

    pub fn view_state(&self) -> ViewState {
        ViewState {
            up: self.view_up,
            dir: self.view_dir,
            center: self.view_center,
            distance: self.view_distance,
            fov_y: self.fov_y,
            ortho: self.ortho,
            aspect: self.aspect,
            ortho_bottom: self.ortho_bottom,
            ortho_top: self.ortho_top,
        }
    }

    pub fn apply_view_state(&mut self, state: ViewState) {
        self.assign_view_state(state);
        self.notify_changed();
    }

    fn assign_view_state(&mut self, state: ViewState) {
        self.view_up = state.up;
        self.view_dir = state.dir;
        self.view_center = state.center;
        self.view_distance = state.distance;
        self.fov_y = state.fov_y;
        self.ortho = state.ortho;
        self.aspect = state.aspect;
        self.ortho_bottom = state.ortho_bottom;
        self.ortho_top = state.ortho_top;
        if !self.is_orthonormal() {
            self.orthonormalize();
        }
    }

    pub fn save_view(&self) -> String {
        self.view_state().to_string()
    }

    /// Parses every field before touching the model; on error nothing
    /// changes and no event is queued.
    pub fn load_view(&mut self, text: &str) -> Result<()> {
        let state: ViewState = text.parse()?;
        self.apply_view_state(state);
        Ok(())
    }

    pub fn stash_view(&mut self) {
        self.stashed_view = Some(self.save_view());
    }

    pub fn has_stashed_view(&self) -> bool {
        self.stashed_view.is_some()
    }

    /// Returns `false` when nothing has been stashed.
    pub fn restore_view(&mut self) -> Result<bool> {
        let Some(text) = self.stashed_view.clone() else {
            debug!("restore requested with an empty stash");
            return Ok(false);
        };
        self.load_view(&text)?;
        Ok(true)
    }
}

pub(crate) fn has_ortho_extent(bottom: f64, top: f64) -> bool {
    let extent = top - bottom;
    extent > 0.0 && extent.is_finite()
}

fn default_up(forward: Vec3) -> Vec3 {
    let mut up = Vec3::Z;
    let mut right = forward.cross(up);
    if right.length() <= 1.0e-6 {
        up = Vec3::Y;
        right = forward.cross(up);
    }
    right.normalized().cross(forward).normalized()
}
