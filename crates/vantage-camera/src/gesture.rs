//! Pointer-driven manipulation sessions.
//!
//! Every gesture follows start → update* → finish. Updates take the current
//! pointer position in normalized device coordinates (`[-1, 1]` on both
//! axes, `+y` up) and measure motion against the position recorded by the
//! previous call.

use tracing::{debug, trace, warn};
use vantage_math::{Vec2, Vec3, Vec4, intersect_plane_ray, plane_through_point, rotate_around_axis};

use crate::model::{CameraModel, DOLLY_DISTANCE_FLOOR, has_ortho_extent};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Virtual trackball around the view center.
    Orbit,
    /// Turn the view in place around the eye.
    Rotate,
    /// Translate along a plane captured at start.
    Pan,
    /// Change the field of view.
    Zoom,
    /// Move along the view direction.
    Dolly,
}

impl GestureKind {
    pub const ALL: [GestureKind; 5] = [
        GestureKind::Orbit,
        GestureKind::Rotate,
        GestureKind::Pan,
        GestureKind::Zoom,
        GestureKind::Dolly,
    ];
}

/// Snapshot of the interaction state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSession {
    pub kind: GestureKind,
    pub start_ndc: Vec2,
    pub pan_plane: Option<Vec4>,
    pub dolly_pressure: u32,
}

impl CameraModel {
    pub fn view_change_in_progress(&self) -> bool {
        self.active_gesture.is_some()
    }

    pub fn active_gesture(&self) -> Option<GestureKind> {
        self.active_gesture
    }

    pub fn session(&self) -> Option<GestureSession> {
        self.active_gesture.map(|kind| GestureSession {
            kind,
            start_ndc: self.starting_ndc,
            pan_plane: self.pan_plane,
            dolly_pressure: self.dolly_pressure,
        })
    }

    /// Starts `kind` at `ndc`. A pan started this way uses the plane through
    /// the view center facing the camera.
    pub fn start(&mut self, kind: GestureKind, ndc: Vec2) {
        match kind {
            GestureKind::Pan => {
                let plane = plane_through_point(self.view_dir, self.view_center);
                self.start_pan(ndc, plane);
            }
            GestureKind::Dolly => self.start_dolly(ndc),
            _ => self.begin_session(kind, ndc),
        }
    }

    pub fn update(&mut self, kind: GestureKind, ndc: Vec2) {
        match kind {
            GestureKind::Orbit => self.orbit(ndc),
            GestureKind::Rotate => self.rotate(ndc),
            GestureKind::Pan => self.pan(ndc),
            GestureKind::Zoom => self.zoom(ndc),
            GestureKind::Dolly => self.dolly_ndc(ndc),
        }
    }

    /// Ends the session after applying the motion up to `ndc`.
    pub fn finish(&mut self, kind: GestureKind, ndc: Vec2) {
        if self.active_gesture != Some(kind) {
            debug!(?kind, active = ?self.active_gesture, "finishing a gesture that was not started");
        }
        self.active_gesture = None;
        self.update(kind, ndc);
    }

    /// Ends the session without further motion.
    pub fn finish_in_place(&mut self, kind: GestureKind) {
        self.finish(kind, self.starting_ndc);
    }

    fn begin_session(&mut self, kind: GestureKind, ndc: Vec2) {
        if let Some(previous) = self.active_gesture {
            debug!(?previous, next = ?kind, "gesture started while another was active; finishing it");
        }
        self.active_gesture = Some(kind);
        self.starting_ndc = ndc;
        trace!(?kind, ?ndc, "gesture started");
    }

    // Orbit

    pub fn start_orbit(&mut self, ndc: Vec2) {
        self.begin_session(GestureKind::Orbit, ndc);
    }

    /// Trackball rotation about the view center. Touching farther from the
    /// screen center tilts the rotation axis toward the view direction,
    /// adding roll.
    pub fn orbit(&mut self, ndc: Vec2) {
        let delta = ndc - self.starting_ndc;
        self.apply_orbit(delta);
        self.orthonormalize();
        self.starting_ndc = ndc;
        self.notify_changed();
    }

    pub fn finish_orbit(&mut self, ndc: Vec2) {
        self.finish(GestureKind::Orbit, ndc);
    }

    fn apply_orbit(&mut self, delta: Vec2) {
        let magnitude = delta.length();
        if magnitude == 0.0 {
            return;
        }
        let up = self.view_up;
        let right = self.view_dir.cross(up);
        let screen_axis = delta.perp();
        let base_axis = right * screen_axis.x + up * screen_axis.y;
        let Some(drag_dir) = (right * delta.x + up * delta.y).try_normalized() else {
            debug!(?delta, "orbit drag has no world direction");
            return;
        };

        let rotation_dir = if screen_axis.dot(self.starting_ndc) > 0.0 {
            -1.0
        } else {
            1.0
        };
        let touch_angle = rotation_dir
            * self.settings.trackball_roll_sensitivity
            * self.starting_ndc.length();
        let ball_axis = rotate_around_axis(base_axis, Vec3::ZERO, drag_dir, touch_angle);
        let Some(ball_axis) = ball_axis.try_normalized() else {
            return;
        };

        trace!(?ball_axis, angle = -magnitude, "orbit step");
        self.view_dir = rotate_around_axis(self.view_dir, Vec3::ZERO, ball_axis, -magnitude);
        self.view_up = rotate_around_axis(self.view_up, Vec3::ZERO, ball_axis, -magnitude);
    }

    // Rotate

    pub fn start_rotate(&mut self, ndc: Vec2) {
        self.begin_session(GestureKind::Rotate, ndc);
    }

    /// Turns the view about the eye: horizontal motion yaws about `up`,
    /// vertical motion pitches about the right axis.
    pub fn rotate(&mut self, ndc: Vec2) {
        let delta = ndc - self.starting_ndc;
        let eye = self.eye_position();
        let up = self.view_up;
        let right = self.view_dir.cross(up);

        let turn = |v: Vec3| {
            let yawed = rotate_around_axis(v, Vec3::ZERO, up, delta.x);
            rotate_around_axis(yawed, Vec3::ZERO, right, -delta.y)
        };
        self.view_dir = turn(self.view_dir);
        self.view_up = turn(self.view_up);
        self.orthonormalize();

        self.view_center = eye + self.view_dir * self.view_distance;
        self.starting_ndc = ndc;
        self.notify_changed();
    }

    pub fn finish_rotate(&mut self, ndc: Vec2) {
        self.finish(GestureKind::Rotate, ndc);
    }

    // Pan

    /// `plane` is `(normal, offset)` with `normal · p + offset = 0`; the
    /// point under the pointer stays on it for the whole gesture.
    pub fn start_pan(&mut self, ndc: Vec2, plane: Vec4) {
        self.begin_session(GestureKind::Pan, ndc);
        self.pan_plane = Some(plane);
    }

    /// Drags the scene so the point grabbed on the pan plane follows the
    /// pointer. Without a bound there is nothing to project against and the
    /// view does not move.
    pub fn pan(&mut self, ndc: Vec2) {
        let delta = self.starting_ndc - ndc;
        if let Some(shift) = self.pan_shift(delta) {
            trace!(?delta, ?shift, "pan step");
            self.view_center += shift;
        }
        self.starting_ndc = ndc;
        self.notify_changed();
    }

    pub fn finish_pan(&mut self, ndc: Vec2) {
        self.finish(GestureKind::Pan, ndc);
    }

    fn pan_shift(&self, delta: Vec2) -> Option<Vec3> {
        let Some(bound) = self.bound else {
            warn!("pan without a bounding volume");
            return None;
        };
        let plane = self
            .pan_plane
            .unwrap_or_else(|| plane_through_point(self.view_dir, self.view_center));
        if self.ortho && !has_ortho_extent(self.ortho_bottom, self.ortho_top) {
            debug!("ortho extents are empty; pan skipped");
            return None;
        }
        let (near, far) = self.clip_planes_for(&bound);
        let Some(inverse_projection) = self.projection_for(&bound).inverse() else {
            debug!("projection is singular; pan skipped");
            return None;
        };
        let camera_to_world = self.camera_to_world();

        let mut far_points = [Vec4::new(0.0, 0.0, 1.0, 1.0), Vec4::new(delta.x, delta.y, 1.0, 1.0)];
        if !self.ortho {
            for point in &mut far_points {
                *point = *point * far;
            }
        }

        let mut hits = [Vec3::ZERO; 2];
        for (hit, clip) in hits.iter_mut().zip(far_points) {
            let p1 = (camera_to_world * (inverse_projection * clip)).project()?;
            let p0 = if self.ortho {
                p1 - self.view_dir * (far - near)
            } else {
                self.eye_position()
            };
            *hit = match intersect_plane_ray(plane, p0, p1) {
                Some(point) => point,
                None => {
                    debug!(?plane, "pan ray parallel to plane");
                    return None;
                }
            };
        }
        Some(hits[1] - hits[0])
    }

    // Zoom

    pub fn start_zoom(&mut self, ndc: Vec2) {
        self.begin_session(GestureKind::Zoom, ndc);
    }

    /// One FOV step per update: moving up widens, moving down narrows.
    /// Purely horizontal motion is ignored and keeps the anchor.
    pub fn zoom(&mut self, ndc: Vec2) {
        if ndc.y == self.starting_ndc.y {
            return;
        }
        let factor = self.settings.fov_y_scale_factor;
        if ndc.y > self.starting_ndc.y {
            self.scale_fov_y(factor);
        } else {
            self.scale_fov_y(1.0 / factor);
        }
        self.starting_ndc = ndc;
        self.notify_changed();
    }

    pub fn finish_zoom(&mut self, ndc: Vec2) {
        self.finish(GestureKind::Zoom, ndc);
    }

    // Dolly

    pub fn start_dolly(&mut self, ndc: Vec2) {
        self.begin_session(GestureKind::Dolly, ndc);
        self.dolly_pressure = 0;
    }

    /// Pointer form: any upward motion dollies forward by half a step,
    /// downward by half a step back.
    pub fn dolly_ndc(&mut self, ndc: Vec2) {
        if ndc.y > self.starting_ndc.y {
            self.apply_dolly(0.5);
        } else if ndc.y < self.starting_ndc.y {
            self.apply_dolly(-0.5);
        }
        self.starting_ndc = ndc;
        self.notify_changed();
    }

    /// Analog form, used by wheels and scripted input. Positive `delta`
    /// moves the eye away from the center.
    pub fn dolly(&mut self, delta: f64) {
        self.apply_dolly(delta);
        self.notify_changed();
    }

    pub fn finish_dolly(&mut self, ndc: Vec2) {
        self.finish(GestureKind::Dolly, ndc);
    }

    /// Steps scale with the bound and grow once the eye is outside it.
    /// Steps that would bring the distance under the floor build pressure;
    /// past the threshold the center itself is pushed forward.
    fn apply_dolly(&mut self, delta: f64) {
        if self.ortho {
            return;
        }
        let Some(bound) = self.bound else {
            warn!("dolly without a bounding volume");
            return;
        };
        let radius = bound.effective_radius();
        let mut scale = radius * 0.5;
        if self.view_distance > radius {
            scale *= self.view_distance / radius;
        }
        let distance = self.view_distance + delta * scale;

        if distance >= DOLLY_DISTANCE_FLOOR {
            if distance > self.view_distance {
                self.dolly_pressure = 0;
            }
            self.view_distance = distance;
        } else if self.settings.dolly_can_change_center {
            self.dolly_pressure += 1;
            trace!(pressure = self.dolly_pressure, "dolly below distance floor");
            if self.dolly_pressure > self.settings.dolly_center_change_threshold {
                let push = DOLLY_DISTANCE_FLOOR - distance;
                self.view_center += self.view_dir * push;
                self.view_distance = DOLLY_DISTANCE_FLOOR;
            }
        }
    }
}
