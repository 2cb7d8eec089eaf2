use tracing::{debug, trace};
use vantage_camera::{CameraModel, GestureKind};
use vantage_math::{Vec2, Vec3, plane_through_point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f64 / self.height as f64
        }
    }
}

/// Maps a pixel position (origin top-left, `y` down) to normalized device
/// coordinates (origin at the viewport center, `y` up). Values past the
/// right or top edge are capped at 1.
pub fn ndc_from_pixel(viewport: Viewport, x: f64, y: f64) -> Vec2 {
    let center_x = (viewport.width / 2).max(1) as f64;
    let center_y = (viewport.height / 2).max(1) as f64;
    let flipped_y = viewport.height as f64 - y;
    Vec2::new(
        ((x - center_x) / center_x).min(1.0),
        ((flipped_y - center_y) / center_y).min(1.0),
    )
}

/// Gesture bound to the primary button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MouseMode {
    #[default]
    Orbit,
    Pan,
    Zoom,
    Fly,
    Rotate,
}

impl MouseMode {
    pub fn gesture(self) -> GestureKind {
        match self {
            MouseMode::Orbit => GestureKind::Orbit,
            MouseMode::Pan => GestureKind::Pan,
            MouseMode::Zoom => GestureKind::Zoom,
            MouseMode::Fly => GestureKind::Dolly,
            MouseMode::Rotate => GestureKind::Rotate,
        }
    }
}

impl std::str::FromStr for MouseMode {
    type Err = vantage_base::Error;

    fn from_str(text: &str) -> vantage_base::Result<Self> {
        match text {
            "orbit" => Ok(MouseMode::Orbit),
            "pan" => Ok(MouseMode::Pan),
            "zoom" => Ok(MouseMode::Zoom),
            "fly" | "dolly" => Ok(MouseMode::Fly),
            "rotate" => Ok(MouseMode::Rotate),
            other => Err(vantage_base::Error::InvalidParameter(format!(
                "unknown mouse mode {other:?}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// `pick` is the scene point under the pointer, when the host has one.
    Press {
        button: PointerButton,
        x: f64,
        y: f64,
        pick: Option<Vec3>,
    },
    Move {
        x: f64,
        y: f64,
    },
    Release {
        button: PointerButton,
        x: f64,
        y: f64,
    },
    Wheel {
        delta: f64,
    },
}

/// Translates pixel-space pointer events into camera gestures.
#[derive(Clone, Debug)]
pub struct PointerInput {
    viewport: Viewport,
    mode: MouseMode,
    dragging: Option<GestureKind>,
}

impl PointerInput {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            mode: MouseMode::default(),
            dragging: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn mode(&self) -> MouseMode {
        self.mode
    }

    /// Takes effect on the next press; a drag in progress keeps its gesture.
    pub fn set_mode(&mut self, mode: MouseMode) {
        self.mode = mode;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    pub fn resize(&mut self, camera: &mut CameraModel, viewport: Viewport) {
        self.viewport = viewport;
        camera.set_aspect(viewport.aspect());
    }

    /// Returns `true` when the event drove the camera.
    pub fn handle(&mut self, camera: &mut CameraModel, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Press { button, x, y, pick } => {
                if button != PointerButton::Primary {
                    return false;
                }
                let ndc = ndc_from_pixel(self.viewport, x, y);
                let kind = self.mode.gesture();
                if kind == GestureKind::Pan {
                    let anchor = pick.unwrap_or_else(|| camera.view_center());
                    camera.start_pan(ndc, plane_through_point(camera.view_dir(), anchor));
                } else {
                    camera.start(kind, ndc);
                }
                trace!(?kind, ?ndc, "drag started");
                self.dragging = Some(kind);
                true
            }
            PointerEvent::Move { x, y } => {
                let Some(kind) = self.dragging else {
                    return false;
                };
                camera.update(kind, ndc_from_pixel(self.viewport, x, y));
                true
            }
            PointerEvent::Release { button, x, y } => {
                if button != PointerButton::Primary {
                    return false;
                }
                let Some(kind) = self.dragging.take() else {
                    debug!("release without a drag in progress");
                    return false;
                };
                camera.finish(kind, ndc_from_pixel(self.viewport, x, y));
                true
            }
            PointerEvent::Wheel { delta } => {
                camera.dolly(if delta > 0.0 { 0.5 } else { -0.5 });
                true
            }
        }
    }
}
