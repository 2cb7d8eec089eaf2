//! Line-oriented interaction scripts for replaying pointer sessions
//! without a window.
//!
//! ```text
//! viewport 800 600
//! mode pan
//! press 400 300 pick 0 0 0
//! move 450 300
//! release 450 300
//! wheel +
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use tracing::{debug, info};
use vantage_base::{Error, Result};
use vantage_camera::{CameraEvent, CameraModel};
use vantage_math::{Vec2, Vec3};

use crate::input::{MouseMode, PointerButton, PointerEvent, PointerInput, Viewport};

const DEFAULT_VIEWPORT: Viewport = Viewport::new(800, 600);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptCommand {
    Viewport(Viewport),
    Mode(MouseMode),
    Pointer(PointerEvent),
    Ortho(bool),
    Eye(Vec3),
    AzEl(Vec2),
    Stash,
    Restore,
    Fit,
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptCommand>> {
    let mut commands = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = parse_line(line).map_err(|err| {
            Error::InvalidParameter(format!("script line {}: {err}", index + 1))
        })?;
        commands.push(command);
    }
    Ok(commands)
}

fn parse_line(line: &str) -> Result<ScriptCommand> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Err(Error::InvalidParameter("empty command".to_string()));
    };
    let args: Vec<&str> = words.collect();

    let command = match (keyword, args.as_slice()) {
        ("viewport", [w, h]) => ScriptCommand::Viewport(Viewport::new(number(w)?, number(h)?)),
        ("mode", [mode]) => ScriptCommand::Mode(mode.parse()?),
        ("press", [x, y]) => ScriptCommand::Pointer(PointerEvent::Press {
            button: PointerButton::Primary,
            x: number(x)?,
            y: number(y)?,
            pick: None,
        }),
        ("press", [x, y, "pick", px, py, pz]) => ScriptCommand::Pointer(PointerEvent::Press {
            button: PointerButton::Primary,
            x: number(x)?,
            y: number(y)?,
            pick: Some(Vec3::new(number(px)?, number(py)?, number(pz)?)),
        }),
        ("move", [x, y]) => ScriptCommand::Pointer(PointerEvent::Move {
            x: number(x)?,
            y: number(y)?,
        }),
        ("release", [x, y]) => ScriptCommand::Pointer(PointerEvent::Release {
            button: PointerButton::Primary,
            x: number(x)?,
            y: number(y)?,
        }),
        ("wheel", ["+"]) => ScriptCommand::Pointer(PointerEvent::Wheel { delta: 1.0 }),
        ("wheel", ["-"]) => ScriptCommand::Pointer(PointerEvent::Wheel { delta: -1.0 }),
        ("ortho", ["true"]) => ScriptCommand::Ortho(true),
        ("ortho", ["false"]) => ScriptCommand::Ortho(false),
        ("eye", [x, y, z]) => ScriptCommand::Eye(Vec3::new(number(x)?, number(y)?, number(z)?)),
        ("azel", [az, el]) => ScriptCommand::AzEl(Vec2::new(number(az)?, number(el)?)),
        ("stash", []) => ScriptCommand::Stash,
        ("restore", []) => ScriptCommand::Restore,
        ("fit", []) => ScriptCommand::Fit,
        _ => {
            return Err(Error::InvalidParameter(format!(
                "unrecognized command {line:?}"
            )));
        }
    };
    Ok(command)
}

fn number<T: std::str::FromStr>(token: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| Error::InvalidParameter(format!("invalid number {token:?}")))
}

/// A camera driven by scripted pointer input.
#[derive(Clone, Debug)]
pub struct ScriptSession {
    camera: CameraModel,
    input: PointerInput,
    changes: usize,
}

impl ScriptSession {
    pub fn new(mut camera: CameraModel) -> Self {
        let mut input = PointerInput::new(DEFAULT_VIEWPORT);
        input.resize(&mut camera, DEFAULT_VIEWPORT);
        camera.take_events();
        Self {
            camera,
            input,
            changes: 0,
        }
    }

    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }

    pub fn into_camera(self) -> CameraModel {
        self.camera
    }

    /// Number of change notifications raised so far.
    pub fn changes(&self) -> usize {
        self.changes
    }

    pub fn apply(&mut self, command: ScriptCommand) -> Result<()> {
        let camera = &mut self.camera;
        match command {
            ScriptCommand::Viewport(viewport) => self.input.resize(camera, viewport),
            ScriptCommand::Mode(mode) => self.input.set_mode(mode),
            ScriptCommand::Pointer(event) => {
                if !self.input.handle(camera, event) {
                    debug!(?event, "pointer event ignored");
                }
            }
            ScriptCommand::Ortho(ortho) => camera.set_ortho(ortho),
            ScriptCommand::Eye(eye) => camera.set_eye_position(eye),
            ScriptCommand::AzEl(az_el) => camera.set_view_dir_from_az_el(az_el),
            ScriptCommand::Stash => camera.stash_view(),
            ScriptCommand::Restore => {
                camera.restore_view()?;
            }
            ScriptCommand::Fit => camera.fit_to_screen(),
        }
        self.changes += camera
            .take_events()
            .iter()
            .filter(|event| **event == CameraEvent::Changed)
            .count();
        Ok(())
    }

    pub fn run(&mut self, commands: &[ScriptCommand]) -> Result<()> {
        for command in commands {
            self.apply(*command)?;
        }
        info!(
            commands = commands.len(),
            changes = self.changes,
            "script replay complete"
        );
        Ok(())
    }
}
