pub mod input;
pub mod script;

pub use input::{MouseMode, PointerButton, PointerEvent, PointerInput, Viewport, ndc_from_pixel};
pub use script::{ScriptCommand, ScriptSession, parse_script};
