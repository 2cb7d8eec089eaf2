pub mod bounds;
pub mod event;
pub mod gesture;
pub mod model;
pub mod settings;
pub mod view_state;

pub use bounds::{BoundingSphere, DEFAULT_BOUND_RADIUS};
pub use event::CameraEvent;
pub use gesture::{GestureKind, GestureSession};
pub use model::{CameraModel, DEFAULT_FOV_Y, DOLLY_DISTANCE_FLOOR};
pub use settings::{FovRange, ManipulationSettings};
pub use view_state::ViewState;
pub use vantage_base::{Error, Result};
