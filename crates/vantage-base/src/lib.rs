use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Tolerance {
    pub linear: f64,
    pub angular: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            linear: 1.0e-9,
            angular: 1.0e-9,
        }
    }
}

impl Tolerance {
    pub fn linear_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.linear
    }

    pub fn angular_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.angular
    }
}

/// Fields of the flat view-state token stream, in serialization order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ViewField {
    UpX,
    UpY,
    UpZ,
    DirX,
    DirY,
    DirZ,
    CenterX,
    CenterY,
    CenterZ,
    Distance,
    FovY,
    Ortho,
    Aspect,
    OrthoBottom,
    OrthoTop,
}

impl ViewField {
    pub const ALL: [ViewField; 15] = [
        ViewField::UpX,
        ViewField::UpY,
        ViewField::UpZ,
        ViewField::DirX,
        ViewField::DirY,
        ViewField::DirZ,
        ViewField::CenterX,
        ViewField::CenterY,
        ViewField::CenterZ,
        ViewField::Distance,
        ViewField::FovY,
        ViewField::Ortho,
        ViewField::Aspect,
        ViewField::OrthoBottom,
        ViewField::OrthoTop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ViewField::UpX => "up.x",
            ViewField::UpY => "up.y",
            ViewField::UpZ => "up.z",
            ViewField::DirX => "dir.x",
            ViewField::DirY => "dir.y",
            ViewField::DirZ => "dir.z",
            ViewField::CenterX => "center.x",
            ViewField::CenterY => "center.y",
            ViewField::CenterZ => "center.z",
            ViewField::Distance => "distance",
            ViewField::FovY => "fov_y",
            ViewField::Ortho => "ortho",
            ViewField::Aspect => "aspect",
            ViewField::OrthoBottom => "ortho_bottom",
            ViewField::OrthoTop => "ortho_top",
        }
    }
}

impl std::fmt::Display for ViewField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("view state field {field}: {reason}")]
    ViewParse { field: ViewField, reason: String },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn missing(field: ViewField) -> Self {
        Error::ViewParse {
            field,
            reason: "missing".to_string(),
        }
    }

    pub fn malformed(field: ViewField, token: &str) -> Self {
        Error::ViewParse {
            field,
            reason: format!("malformed token {token:?}"),
        }
    }

    pub fn invalid(field: ViewField, reason: &str) -> Self {
        Error::ViewParse {
            field,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
