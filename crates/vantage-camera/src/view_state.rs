use std::fmt;
use std::str::FromStr;

use vantage_base::{Error, Result, ViewField};
use vantage_math::Vec3;

/// Flat snapshot of the persistent view parameters.
///
/// Text form is 15 whitespace-separated tokens in [`ViewField::ALL`] order,
/// with `ortho` written as `true`/`false`. Floats use the shortest
/// representation that parses back to the same value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub up: Vec3,
    pub dir: Vec3,
    pub center: Vec3,
    pub distance: f64,
    pub fov_y: f64,
    pub ortho: bool,
    pub aspect: f64,
    pub ortho_bottom: f64,
    pub ortho_top: f64,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {} {} {} {} {} {} {}",
            self.up.x,
            self.up.y,
            self.up.z,
            self.dir.x,
            self.dir.y,
            self.dir.z,
            self.center.x,
            self.center.y,
            self.center.z,
            self.distance,
            self.fov_y,
            self.ortho,
            self.aspect,
            self.ortho_bottom,
            self.ortho_top
        )
    }
}

impl FromStr for ViewState {
    type Err = Error;

    /// Parses all fields before returning; trailing tokens are ignored.
    /// A zero direction, an up vector parallel to it or a non-positive
    /// distance is rejected.
    fn from_str(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace();
        let mut next = |field: ViewField| tokens.next().ok_or_else(|| Error::missing(field));

        let mut scalars = [0.0f64; 15];
        let mut ortho = false;
        for (slot, field) in scalars.iter_mut().zip(ViewField::ALL) {
            let token = next(field)?;
            if field == ViewField::Ortho {
                ortho = parse_bool(field, token)?;
            } else {
                *slot = parse_scalar(field, token)?;
            }
        }

        let [
            ux, uy, uz, dx, dy, dz, cx, cy, cz, distance, fov_y, _, aspect, ortho_bottom, ortho_top,
        ] = scalars;
        let state = Self {
            up: Vec3::new(ux, uy, uz),
            dir: Vec3::new(dx, dy, dz),
            center: Vec3::new(cx, cy, cz),
            distance,
            fov_y,
            ortho,
            aspect,
            ortho_bottom,
            ortho_top,
        };
        state.check_basis()?;
        Ok(state)
    }
}

impl ViewState {
    fn check_basis(&self) -> Result<()> {
        if self.dir.try_normalized().is_none() {
            return Err(Error::invalid(ViewField::DirX, "zero-length direction"));
        }
        if self.dir.cross(self.up).try_normalized().is_none() {
            return Err(Error::invalid(ViewField::UpX, "up parallel to direction"));
        }
        if !(self.distance > 0.0) {
            return Err(Error::invalid(ViewField::Distance, "distance must be positive"));
        }
        Ok(())
    }
}

fn parse_scalar(field: ViewField, token: &str) -> Result<f64> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::malformed(field, token)),
    }
}

fn parse_bool(field: ViewField, token: &str) -> Result<bool> {
    match token {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::malformed(field, token)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_tokens_are_lowercase_literals() {
        assert!(parse_bool(ViewField::Ortho, "true").unwrap());
        assert!(!parse_bool(ViewField::Ortho, "false").unwrap());
        assert!(parse_bool(ViewField::Ortho, "1").is_err());
    }

    #[test]
    fn non_finite_scalars_are_malformed() {
        assert!(parse_scalar(ViewField::Distance, "inf").is_err());
        assert!(parse_scalar(ViewField::Distance, "NaN").is_err());
        assert_eq!(parse_scalar(ViewField::Distance, "-0.25").unwrap(), -0.25);
    }

    fn field_of(text: &str) -> Option<ViewField> {
        match text.parse::<ViewState>() {
            Err(Error::ViewParse { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn degenerate_basis_is_rejected() {
        assert_eq!(
            field_of("0 0 1 0 0 0 0 0 0 20 30 false 1 -1 1"),
            Some(ViewField::DirX)
        );
        assert_eq!(
            field_of("0 0 1 0 0 -1 0 0 0 20 30 false 1 -1 1"),
            Some(ViewField::UpX)
        );
        assert_eq!(
            field_of("0 0 1 0 1 0 0 0 0 0 30 false 1 -1 1"),
            Some(ViewField::Distance)
        );
        assert_eq!(field_of("0 0 1 0 1 0 0 0 0 20 30 false 1 -1 1"), None);
    }
}
