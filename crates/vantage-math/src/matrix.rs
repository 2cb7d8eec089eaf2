use super::vector::{Vec3, Vec4};

const SINGULAR_PIVOT: f64 = 1.0e-14;

/// 4x4 matrix stored column-major, applied to column vectors (`m * v`).
///
/// The memory layout matches what OpenGL-style renderers upload: `cols[3]`
/// holds the translation of an affine transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub cols: [[f64; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_cols(x: Vec4, y: Vec4, z: Vec4, w: Vec4) -> Self {
        Self {
            cols: [
                [x.x, x.y, x.z, x.w],
                [y.x, y.y, y.z, y.w],
                [z.x, z.y, z.z, z.w],
                [w.x, w.y, w.z, w.w],
            ],
        }
    }

    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        let mut cols = [[0.0; 4]; 4];
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                cols[c][r] = *value;
            }
        }
        Self { cols }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cols[col][row]
    }

    pub fn col(&self, col: usize) -> Vec4 {
        let c = self.cols[col];
        Vec4::new(c[0], c[1], c[2], c[3])
    }

    pub fn row(&self, row: usize) -> Vec4 {
        Vec4::new(
            self.cols[0][row],
            self.cols[1][row],
            self.cols[2][row],
            self.cols[3][row],
        )
    }

    pub fn to_cols_array_2d(&self) -> [[f64; 4]; 4] {
        self.cols
    }

    pub fn to_rows_array_2d(&self) -> [[f64; 4]; 4] {
        self.transpose().cols
    }

    pub fn transpose(&self) -> Self {
        let mut cols = [[0.0; 4]; 4];
        for (c, col) in cols.iter_mut().enumerate() {
            for (r, value) in col.iter_mut().enumerate() {
                *value = self.cols[r][c];
            }
        }
        Self { cols }
    }

    pub fn translation(offset: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = [offset.x, offset.y, offset.z, 1.0];
        m
    }

    /// Right-handed rotation of `angle` radians about `axis`.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let a = axis.normalized();
        let (sin, cos) = angle.sin_cos();
        let t = 1.0 - cos;
        Self::from_rows([
            [
                t * a.x * a.x + cos,
                t * a.x * a.y - sin * a.z,
                t * a.x * a.z + sin * a.y,
                0.0,
            ],
            [
                t * a.x * a.y + sin * a.z,
                t * a.y * a.y + cos,
                t * a.y * a.z - sin * a.x,
                0.0,
            ],
            [
                t * a.x * a.z - sin * a.y,
                t * a.y * a.z + sin * a.x,
                t * a.z * a.z + cos,
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn frustum(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Self {
        let a = (right + left) / (right - left);
        let b = (top + bottom) / (top - bottom);
        let c = -(far + near) / (far - near);
        let d = -2.0 * far * near / (far - near);
        Self::from_rows([
            [2.0 * near / (right - left), 0.0, a, 0.0],
            [0.0, 2.0 * near / (top - bottom), b, 0.0],
            [0.0, 0.0, c, d],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Symmetric perspective projection. `fov_y_deg` is the full vertical
    /// angle in degrees.
    pub fn perspective(fov_y_deg: f64, aspect: f64, near: f64, far: f64) -> Self {
        let tan_half = (fov_y_deg * 0.5).to_radians().tan();
        let top = tan_half * near;
        let right = top * aspect;
        Self::frustum(-right, right, -top, top, near, far)
    }

    pub fn ortho(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Self {
        Self::from_rows([
            [2.0 / (right - left), 0.0, 0.0, -(right + left) / (right - left)],
            [0.0, 2.0 / (top - bottom), 0.0, -(top + bottom) / (top - bottom)],
            [0.0, 0.0, -2.0 / (far - near), -(far + near) / (far - near)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }

    /// Transforms a point and divides by the resulting `w`.
    pub fn transform_point(&self, p: Vec3) -> Option<Vec3> {
        self.mul_vec4(p.extend(1.0)).project()
    }

    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.mul_vec4(v.extend(0.0)).xyz()
    }

    /// Gauss-Jordan inverse with partial pivoting. `None` when singular.
    pub fn inverse(&self) -> Option<Self> {
        let mut a = self.to_rows_array_2d();
        let mut inv = Self::IDENTITY.to_rows_array_2d();

        for col in 0..4 {
            let mut pivot_row = col;
            for row in (col + 1)..4 {
                if a[row][col].abs() > a[pivot_row][col].abs() {
                    pivot_row = row;
                }
            }
            let pivot = a[pivot_row][col];
            if pivot.abs() < SINGULAR_PIVOT || !pivot.is_finite() {
                return None;
            }
            a.swap(col, pivot_row);
            inv.swap(col, pivot_row);

            for k in 0..4 {
                a[col][k] /= pivot;
                inv[col][k] /= pivot;
            }

            for row in 0..4 {
                if row == col {
                    continue;
                }
                let factor = a[row][col];
                if factor == 0.0 {
                    continue;
                }
                for k in 0..4 {
                    a[row][k] -= factor * a[col][k];
                    inv[row][k] -= factor * inv[col][k];
                }
            }
        }

        Some(Self::from_rows(inv))
    }

    pub fn abs_diff_eq(&self, other: &Self, eps: f64) -> bool {
        self.cols
            .iter()
            .flatten()
            .zip(other.cols.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut cols = [[0.0; 4]; 4];
        for (c, col) in cols.iter_mut().enumerate() {
            let rhs_col = rhs.col(c);
            for (r, value) in col.iter_mut().enumerate() {
                *value = self.row(r).dot(rhs_col);
            }
        }
        Self { cols }
    }
}

impl std::ops::Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, rhs: Vec4) -> Self::Output {
        self.mul_vec4(rhs)
    }
}

impl std::fmt::Display for Mat4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..4 {
            let row = self.row(r);
            writeln!(
                f,
                "{:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                row.x, row.y, row.z, row.w
            )?;
        }
        Ok(())
    }
}
