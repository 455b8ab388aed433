use nalgebra::{Matrix4, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Axis for [`Placement::with_rotation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Local placement of an element: a 4x4 affine transform, optionally
/// relative to another entity's placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<EntityId>,
    pub matrix: Matrix4<f64>,
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

impl Placement {
    /// Origin with no rotation, placed in world space.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            relative_to: None,
            matrix: Matrix4::identity(),
        }
    }

    /// Place relative to `parent`'s placement.
    #[must_use]
    pub fn relative_to(mut self, parent: EntityId) -> Self {
        self.relative_to = Some(parent);
        self
    }

    /// Rotate about an axis through the origin. Positive angles are
    /// anti-clockwise. Applied to the whole matrix, so rotate before
    /// calling [`Placement::at`].
    #[must_use]
    pub fn with_rotation(mut self, degrees: f64, axis: Axis) -> Self {
        self.matrix = rotation(degrees, axis) * self.matrix;
        self
    }

    /// Set the XYZ location (last column).
    #[must_use]
    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.matrix[(0, 3)] = x;
        self.matrix[(1, 3)] = y;
        self.matrix[(2, 3)] = z;
        self
    }

    #[must_use]
    pub fn translation(&self) -> Vector3<f64> {
        translation_of(&self.matrix)
    }
}

/// Homogeneous rotation matrix.
#[must_use]
pub fn rotation(degrees: f64, axis: Axis) -> Matrix4<f64> {
    let unit = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };
    Rotation3::from_axis_angle(&unit, degrees.to_radians()).to_homogeneous()
}

/// The XYZ location held in the last column of a placement matrix.
#[must_use]
pub fn translation_of(matrix: &Matrix4<f64>) -> Vector3<f64> {
    Vector3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)])
}
