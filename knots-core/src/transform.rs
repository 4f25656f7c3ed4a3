/// Model orientation and transformation matrices
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// Euler rotation around three axes (in radians), applied X then Y then Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state.
    ///
    /// Intrinsic X-Y-Z order, i.e. `Rx * Ry * Rz`.
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        rx * ry * rz
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Model matrix for an object at `position` with `rotation`
    pub fn model_matrix(position: &Point3<f32>, rotation: &RotationState) -> Matrix4<f32> {
        Self::translation_matrix(position.x, position.y, position.z)
            * Self::rotation_matrix(rotation)
    }

    /// Matrix that carries object-space normals into world space.
    ///
    /// Models are never scaled, so the rotation block is enough.
    pub fn normal_matrix(rotation: &RotationState) -> Matrix3<f32> {
        Self::rotation_matrix(rotation).fixed_view::<3, 3>(0, 0).into_owned()
    }
}
