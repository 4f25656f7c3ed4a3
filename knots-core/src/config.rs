/// Fixed viewer parameters: asset locations, placement, camera, input, light
use nalgebra::Point3;
use std::f32::consts::FRAC_PI_4;

use crate::scene::Side;
use crate::transform::RotationState;

/// Radians of rotation per pixel of touch drag
pub const ROTATION_SPEED: f32 = 0.01;

/// Vertical field of view in degrees
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_POSITION: [f32; 3] = [0.0, 0.0, -2.0];

pub const HEMISPHERE_SKY: u32 = 0xffffff;
pub const HEMISPHERE_GROUND: u32 = 0x000000;
pub const HEMISPHERE_INTENSITY: f32 = 1.0;
pub const BACKGROUND: u32 = 0x000000;

/// Where a model's material and geometry files live, relative to the asset root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSource {
    pub side: Side,
    pub material_path: &'static str,
    pub geometry_path: &'static str,
}

pub const MODEL_SOURCES: [ModelSource; 2] = [
    ModelSource {
        side: Side::Left,
        material_path: "public/chiral_trefoil_knots_left.mtl",
        geometry_path: "public/chiral_trefoil_knots_left.obj",
    },
    ModelSource {
        side: Side::Right,
        material_path: "public/chiral_trefoil_knots_right.mtl",
        geometry_path: "public/chiral_trefoil_knots_right.obj",
    },
];

/// Initial placement of a model, fixed at load time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Point3<f32>,
    pub rotation: RotationState,
}

pub fn placement(side: Side) -> Placement {
    match side {
        Side::Left => Placement {
            position: Point3::new(1.0, 0.0, 0.0),
            rotation: RotationState::new(-FRAC_PI_4, FRAC_PI_4, 0.0),
        },
        Side::Right => Placement {
            position: Point3::new(-1.0, 0.0, 0.0),
            rotation: RotationState::new(-FRAC_PI_4, -FRAC_PI_4, 0.0),
        },
    }
}
