/// Scene graph: the two knot slots and the light that shades them
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::{self, Placement};
use crate::geometry::{Color, Mesh};
use crate::mtl::Material;
use crate::transform::{RotationState, Transform};

/// Which of the two knots a model is. Decides initial placement and which
/// screen half drives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The side whose half of the viewport contains `x`.
    ///
    /// Strictly left of the midline is `Left`; the midline itself and
    /// everything right of it is `Right`.
    pub fn for_screen_x(x: f64, viewport_width: f64) -> Side {
        if x < viewport_width / 2.0 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Triangles drawn with a single material
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub mesh: Mesh,
    pub material: Material,
}

impl Shape {
    pub fn new(material: Material) -> Self {
        Self {
            mesh: Mesh::new(),
            material,
        }
    }
}

/// A loaded knot
#[derive(Debug, Clone)]
pub struct Model {
    pub side: Side,
    pub shapes: Vec<Shape>,
    /// Fixed once placed
    position: Point3<f32>,
    pub rotation: RotationState,
}

impl Model {
    /// Build a model at the fixed placement for `side`
    pub fn placed(side: Side, shapes: Vec<Shape>) -> Self {
        let Placement { position, rotation } = config::placement(side);
        Self {
            side,
            shapes,
            position,
            rotation,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Transform::model_matrix(&self.position, &self.rotation)
    }

    pub fn triangle_count(&self) -> usize {
        self.shapes.iter().map(|s| s.mesh.len()).sum()
    }
}

/// Sky/ground gradient light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLight {
    pub sky: Color,
    pub ground: Color,
    pub intensity: f32,
}

impl HemisphereLight {
    pub fn new(sky: Color, ground: Color, intensity: f32) -> Self {
        Self {
            sky,
            ground,
            intensity,
        }
    }

    /// Light arriving at a surface with world-space normal `normal`
    pub fn irradiance(&self, normal: &Vector3<f32>) -> Color {
        let up = normal.try_normalize(f32::EPSILON).map_or(0.0, |n| n.y);
        let weight = 0.5 * up + 0.5;
        self.ground.lerp(&self.sky, weight).scale(self.intensity)
    }
}

impl Default for HemisphereLight {
    fn default() -> Self {
        Self::new(
            Color::from_hex(config::HEMISPHERE_SKY),
            Color::from_hex(config::HEMISPHERE_GROUND),
            config::HEMISPHERE_INTENSITY,
        )
    }
}

/// Everything the render loop draws. Either slot may be empty at any time.
#[derive(Debug, Clone)]
pub struct Scene {
    left: Option<Model>,
    right: Option<Model>,
    pub light: HemisphereLight,
    pub background: Color,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            left: None,
            right: None,
            light: HemisphereLight::default(),
            background: Color::from_hex(config::BACKGROUND),
        }
    }

    /// Put a finished model into its slot
    pub fn insert(&mut self, model: Model) {
        let side = model.side;
        log::info!(
            "{side:?} model added: {} shapes, {} triangles",
            model.shapes.len(),
            model.triangle_count()
        );
        if self.slot(side).replace(model).is_some() {
            log::warn!("{side:?} model was already loaded, replaced");
        }
    }

    pub fn get(&self, side: Side) -> Option<&Model> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    pub fn get_mut(&mut self, side: Side) -> Option<&mut Model> {
        self.slot(side).as_mut()
    }

    /// Loaded models, left first
    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.left.iter().chain(self.right.iter())
    }

    fn slot(&mut self, side: Side) -> &mut Option<Model> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_side_for_screen_x() {
        assert_eq!(Side::for_screen_x(100.0, 400.0), Side::Left);
        assert_eq!(Side::for_screen_x(199.9, 400.0), Side::Left);
        assert_eq!(Side::for_screen_x(200.0, 400.0), Side::Right);
        assert_eq!(Side::for_screen_x(350.0, 400.0), Side::Right);
    }

    #[test]
    fn test_placement() {
        let left = Model::placed(Side::Left, Vec::new());
        assert_eq!(left.position(), Point3::new(1.0, 0.0, 0.0));
        assert!((left.rotation.x + FRAC_PI_4).abs() < 1e-6);
        assert!((left.rotation.y - FRAC_PI_4).abs() < 1e-6);

        let right = Model::placed(Side::Right, Vec::new());
        assert_eq!(right.position(), Point3::new(-1.0, 0.0, 0.0));
        assert!((right.rotation.x + FRAC_PI_4).abs() < 1e-6);
        assert!((right.rotation.y + FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_slots_start_empty() {
        let scene = Scene::new();
        assert!(scene.get(Side::Left).is_none());
        assert!(scene.get(Side::Right).is_none());
        assert_eq!(scene.models().count(), 0);
    }

    #[test]
    fn test_insert_in_either_order() {
        let mut scene = Scene::new();
        scene.insert(Model::placed(Side::Right, Vec::new()));
        assert!(scene.get(Side::Left).is_none());
        scene.insert(Model::placed(Side::Left, Vec::new()));
        let sides: Vec<Side> = scene.models().map(|m| m.side).collect();
        assert_eq!(sides, vec![Side::Left, Side::Right]);
    }

    #[test]
    fn test_hemisphere_light() {
        let light = HemisphereLight::default();
        assert_eq!(light.irradiance(&Vector3::y()), Color::WHITE);
        assert_eq!(light.irradiance(&-Vector3::y()), Color::BLACK);
        let side = light.irradiance(&Vector3::x());
        assert!((side.r - 0.5).abs() < 1e-6);
    }
}
