/// Geometry primitives shared by the loaders and renderers
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build a flat-shaded triangle, every vertex carrying the face normal.
    pub fn flat(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        let normal = face_normal(&p0, &p1, &p2);
        Self::new(
            Vertex::new(p0, normal),
            Vertex::new(p1, normal),
            Vertex::new(p2, normal),
        )
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        face_normal(
            &self.vertices[0].position,
            &self.vertices[1].position,
            &self.vertices[2].position,
        )
    }
}

/// Counter-clockwise face normal. Degenerate triangles yield a zero vector.
pub fn face_normal(p0: &Point3<f32>, p1: &Point3<f32>, p2: &Point3<f32>) -> Vector3<f32> {
    let edge1 = p1 - p0;
    let edge2 = p2 - p0;
    edge1
        .cross(&edge2)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// A triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Linear RGB colour, components nominally in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB`
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    pub fn lerp(&self, other: &Color, t: f32) -> Color {
        Color::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn scale(&self, factor: f32) -> Color {
        Color::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Component-wise product
    pub fn modulate(&self, other: &Color) -> Color {
        Color::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    /// Rec. 709 relative luminance
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl std::ops::Add for Color {
    type Output = Color;

    fn add(self, other: Color) -> Color {
        Color::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}
