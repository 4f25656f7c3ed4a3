/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use knots_core::{Camera, Color, RenderTarget, Scene, Triangle};
use nalgebra::{Matrix3, Matrix4};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Color,
}

const EMPTY: Cell = Cell {
    character: ' ',
    color: Color::BLACK,
};

/// Renders the knot scene into a grid of shaded characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![EMPTY; size],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(EMPTY);
    }

    /// Character at column `x`, row `y`
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].character)
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        normal_matrix: &Matrix3<f32>,
        shade: impl Fn(&nalgebra::Vector3<f32>) -> Color,
        camera: &Camera,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coord, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *coord = projected,
                None => return, // Triangle is clipped
            }
        }

        let world_normal = normal_matrix * triangle.calculate_normal();
        let color = shade(&world_normal);
        let brightness = color.luminance().clamp(0.0, 1.0);

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        let cell = Cell {
            character: LUMINOSITY_RAMP[char_index],
            color,
        };

        self.rasterize_triangle(&screen_coords, cell);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = cell;
                }
            }
        }
    }

    /// Write the last rendered frame, one terminal row per grid row
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            // No newline after the last row, so the screen never scrolls
            if y > 0 {
                writer.queue(Print("\r\n"))?;
            }
            for cell in row {
                writer.queue(SetForegroundColor(term_color(&cell.color)))?;
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderTarget for AsciiRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        *self = Self::new(width as usize, height as usize);
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) {
        self.clear();

        for model in scene.models() {
            let model_matrix = model.model_matrix();
            let normal_matrix = knots_core::Transform::normal_matrix(&model.rotation);

            for shape in &model.shapes {
                let material = &shape.material;
                let shade = |normal: &nalgebra::Vector3<f32>| {
                    material.shade(&scene.light.irradiance(normal))
                };
                for triangle in &shape.mesh.triangles {
                    self.render_triangle(triangle, &model_matrix, &normal_matrix, shade, camera);
                }
            }
        }
    }
}

fn term_color(color: &Color) -> TermColor {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    TermColor::Rgb {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use knots_core::mtl::Material;
    use knots_core::{Mesh, Model, Shape, Side};
    use nalgebra::Point3;

    /// A large triangle around the left knot's anchor
    fn left_model() -> Model {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::flat(
            Point3::new(-0.5, -0.5, 0.0),
            Point3::new(0.5, -0.5, 0.0),
            Point3::new(0.0, 0.5, 0.0),
        ));
        let mut model = Model::placed(
            Side::Left,
            vec![Shape {
                mesh,
                material: Material::default(),
            }],
        );
        // Tilt the face normal towards the sky so it is lit
        model.rotation = knots_core::RotationState::new(-0.6, 0.0, 0.0);
        model
    }

    #[test]
    fn test_empty_scene_is_blank() {
        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render(&Scene::new(), &Camera::new(40, 20));
        assert!(renderer.cells.iter().all(|c| *c == EMPTY));
    }

    #[test]
    fn test_left_model_draws_on_left_half() {
        let mut scene = Scene::new();
        scene.insert(left_model());

        let mut renderer = AsciiRenderer::new(80, 40);
        renderer.render(&scene, &Camera::new(80, 40));

        let drawn: Vec<usize> = (0..40)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.char_at(x, y) != Some(' '))
            .map(|(x, _)| x)
            .collect();
        assert!(!drawn.is_empty());
        assert!(drawn.iter().all(|&x| x < 40));
    }

    #[test]
    fn test_set_size_reallocates() {
        let mut renderer = AsciiRenderer::new(10, 10);
        renderer.set_size(30, 12);
        assert_eq!(renderer.size(), (30, 12));
        assert_eq!(renderer.char_at(29, 11), Some(' '));
        assert_eq!(renderer.char_at(30, 0), None);
    }

    #[test]
    fn test_draw_emits_every_row() {
        let renderer = AsciiRenderer::new(4, 3);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 2);
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }
}
