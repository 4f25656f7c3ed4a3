/// WebGL2 renderer for the knot scene
use knots_core::Model;

/// Floats per vertex: position (3), normal (3), rgba (4), emissive (3)
pub const FLOATS_PER_VERTEX: usize = 13;

/// Interleave a model's triangles into a vertex buffer, material colour
/// (with its opacity as alpha) baked into every vertex
pub fn interleave(model: &Model) -> Vec<f32> {
    let mut data = Vec::with_capacity(model.triangle_count() * 3 * FLOATS_PER_VERTEX);
    for shape in &model.shapes {
        let [r, g, b] = shape.material.diffuse.to_array();
        let a = shape.material.opacity;
        let [er, eg, eb] = shape.material.emissive.to_array();
        for triangle in &shape.mesh.triangles {
            for vertex in &triangle.vertices {
                let p = vertex.position;
                let n = vertex.normal;
                data.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z, r, g, b, a, er, eg, eb]);
            }
        }
    }
    data
}

/// Whether any shape needs alpha blending
pub fn has_transparency(model: &Model) -> bool {
    model.shapes.iter().any(|s| s.material.is_transparent())
}

#[cfg(target_arch = "wasm32")]
pub use gl::GlRenderer;

#[cfg(target_arch = "wasm32")]
mod gl {
    use super::*;
    use knots_core::{Camera, RenderTarget, Scene, Side, Transform};
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{
        HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlProgram, WebGlShader,
        WebGlUniformLocation, WebGlVertexArrayObject,
    };

    const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec4 a_color;
layout(location = 3) in vec3 a_emissive;

uniform mat4 u_view_projection;
uniform mat4 u_model;
uniform mat3 u_normal_matrix;

out vec3 v_normal;
out vec4 v_color;
out vec3 v_emissive;

void main() {
    v_normal = u_normal_matrix * a_normal;
    v_color = a_color;
    v_emissive = a_emissive;
    gl_Position = u_view_projection * u_model * vec4(a_position, 1.0);
}
"#;

    const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;

in vec3 v_normal;
in vec4 v_color;
in vec3 v_emissive;

uniform vec3 u_sky;
uniform vec3 u_ground;
uniform float u_intensity;

out vec4 out_color;

void main() {
    vec3 n = normalize(v_normal);
    vec3 light = mix(u_ground, u_sky, 0.5 * n.y + 0.5) * u_intensity;
    out_color = vec4(v_color.rgb * light + v_emissive, v_color.a);
}
"#;

    struct Uniforms {
        view_projection: Option<WebGlUniformLocation>,
        model: Option<WebGlUniformLocation>,
        normal_matrix: Option<WebGlUniformLocation>,
        sky: Option<WebGlUniformLocation>,
        ground: Option<WebGlUniformLocation>,
        intensity: Option<WebGlUniformLocation>,
    }

    /// A model's geometry once it lives on the GPU
    struct GpuModel {
        vao: WebGlVertexArrayObject,
        vertex_count: i32,
        transparent: bool,
    }

    /// Draws into a canvas through WebGL2
    pub struct GlRenderer {
        canvas: HtmlCanvasElement,
        gl: Gl,
        program: WebGlProgram,
        uniforms: Uniforms,
        left: Option<GpuModel>,
        right: Option<GpuModel>,
    }

    impl GlRenderer {
        pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
            let gl = canvas
                .get_context("webgl2")?
                .ok_or_else(|| JsValue::from_str("WebGL2 is not available"))?
                .dyn_into::<Gl>()?;

            let vertex = compile_shader(&gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
            let fragment = compile_shader(&gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
            let program = link_program(&gl, &vertex, &fragment)?;

            let uniforms = Uniforms {
                view_projection: gl.get_uniform_location(&program, "u_view_projection"),
                model: gl.get_uniform_location(&program, "u_model"),
                normal_matrix: gl.get_uniform_location(&program, "u_normal_matrix"),
                sky: gl.get_uniform_location(&program, "u_sky"),
                ground: gl.get_uniform_location(&program, "u_ground"),
                intensity: gl.get_uniform_location(&program, "u_intensity"),
            };

            gl.enable(Gl::DEPTH_TEST);
            gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);

            Ok(Self {
                canvas,
                gl,
                program,
                uniforms,
                left: None,
                right: None,
            })
        }

        fn upload(&self, model: &Model) -> Option<GpuModel> {
            let gl = &self.gl;
            let data = interleave(model);
            let vao = gl.create_vertex_array()?;
            let buffer = gl.create_buffer()?;

            gl.bind_vertex_array(Some(&vao));
            gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
            let array = js_sys::Float32Array::from(data.as_slice());
            gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, Gl::STATIC_DRAW);

            let stride = (FLOATS_PER_VERTEX * 4) as i32;
            for (location, size, offset) in [(0u32, 3, 0), (1, 3, 3), (2, 4, 6), (3, 3, 10)] {
                gl.enable_vertex_attrib_array(location);
                gl.vertex_attrib_pointer_with_i32(location, size, Gl::FLOAT, false, stride, offset * 4);
            }
            gl.bind_vertex_array(None);

            log::debug!("{:?} model uploaded: {} vertices", model.side, data.len() / FLOATS_PER_VERTEX);
            Some(GpuModel {
                vao,
                vertex_count: (data.len() / FLOATS_PER_VERTEX) as i32,
                transparent: has_transparency(model),
            })
        }

        fn draw_model(&mut self, model: &Model) {
            if self.gpu_slot(model.side).is_none() {
                match self.upload(model) {
                    Some(gpu) => *self.gpu_slot(model.side) = Some(gpu),
                    None => {
                        log::error!("could not allocate GPU buffers for {:?} model", model.side);
                        return;
                    }
                }
            }

            let gl = &self.gl;
            gl.uniform_matrix4fv_with_f32_array(
                self.uniforms.model.as_ref(),
                false,
                model.model_matrix().as_slice(),
            );
            gl.uniform_matrix3fv_with_f32_array(
                self.uniforms.normal_matrix.as_ref(),
                false,
                Transform::normal_matrix(&model.rotation).as_slice(),
            );

            let gpu = match model.side {
                Side::Left => self.left.as_ref(),
                Side::Right => self.right.as_ref(),
            };
            if let Some(gpu) = gpu {
                if gpu.transparent {
                    gl.enable(Gl::BLEND);
                } else {
                    gl.disable(Gl::BLEND);
                }
                gl.bind_vertex_array(Some(&gpu.vao));
                gl.draw_arrays(Gl::TRIANGLES, 0, gpu.vertex_count);
                gl.bind_vertex_array(None);
            }
        }

        fn gpu_slot(&mut self, side: Side) -> &mut Option<GpuModel> {
            match side {
                Side::Left => &mut self.left,
                Side::Right => &mut self.right,
            }
        }
    }

    impl RenderTarget for GlRenderer {
        fn set_size(&mut self, width: u32, height: u32) {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            let style = self.canvas.style();
            let _ = style.set_property("width", &format!("{width}px"));
            let _ = style.set_property("height", &format!("{height}px"));
            self.gl.viewport(0, 0, width as i32, height as i32);
        }

        fn render(&mut self, scene: &Scene, camera: &Camera) {
            let bg = scene.background;
            self.gl.clear_color(bg.r, bg.g, bg.b, 1.0);
            self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

            self.gl.use_program(Some(&self.program));
            self.gl.uniform_matrix4fv_with_f32_array(
                self.uniforms.view_projection.as_ref(),
                false,
                camera.view_projection().as_slice(),
            );
            let light = &scene.light;
            self.gl
                .uniform3fv_with_f32_array(self.uniforms.sky.as_ref(), &light.sky.to_array());
            self.gl
                .uniform3fv_with_f32_array(self.uniforms.ground.as_ref(), &light.ground.to_array());
            self.gl
                .uniform1f(self.uniforms.intensity.as_ref(), light.intensity);

            for model in scene.models() {
                self.draw_model(model);
            }
        }
    }

    fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
        let shader = gl
            .create_shader(kind)
            .ok_or_else(|| JsValue::from_str("unable to create shader"))?;
        gl.shader_source(&shader, source);
        gl.compile_shader(&shader);

        if gl
            .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(shader)
        } else {
            let info = gl.get_shader_info_log(&shader).unwrap_or_default();
            Err(JsValue::from_str(&format!("shader compile failed: {info}")))
        }
    }

    fn link_program(gl: &Gl, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram, JsValue> {
        let program = gl
            .create_program()
            .ok_or_else(|| JsValue::from_str("unable to create program"))?;
        gl.attach_shader(&program, vertex);
        gl.attach_shader(&program, fragment);
        gl.link_program(&program);

        if gl
            .get_program_parameter(&program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(program)
        } else {
            let info = gl.get_program_info_log(&program).unwrap_or_default();
            Err(JsValue::from_str(&format!("program link failed: {info}")))
        }
    }
}
