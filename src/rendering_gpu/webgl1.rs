//! WebGL1 matte pipeline for browsers without WebGL2
//!
//! Same keying rules as the WebGL2 pipeline, written against GLSL ES 1.00. There
//! are no vertex array objects in core WebGL1, so attributes are re-bound from the
//! quad buffer on every draw.

use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, HtmlVideoElement, WebGlBuffer, WebGlContextAttributes, WebGlProgram,
    WebGlRenderingContext as GL, WebGlShader, WebGlTexture, WebGlUniformLocation,
};

use super::webgl2::QUAD_VERTICES;
use crate::{
    config::MatteUniforms,
    error::{MatteError, MatteResult},
};

pub const MATTE_VERTEX_SHADER_100: &str = r#"
attribute vec2 a_position;
attribute vec2 a_texcoord;

varying vec2 v_texcoord;

void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
    v_texcoord = a_texcoord;
}
"#;

pub const MATTE_FRAGMENT_SHADER_100: &str = r#"
precision mediump float;

varying vec2 v_texcoord;

uniform sampler2D u_texture;
uniform vec3 u_substitute_color;
uniform float u_threshold;
uniform float u_transparent;

void main() {
    vec4 src = texture2D(u_texture, v_texcoord);

    bool is_key = src.r < u_threshold && src.g < u_threshold && src.b < u_threshold;

    if (!is_key) {
        gl_FragColor = vec4(src.rgb, 1.0);
    } else if (u_transparent > 0.5) {
        gl_FragColor = vec4(0.0, 0.0, 0.0, 0.0);
    } else {
        gl_FragColor = vec4(u_substitute_color, 1.0);
    }
}
"#;

const FLOAT_SIZE: i32 = std::mem::size_of::<f32>() as i32;

pub struct WebGL1MattePipeline {
    gl: GL,
    program: WebGlProgram,
    a_position: u32,
    a_texcoord: u32,
    u_texture: Option<WebGlUniformLocation>,
    u_substitute_color: Option<WebGlUniformLocation>,
    u_threshold: Option<WebGlUniformLocation>,
    u_transparent: Option<WebGlUniformLocation>,
    vbo: WebGlBuffer,
    texture: WebGlTexture,
}

impl WebGL1MattePipeline {
    pub fn new(canvas: &HtmlCanvasElement) -> MatteResult<Self> {
        let attributes = WebGlContextAttributes::new();
        attributes.set_alpha(true);
        attributes.set_premultiplied_alpha(false);

        let gl = canvas
            .get_context_with_context_options("webgl", &attributes)?
            .ok_or(MatteError::ContextUnavailable)?
            .dyn_into::<GL>()
            .map_err(|_| MatteError::ContextUnavailable)?;
        if gl.is_context_lost() {
            return Err(MatteError::ContextLost);
        }

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.disable(GL::DEPTH_TEST);

        let program = build_program(&gl)?;
        let a_position = attrib_location(&gl, &program, "a_position")?;
        let a_texcoord = attrib_location(&gl, &program, "a_texcoord")?;

        let vbo = gl.create_buffer().ok_or(MatteError::Allocation("buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vbo));
        unsafe {
            let vertex_array = js_sys::Float32Array::view(&QUAD_VERTICES);
            gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertex_array, GL::STATIC_DRAW);
        }

        let texture = gl.create_texture().ok_or(MatteError::Allocation("texture"))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        for (param, value) in [
            (GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE),
            (GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE),
            (GL::TEXTURE_MIN_FILTER, GL::LINEAR),
            (GL::TEXTURE_MAG_FILTER, GL::LINEAR),
        ] {
            gl.tex_parameteri(GL::TEXTURE_2D, param, value as i32);
        }

        gl.viewport(0, 0, canvas.width() as i32, canvas.height() as i32);

        Ok(Self {
            u_texture: gl.get_uniform_location(&program, "u_texture"),
            u_substitute_color: gl.get_uniform_location(&program, "u_substitute_color"),
            u_threshold: gl.get_uniform_location(&program, "u_threshold"),
            u_transparent: gl.get_uniform_location(&program, "u_transparent"),
            gl,
            program,
            a_position,
            a_texcoord,
            vbo,
            texture,
        })
    }

    pub fn gl(&self) -> &GL {
        &self.gl
    }

    pub fn program(&self) -> &WebGlProgram {
        &self.program
    }

    pub fn has_uniforms(&self) -> bool {
        self.u_substitute_color.is_some() && self.u_threshold.is_some() && self.u_transparent.is_some()
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    pub fn draw(&mut self, video: &HtmlVideoElement, uniforms: &MatteUniforms) -> MatteResult<()> {
        let gl = &self.gl;
        if gl.is_context_lost() {
            return Err(MatteError::ContextLost);
        }

        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        gl.use_program(Some(&self.program));
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.texture));
        gl.uniform1i(self.u_texture.as_ref(), 0);

        if let Err(err) = gl.tex_image_2d_with_u32_and_u32_and_video(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            video,
        ) {
            return Err(if gl.is_context_lost() {
                MatteError::ContextLost
            } else {
                err.into()
            });
        }

        let [r, g, b] = uniforms.substitute_color;
        gl.uniform3f(self.u_substitute_color.as_ref(), r, g, b);
        gl.uniform1f(self.u_threshold.as_ref(), uniforms.threshold);
        gl.uniform1f(self.u_transparent.as_ref(), uniforms.transparent);

        let stride = 4 * FLOAT_SIZE;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.vbo));
        gl.enable_vertex_attrib_array(self.a_position);
        gl.vertex_attrib_pointer_with_i32(self.a_position, 2, GL::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(self.a_texcoord);
        gl.vertex_attrib_pointer_with_i32(self.a_texcoord, 2, GL::FLOAT, false, stride, 2 * FLOAT_SIZE);

        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);

        if gl.is_context_lost() {
            return Err(MatteError::ContextLost);
        }
        Ok(())
    }
}

impl Drop for WebGL1MattePipeline {
    fn drop(&mut self) {
        if self.gl.is_context_lost() {
            return;
        }
        self.gl.use_program(None);
        self.gl.delete_texture(Some(&self.texture));
        self.gl.delete_buffer(Some(&self.vbo));
        self.gl.delete_program(Some(&self.program));
    }
}

fn attrib_location(gl: &GL, program: &WebGlProgram, name: &'static str) -> MatteResult<u32> {
    // -1 when the linker dropped the attribute
    u32::try_from(gl.get_attrib_location(program, name))
        .map_err(|_| MatteError::ProgramLink(format!("missing attribute {}", name)))
}

fn build_program(gl: &GL) -> MatteResult<WebGlProgram> {
    let vert_shader = compile_shader(gl, GL::VERTEX_SHADER, MATTE_VERTEX_SHADER_100)?;
    let frag_shader = match compile_shader(gl, GL::FRAGMENT_SHADER, MATTE_FRAGMENT_SHADER_100) {
        Ok(shader) => shader,
        Err(err) => {
            gl.delete_shader(Some(&vert_shader));
            return Err(err);
        }
    };

    let program = gl.create_program().ok_or(MatteError::Allocation("program"));
    let linked = program.and_then(|program| {
        gl.attach_shader(&program, &vert_shader);
        gl.attach_shader(&program, &frag_shader);
        gl.link_program(&program);
        if gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(program)
        } else {
            let log = gl
                .get_program_info_log(&program)
                .unwrap_or_else(|| "Unknown error".to_string());
            gl.delete_program(Some(&program));
            Err(MatteError::ProgramLink(log))
        }
    });

    gl.delete_shader(Some(&vert_shader));
    gl.delete_shader(Some(&frag_shader));
    linked
}

fn compile_shader(gl: &GL, shader_type: u32, source: &str) -> MatteResult<WebGlShader> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or(MatteError::Allocation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "Unknown error".to_string());
        gl.delete_shader(Some(&shader));
        Err(MatteError::ShaderCompile(log))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glsl_100_sources_avoid_es3_syntax() {
        for source in [MATTE_VERTEX_SHADER_100, MATTE_FRAGMENT_SHADER_100] {
            assert!(!source.contains("#version"));
            assert!(!source.contains("layout("));
        }
        assert!(MATTE_FRAGMENT_SHADER_100.contains("gl_FragColor = vec4(src.rgb, 1.0)"));
    }
}
