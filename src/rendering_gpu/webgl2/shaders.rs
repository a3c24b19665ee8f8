//! Matte shader program
//!
//! The vertex stage passes a full-screen quad straight through to clip space.
//! The fragment stage keys out pixels whose R, G and B are all below the
//! threshold and replaces them with either full transparency or the
//! substitute color. `crate::matte` carries the same rules on the CPU.

use web_sys::{WebGl2RenderingContext, WebGlProgram, WebGlUniformLocation};

use super::context::WebGL2Context;
use crate::{config::MatteUniforms, error::MatteResult};

pub const MATTE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec2 a_position;
layout(location = 1) in vec2 a_texcoord;

out vec2 v_texcoord;

void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
    v_texcoord = a_texcoord;
}
"#;

pub const MATTE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;

in vec2 v_texcoord;

uniform sampler2D u_texture;
uniform vec3 u_substitute_color;
uniform float u_threshold;
uniform float u_transparent;

out vec4 fragColor;

void main() {
    vec4 src = texture(u_texture, v_texcoord);

    // Per-channel test against black, not a distance from a key color
    bool is_key = src.r < u_threshold && src.g < u_threshold && src.b < u_threshold;

    if (!is_key) {
        fragColor = vec4(src.rgb, 1.0);
    } else if (u_transparent > 0.5) {
        fragColor = vec4(0.0, 0.0, 0.0, 0.0);
    } else {
        fragColor = vec4(u_substitute_color, 1.0);
    }
}
"#;

/// Compiled matte program with uniform locations
pub struct MatteProgram {
    pub program: WebGlProgram,
    pub u_texture: Option<WebGlUniformLocation>,
    pub u_substitute_color: Option<WebGlUniformLocation>,
    pub u_threshold: Option<WebGlUniformLocation>,
    pub u_transparent: Option<WebGlUniformLocation>,
}

impl MatteProgram {
    /// Compile and link the matte program
    pub fn new(context: &WebGL2Context) -> MatteResult<Self> {
        let gl = context.gl();

        let vert_shader =
            context.compile_shader(WebGl2RenderingContext::VERTEX_SHADER, MATTE_VERTEX_SHADER)?;
        let frag_shader = match context
            .compile_shader(WebGl2RenderingContext::FRAGMENT_SHADER, MATTE_FRAGMENT_SHADER)
        {
            Ok(shader) => shader,
            Err(err) => {
                gl.delete_shader(Some(&vert_shader));
                return Err(err);
            }
        };

        let linked = context.link_program(&vert_shader, &frag_shader);

        // Clean up shaders after linking
        gl.delete_shader(Some(&vert_shader));
        gl.delete_shader(Some(&frag_shader));
        let program = linked?;

        Ok(Self {
            u_texture: gl.get_uniform_location(&program, "u_texture"),
            u_substitute_color: gl.get_uniform_location(&program, "u_substitute_color"),
            u_threshold: gl.get_uniform_location(&program, "u_threshold"),
            u_transparent: gl.get_uniform_location(&program, "u_transparent"),
            program,
        })
    }

    pub fn bind(&self, gl: &WebGl2RenderingContext) {
        gl.use_program(Some(&self.program));
        // Sampler reads from texture unit 0
        gl.uniform1i(self.u_texture.as_ref(), 0);
    }

    pub fn delete(&self, gl: &WebGl2RenderingContext) {
        gl.use_program(None);
        gl.delete_program(Some(&self.program));
    }

    pub fn set_uniforms(&self, gl: &WebGl2RenderingContext, uniforms: &MatteUniforms) {
        let [r, g, b] = uniforms.substitute_color;
        gl.uniform3f(self.u_substitute_color.as_ref(), r, g, b);
        gl.uniform1f(self.u_threshold.as_ref(), uniforms.threshold);
        gl.uniform1f(self.u_transparent.as_ref(), uniforms.transparent);
    }
}
