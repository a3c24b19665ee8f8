//! Full-screen quad for the matte pass

use web_sys::{WebGl2RenderingContext, WebGlBuffer, WebGlVertexArrayObject};

use super::context::WebGL2Context;
use crate::error::MatteResult;

/// Position (x, y) + texcoord (u, v) for a 4-vertex triangle strip.
///
/// Positions cover clip space; v runs top to bottom so video frames come out upright.
#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; 16] = [
    // position   texcoord
    -1.0, -1.0,   0.0, 1.0,  // bottom-left
     1.0, -1.0,   1.0, 1.0,  // bottom-right
    -1.0,  1.0,   0.0, 0.0,  // top-left
     1.0,  1.0,   1.0, 0.0,  // top-right
];

const VERTEX_COUNT: i32 = 4;

pub struct QuadGeometry {
    vao: WebGlVertexArrayObject,
    vbo: WebGlBuffer,
}

impl QuadGeometry {
    pub fn new(context: &WebGL2Context) -> MatteResult<Self> {
        let gl = context.gl();

        let vao = context.create_vertex_array()?;
        gl.bind_vertex_array(Some(&vao));

        let vbo = context.create_buffer()?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&vbo));
        unsafe {
            let vertex_array = js_sys::Float32Array::view(&QUAD_VERTICES);
            gl.buffer_data_with_array_buffer_view(
                WebGl2RenderingContext::ARRAY_BUFFER,
                &vertex_array,
                WebGl2RenderingContext::STATIC_DRAW,
            );
        }

        let stride = 4 * std::mem::size_of::<f32>() as i32; // 4 floats per vertex

        // Position attribute (location = 0)
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 2, WebGl2RenderingContext::FLOAT, false, stride, 0);

        // Texcoord attribute (location = 1)
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(
            1,
            2,
            WebGl2RenderingContext::FLOAT,
            false,
            stride,
            (2 * std::mem::size_of::<f32>()) as i32,
        );

        gl.bind_vertex_array(None);

        Ok(Self { vao, vbo })
    }

    pub fn bind(&self, gl: &WebGl2RenderingContext) {
        gl.bind_vertex_array(Some(&self.vao));
    }

    pub fn draw(&self, gl: &WebGl2RenderingContext) {
        gl.draw_arrays(WebGl2RenderingContext::TRIANGLE_STRIP, 0, VERTEX_COUNT);
    }

    pub fn delete(&self, gl: &WebGl2RenderingContext) {
        gl.bind_vertex_array(None);
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_buffer(Some(&self.vbo));
    }
}
