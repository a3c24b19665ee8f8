//! WebGL2 matte pipeline
//!
//! One context, one program, one quad and one texture per session. The whole
//! pipeline is built lazily on the first frame that actually draws, because the
//! canvas may still be 0x0 when the session mounts.

mod context;
mod geometry;
mod shaders;
mod texture;

use web_sys::{HtmlCanvasElement, HtmlVideoElement};

use crate::{
    config::MatteUniforms,
    error::{MatteError, MatteResult},
};

pub use context::WebGL2Context;
pub use geometry::{QUAD_VERTICES, QuadGeometry};
pub use shaders::{MATTE_FRAGMENT_SHADER, MATTE_VERTEX_SHADER, MatteProgram};
pub use texture::VideoTexture;

pub struct MattePipeline {
    context: WebGL2Context,
    program: MatteProgram,
    quad: QuadGeometry,
    texture: VideoTexture,
}

impl MattePipeline {
    pub fn new(canvas: &HtmlCanvasElement) -> MatteResult<Self> {
        let context = WebGL2Context::from_canvas(canvas)?;
        let program = MatteProgram::new(&context)?;
        let quad = QuadGeometry::new(&context)?;
        let texture = VideoTexture::new(&context)?;

        context.set_viewport(canvas.width(), canvas.height());

        Ok(Self {
            context,
            program,
            quad,
            texture,
        })
    }

    pub fn context(&self) -> &WebGL2Context {
        &self.context
    }

    pub fn program(&self) -> &MatteProgram {
        &self.program
    }

    pub fn texture_size(&self) -> (u32, u32) {
        self.texture.size()
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.context.set_viewport(width, height);
    }

    /// Clear, upload the current video frame and draw the matte quad.
    pub fn draw(&mut self, video: &HtmlVideoElement, uniforms: &MatteUniforms) -> MatteResult<()> {
        if self.context.is_lost() {
            return Err(MatteError::ContextLost);
        }
        let gl = self.context.gl();

        self.context.clear_transparent();

        self.program.bind(gl);
        self.texture.bind(gl);
        if let Err(err) = self.texture.upload(gl, video) {
            // Only a confirmed loss is worth a rebuild
            return Err(if self.context.is_lost() {
                MatteError::ContextLost
            } else {
                err
            });
        }
        self.program.set_uniforms(gl, uniforms);

        self.quad.bind(gl);
        self.quad.draw(gl);

        // A loss during the frame surfaces only through the context flag
        if self.context.is_lost() {
            return Err(MatteError::ContextLost);
        }
        Ok(())
    }
}

impl Drop for MattePipeline {
    fn drop(&mut self) {
        // Objects of a lost context are already gone
        if self.context.is_lost() {
            return;
        }
        let gl = self.context.gl();
        self.texture.delete(gl);
        self.quad.delete(gl);
        self.program.delete(gl);
    }
}
