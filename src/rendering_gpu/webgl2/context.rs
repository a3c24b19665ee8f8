//! WebGL2 context wrapper with error handling

use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext, WebGlBuffer, WebGlContextAttributes, WebGlProgram,
    WebGlShader, WebGlTexture, WebGlVertexArrayObject,
};

use crate::error::{MatteError, MatteResult};

/// Wrapper around WebGl2RenderingContext with convenience methods
pub struct WebGL2Context {
    gl: WebGl2RenderingContext,
}

impl WebGL2Context {
    /// Request a context with alpha and non-premultiplied compositing.
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> MatteResult<Self> {
        let attributes = WebGlContextAttributes::new();
        attributes.set_alpha(true);
        attributes.set_premultiplied_alpha(false);

        let gl = canvas
            .get_context_with_context_options("webgl2", &attributes)?
            .ok_or(MatteError::ContextUnavailable)?
            .dyn_into::<WebGl2RenderingContext>()
            .map_err(|_| MatteError::ContextUnavailable)?;

        Self::new(gl)
    }

    pub fn new(gl: WebGl2RenderingContext) -> MatteResult<Self> {
        // getContext hands back the same object after a loss; wait for the restore.
        if gl.is_context_lost() {
            return Err(MatteError::ContextLost);
        }

        // Standard source-over compositing
        gl.enable(WebGl2RenderingContext::BLEND);
        gl.blend_func(
            WebGl2RenderingContext::SRC_ALPHA,
            WebGl2RenderingContext::ONE_MINUS_SRC_ALPHA,
        );
        gl.disable(WebGl2RenderingContext::DEPTH_TEST);

        Ok(Self { gl })
    }

    /// Get the raw WebGL2 context
    pub fn gl(&self) -> &WebGl2RenderingContext {
        &self.gl
    }

    pub fn is_lost(&self) -> bool {
        self.gl.is_context_lost()
    }

    /// Compile a shader from source
    pub fn compile_shader(&self, shader_type: u32, source: &str) -> MatteResult<WebGlShader> {
        let shader = self
            .gl
            .create_shader(shader_type)
            .ok_or(MatteError::Allocation("shader"))?;

        self.gl.shader_source(&shader, source);
        self.gl.compile_shader(&shader);

        if self
            .gl
            .get_shader_parameter(&shader, WebGl2RenderingContext::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(shader)
        } else {
            let log = self
                .gl
                .get_shader_info_log(&shader)
                .unwrap_or_else(|| "Unknown error".to_string());
            self.gl.delete_shader(Some(&shader));
            Err(MatteError::ShaderCompile(log))
        }
    }

    /// Link a program from vertex and fragment shaders
    pub fn link_program(
        &self,
        vertex_shader: &WebGlShader,
        fragment_shader: &WebGlShader,
    ) -> MatteResult<WebGlProgram> {
        let program = self
            .gl
            .create_program()
            .ok_or(MatteError::Allocation("program"))?;

        self.gl.attach_shader(&program, vertex_shader);
        self.gl.attach_shader(&program, fragment_shader);
        self.gl.link_program(&program);

        if self
            .gl
            .get_program_parameter(&program, WebGl2RenderingContext::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(program)
        } else {
            let log = self
                .gl
                .get_program_info_log(&program)
                .unwrap_or_else(|| "Unknown error".to_string());
            self.gl.delete_program(Some(&program));
            Err(MatteError::ProgramLink(log))
        }
    }

    pub fn create_buffer(&self) -> MatteResult<WebGlBuffer> {
        self.gl
            .create_buffer()
            .ok_or(MatteError::Allocation("buffer"))
    }

    pub fn create_vertex_array(&self) -> MatteResult<WebGlVertexArrayObject> {
        self.gl
            .create_vertex_array()
            .ok_or(MatteError::Allocation("vertex array"))
    }

    pub fn create_texture(&self) -> MatteResult<WebGlTexture> {
        self.gl
            .create_texture()
            .ok_or(MatteError::Allocation("texture"))
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    /// Clear to fully transparent black.
    pub fn clear_transparent(&self) {
        self.gl.clear_color(0.0, 0.0, 0.0, 0.0);
        self.gl.clear(WebGl2RenderingContext::COLOR_BUFFER_BIT);
    }
}
