//! Rendering backends for the matte
//!
//! WebGL2 is the primary backend and WebGL1 the second choice. The Canvas2D
//! renderer in `crate::rendering` is only used when neither context is available
//! and the host opted into the CPU fallback.

pub mod webgl1;
pub mod webgl2;

use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlVideoElement};

use crate::{
    config::{MatteConfig, MatteUniforms},
    error::{MatteError, MatteResult},
    rendering::Canvas2dMatteRenderer,
};

/// Common trait for all matte backends
pub trait MatteRenderer {
    /// Draw the current video frame with the matte applied
    fn draw(&mut self, video: &HtmlVideoElement, uniforms: &MatteUniforms) -> MatteResult<()>;

    /// Match the viewport to a resized backing store
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Get the backend name for debugging
    fn backend_name(&self) -> &'static str;
}

/// Check if this browser hands out a context of the given kind
fn is_context_supported(kind: &str) -> bool {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let Ok(canvas) = document.create_element("canvas") {
                if let Ok(canvas) = canvas.dyn_into::<HtmlCanvasElement>() {
                    return canvas.get_context(kind).ok().flatten().is_some();
                }
            }
        }
    }
    false
}

/// Check if either WebGL2 or WebGL1 is supported in this browser
pub fn is_webgl_supported() -> bool {
    is_context_supported("webgl2") || is_context_supported("webgl")
}

/// WebGL2 or WebGL1 pipeline, or the Canvas2D fallback
pub enum DynamicRenderer {
    WebGL2(webgl2::MattePipeline),
    WebGL1(webgl1::WebGL1MattePipeline),
    Canvas2D(Canvas2dMatteRenderer),
}

impl DynamicRenderer {
    /// Build the WebGL2 pipeline, then WebGL1, then Canvas2D when allowed.
    pub fn create(canvas: &HtmlCanvasElement, config: &MatteConfig) -> MatteResult<Self> {
        match webgl2::MattePipeline::new(canvas) {
            Ok(pipeline) => return Ok(DynamicRenderer::WebGL2(pipeline)),
            Err(MatteError::ContextUnavailable) => {
                log::info!("WebGL2 unavailable, trying WebGL1");
            }
            Err(err) => return Err(err),
        }

        match webgl1::WebGL1MattePipeline::new(canvas) {
            Ok(pipeline) => Ok(DynamicRenderer::WebGL1(pipeline)),
            Err(MatteError::ContextUnavailable) if config.cpu_fallback => {
                log::info!("WebGL unavailable, using Canvas2D matte fallback");
                Ok(DynamicRenderer::Canvas2D(Canvas2dMatteRenderer::new(
                    canvas,
                    config.clone(),
                )?))
            }
            Err(err) => Err(err),
        }
    }
}

impl MatteRenderer for DynamicRenderer {
    fn draw(&mut self, video: &HtmlVideoElement, uniforms: &MatteUniforms) -> MatteResult<()> {
        match self {
            DynamicRenderer::WebGL2(r) => r.draw(video, uniforms),
            DynamicRenderer::WebGL1(r) => r.draw(video, uniforms),
            DynamicRenderer::Canvas2D(r) => r.draw(video, uniforms),
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        match self {
            DynamicRenderer::WebGL2(r) => r.set_viewport(width, height),
            DynamicRenderer::WebGL1(r) => r.set_viewport(width, height),
            DynamicRenderer::Canvas2D(r) => r.set_viewport(width, height),
        }
    }

    fn backend_name(&self) -> &'static str {
        match self {
            DynamicRenderer::WebGL2(_) => "webgl2",
            DynamicRenderer::WebGL1(_) => "webgl1",
            DynamicRenderer::Canvas2D(r) => r.backend_name(),
        }
    }
}
