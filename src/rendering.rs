use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, ImageData};

use crate::{
    config::{MatteConfig, MatteUniforms},
    error::{MatteError, MatteResult},
    matte::apply_matte_rgba,
    rendering_gpu::MatteRenderer,
};

/// CPU matte drawn through a 2D context.
///
/// Much slower than the shader path: every frame is read back, keyed in Rust
/// and written again.
pub struct Canvas2dMatteRenderer {
    ctx2d: CanvasRenderingContext2d,
    config: MatteConfig,
    size: (u32, u32),
}

impl Canvas2dMatteRenderer {
    pub fn new(canvas: &HtmlCanvasElement, config: MatteConfig) -> MatteResult<Self> {
        let ctx2d = canvas
            .get_context("2d")?
            .ok_or(MatteError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| MatteError::ContextUnavailable)?;

        Ok(Self {
            ctx2d,
            config,
            size: (canvas.width(), canvas.height()),
        })
    }

    /// Wipe whatever the last draw left on the canvas.
    pub fn discard_frame(&self) {
        let (width, height) = self.size;
        self.ctx2d.clear_rect(0.0, 0.0, width as f64, height as f64);
    }
}

impl MatteRenderer for Canvas2dMatteRenderer {
    fn draw(&mut self, video: &HtmlVideoElement, _uniforms: &MatteUniforms) -> MatteResult<()> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Ok(());
        }
        let (w, h) = (width as f64, height as f64);

        self.discard_frame();
        self.ctx2d
            .draw_image_with_html_video_element_and_dw_and_dh(video, 0.0, 0.0, w, h)?;

        // Cross-origin video taints the canvas; read-back is refused for good.
        let frame = match self.ctx2d.get_image_data(0.0, 0.0, w, h) {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("Canvas read-back refused: {:?}", err);
                // Never leave the unmatted frame on screen
                self.discard_frame();
                return Err(MatteError::ContextUnavailable);
            }
        };

        let data = apply_matte_rgba(width, height, frame.data().0, &self.config)
            .ok_or_else(|| MatteError::Js("unexpected image data length".to_string()))?;
        let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(data.as_slice()), width, height)?;
        self.ctx2d.put_image_data(&image, 0.0, 0.0)?;
        Ok(())
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn backend_name(&self) -> &'static str {
        "canvas2d"
    }
}
