//! [`MatteSurface`] over a real `<video>` / `<canvas>` pair.

use wasm_bindgen::{JsValue, prelude::Closure};
use web_sys::{HtmlCanvasElement, HtmlVideoElement};

use crate::{
    config::{MatteConfig, MatteUniforms},
    error::{MatteError, MatteResult},
    rendering_gpu::{DynamicRenderer, MatteRenderer},
    session::MatteSurface,
};

pub struct BrowserSurface {
    video: HtmlVideoElement,
    canvas: HtmlCanvasElement,
    config: MatteConfig,
    renderer: Option<DynamicRenderer>,
    /// Shared rejection handler for play() promises.
    ignore_rejection: Closure<dyn FnMut(JsValue)>,
}

impl BrowserSurface {
    pub fn new(video: HtmlVideoElement, canvas: HtmlCanvasElement, config: MatteConfig) -> Self {
        let ignore_rejection = Closure::<dyn FnMut(JsValue)>::new(|err: JsValue| {
            // Autoplay policy; the next frame asks again.
            log::trace!("play() rejected: {:?}", err);
        });

        Self {
            video,
            canvas,
            config,
            renderer: None,
            ignore_rejection,
        }
    }
}

impl MatteSurface for BrowserSurface {
    fn video_size(&self) -> Option<(u32, u32)> {
        let (width, height) = (self.video.video_width(), self.video.video_height());
        if width == 0 || height == 0 {
            None
        } else {
            Some((width, height))
        }
    }

    fn is_paused(&self) -> bool {
        self.video.paused()
    }

    fn pause(&mut self) {
        if let Err(err) = self.video.pause() {
            log::warn!("Failed to pause video: {:?}", err);
        }
    }

    fn request_play(&mut self) {
        match self.video.play() {
            Ok(promise) => {
                let _ = promise.catch(&self.ignore_rejection);
            }
            Err(err) => log::trace!("play() threw: {:?}", err),
        }
    }

    fn init_renderer(&mut self) -> MatteResult<()> {
        let renderer = DynamicRenderer::create(&self.canvas, &self.config)?;
        log::debug!("Matte renderer initialized ({})", renderer.backend_name());
        self.renderer = Some(renderer);
        Ok(())
    }

    fn drop_renderer(&mut self) {
        self.renderer = None;
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_viewport(width, height);
        }
    }

    fn draw(&mut self, uniforms: &MatteUniforms) -> MatteResult<()> {
        let renderer = self.renderer.as_mut().ok_or(MatteError::ContextLost)?;
        renderer.draw(&self.video, uniforms)
    }
}
