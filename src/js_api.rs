use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement, HtmlVideoElement};

use crate::{config::MatteConfig, lifecycle::MountedMatte, rendering_gpu::is_webgl_supported};

/// A video rendered onto a canvas with its near-black background keyed out.
///
/// The host owns the elements; this object owns the rendering session and must
/// be disposed (or garbage collected) when the elements leave the page.
#[wasm_bindgen]
pub struct TransparentVideo {
    mounted: MountedMatte,
}

#[wasm_bindgen]
impl TransparentVideo {
    /// Mount a session. Throws only when `options` is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        video: HtmlVideoElement,
        canvas: HtmlCanvasElement,
        options: JsValue,
    ) -> Result<TransparentVideo, JsValue> {
        let config = MatteConfig::from_js(&options)?;
        if video.src().is_empty() {
            video.set_src(&config.src);
        }
        let mounted = MountedMatte::mount(container, video, canvas, config)?;
        Ok(TransparentVideo { mounted })
    }

    /// `true` plays, `false` pauses, `undefined` hands control back to autoplay.
    #[wasm_bindgen(js_name = setPlaying)]
    pub fn set_playing(&self, playing: Option<bool>) {
        self.mounted.set_playing(playing);
    }

    #[wasm_bindgen(js_name = isRendering)]
    pub fn is_rendering(&self) -> bool {
        self.mounted.is_rendering()
    }

    pub fn dispose(&mut self) {
        self.mounted.unmount();
    }

    #[wasm_bindgen(js_name = isSupported)]
    pub fn is_supported() -> bool {
        is_webgl_supported()
    }
}
