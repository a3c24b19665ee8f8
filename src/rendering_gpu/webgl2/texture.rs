//! Texture that receives one decoded video frame per draw.

use web_sys::{HtmlVideoElement, WebGl2RenderingContext, WebGlTexture};

use super::context::WebGL2Context;
use crate::error::MatteResult;

pub struct VideoTexture {
    texture: WebGlTexture,
    /// Dimensions of the backing store after the last upload.
    size: (u32, u32),
}

impl VideoTexture {
    /// Clamp-to-edge, linear filtering, no mipmaps.
    pub fn new(context: &WebGL2Context) -> MatteResult<Self> {
        let gl = context.gl();
        let texture = context.create_texture()?;
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, Some(&texture));

        for (param, value) in [
            (WebGl2RenderingContext::TEXTURE_WRAP_S, WebGl2RenderingContext::CLAMP_TO_EDGE),
            (WebGl2RenderingContext::TEXTURE_WRAP_T, WebGl2RenderingContext::CLAMP_TO_EDGE),
            (WebGl2RenderingContext::TEXTURE_MIN_FILTER, WebGl2RenderingContext::LINEAR),
            (WebGl2RenderingContext::TEXTURE_MAG_FILTER, WebGl2RenderingContext::LINEAR),
        ] {
            gl.tex_parameteri(WebGl2RenderingContext::TEXTURE_2D, param, value as i32);
        }

        Ok(Self {
            texture,
            size: (0, 0),
        })
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn bind(&self, gl: &WebGl2RenderingContext) {
        gl.active_texture(WebGl2RenderingContext::TEXTURE0);
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, Some(&self.texture));
    }

    pub fn delete(&self, gl: &WebGl2RenderingContext) {
        gl.delete_texture(Some(&self.texture));
    }

    /// Replace the whole texture with the video's current frame.
    pub fn upload(&mut self, gl: &WebGl2RenderingContext, video: &HtmlVideoElement) -> MatteResult<()> {
        gl.tex_image_2d_with_u32_and_u32_and_html_video_element(
            WebGl2RenderingContext::TEXTURE_2D,
            0,
            WebGl2RenderingContext::RGBA as i32,
            WebGl2RenderingContext::RGBA,
            WebGl2RenderingContext::UNSIGNED_BYTE,
            video,
        )?;

        let size = (video.video_width(), video.video_height());
        if size != self.size {
            log::debug!(
                "Video texture reallocated {}x{} -> {}x{}",
                self.size.0,
                self.size.1,
                size.0,
                size.1
            );
            self.size = size;
        }
        Ok(())
    }
}
