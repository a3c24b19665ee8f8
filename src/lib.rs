//! Chroma-key video matte for the web.
//!
//! A looping `<video>` is drawn onto a `<canvas>` with its near-black
//! background either made transparent or replaced by a solid color. Work only
//! happens while the canvas is on screen and the host wants playback.

mod backend;
mod js_api;
mod utils;

pub mod config;
pub mod error;
pub mod frame_loop;
pub mod lifecycle;
pub mod matte;
pub mod rendering;
pub mod rendering_gpu;
pub mod session;

use utils::{init_logging, set_panic_hook};
use wasm_bindgen::prelude::*;

pub use config::{MatteConfig, MatteUniforms, Rgb, VideoFit};
pub use error::{MatteError, MatteResult};
pub use frame_loop::{FrameLoop, FrameScheduler};
pub use js_api::TransparentVideo;
pub use session::{FrameOutcome, MatteSurface, PlaybackSignal, RenderSession, VisibilitySignal};

#[wasm_bindgen(start)]
pub fn main() {
    set_panic_hook();
    init_logging();
}
