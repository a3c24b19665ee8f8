//! CPU version of the matte fragment shader.
//!
//! Mirrors `MATTE_FRAGMENT_SHADER` pixel for pixel. The Canvas2D fallback renders
//! through it, and it is the reference the classification rules are tested against.

use image::{Rgba, RgbaImage};

use crate::config::{MatteConfig, Rgb};

/// Background classification: every channel strictly below `threshold`.
///
/// This is a per-channel AND against an implicit black baseline, not a distance
/// from the key color. A pixel that is dark in two channels and bright in the
/// third is never keyed.
#[inline]
pub fn is_key_pixel(pixel: &Rgba<u8>, threshold: u8) -> bool {
    let [r, g, b, _] = pixel.0;
    r < threshold && g < threshold && b < threshold
}

/// Output for a single pixel, given the matte parameters. Unkeyed pixels keep
/// their color at full opacity.
#[inline]
pub fn shade_pixel(pixel: &Rgba<u8>, threshold: u8, transparent: bool, substitute: Rgb) -> Rgba<u8> {
    if !is_key_pixel(pixel, threshold) {
        let [r, g, b, _] = pixel.0;
        return Rgba([r, g, b, 255]);
    }
    if transparent {
        Rgba([0, 0, 0, 0])
    } else {
        Rgba([substitute.0, substitute.1, substitute.2, 255])
    }
}

/// Apply the matte in place. Returns the number of keyed pixels.
pub fn apply_matte(frame: &mut RgbaImage, config: &MatteConfig) -> usize {
    let mut keyed = 0;
    for pixel in frame.pixels_mut() {
        if is_key_pixel(pixel, config.threshold) {
            keyed += 1;
        }
        *pixel = shade_pixel(pixel, config.threshold, config.transparent, config.key_color);
    }
    keyed
}

/// Apply the matte to raw RGBA bytes as read back from a 2D canvas.
///
/// Returns `None` when the buffer length does not match `width * height * 4`.
pub fn apply_matte_rgba(
    width: u32,
    height: u32,
    data: Vec<u8>,
    config: &MatteConfig,
) -> Option<Vec<u8>> {
    let mut frame = RgbaImage::from_raw(width, height, data)?;
    apply_matte(&mut frame, config);
    Some(frame.into_raw())
}
