//! Matte options supplied by the host page.
//!
//! The options are immutable for the lifetime of a session. Changing any of them
//! means tearing the session down and mounting a new one.

use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::{MatteError, MatteResult};

/// An 8-bit RGB triple, deserialized from a `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<[u8; 3]> for Rgb {
    fn from(value: [u8; 3]) -> Self {
        Rgb(value[0], value[1], value[2])
    }
}

impl Rgb {
    /// Channels scaled to the [0, 1] uniform range.
    pub fn normalized(&self) -> [f32; 3] {
        [
            normalize_channel(self.0),
            normalize_channel(self.1),
            normalize_channel(self.2),
        ]
    }
}

pub fn normalize_channel(value: u8) -> f32 {
    value as f32 / 255.0
}

/// How the canvas is fitted into its container box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFit {
    Contain,
    #[default]
    Cover,
}

impl VideoFit {
    pub fn css_object_fit(&self) -> &'static str {
        match self {
            VideoFit::Contain => "contain",
            VideoFit::Cover => "cover",
        }
    }
}

fn default_key_color() -> Rgb {
    Rgb(50, 50, 50)
}

fn default_threshold() -> u8 {
    30
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatteConfig {
    pub src: String,
    /// Color written over keyed pixels when `transparent` is off.
    #[serde(default = "default_key_color")]
    pub key_color: Rgb,
    #[serde(default)]
    pub transparent: bool,
    /// A pixel is keyed when each of R, G and B is strictly below this value.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    /// CSS color painted behind the canvas for contain-fitted, opaque mattes.
    #[serde(default)]
    pub substitute_background: Option<String>,
    #[serde(default)]
    pub fit: VideoFit,
    #[serde(default)]
    pub scale: Option<f32>,
    /// Fall back to a CPU matte on a 2D canvas when WebGL2 is unavailable.
    #[serde(default)]
    pub cpu_fallback: bool,
    #[serde(default)]
    pub playing: Option<bool>,
}

impl MatteConfig {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            key_color: default_key_color(),
            transparent: false,
            threshold: default_threshold(),
            substitute_background: None,
            fit: VideoFit::default(),
            scale: None,
            cpu_fallback: false,
            playing: None,
        }
    }

    pub fn from_json(json: &str) -> MatteResult<Self> {
        let config: MatteConfig =
            serde_json::from_str(json).map_err(|e| MatteError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read the options object handed over by the host page.
    pub fn from_js(options: &JsValue) -> MatteResult<Self> {
        let json = js_sys::JSON::stringify(options)
            .map_err(MatteError::from)?
            .as_string()
            .ok_or_else(|| MatteError::invalid_config("options must be an object"))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> MatteResult<()> {
        if self.src.trim().is_empty() {
            return Err(MatteError::invalid_config("src must not be empty"));
        }
        if let Some(scale) = self.scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(MatteError::invalid_config(format!(
                    "scale must be a positive number, got {}",
                    scale
                )));
            }
        }
        Ok(())
    }

    pub fn uniforms(&self) -> MatteUniforms {
        MatteUniforms {
            substitute_color: self.key_color.normalized(),
            threshold: normalize_channel(self.threshold),
            transparent: if self.transparent { 1.0 } else { 0.0 },
        }
    }

    /// CSS background for the canvas element itself.
    pub fn canvas_background(&self) -> &str {
        match (&self.substitute_background, self.fit, self.transparent) {
            (Some(color), VideoFit::Contain, false) => color.as_str(),
            _ => "transparent",
        }
    }
}

/// Uniform values as uploaded to the fragment shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatteUniforms {
    pub substitute_color: [f32; 3],
    pub threshold: f32,
    /// 1.0 for alpha-zero output, 0.0 for substitution.
    pub transparent: f32,
}

impl MatteUniforms {
    pub fn is_transparent(&self) -> bool {
        self.transparent > 0.5
    }
}
