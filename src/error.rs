//! Error taxonomy for the matte renderer.
//!
//! Only [`MatteError::InvalidConfig`] ever crosses the JS boundary, and only while
//! constructing a session. Everything else is absorbed by the frame loop.

use wasm_bindgen::JsValue;

pub type MatteResult<T> = Result<T, MatteError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MatteError {
    /// The canvas could not produce a WebGL2 (or 2D fallback) context.
    #[error("rendering context unavailable")]
    ContextUnavailable,

    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    #[error("program linking failed: {0}")]
    ProgramLink(String),

    /// A GL object (buffer, texture, VAO) could not be created.
    #[error("failed to allocate {0}")]
    Allocation(&'static str),

    #[error("rendering context lost")]
    ContextLost,

    #[error("invalid matte options: {0}")]
    InvalidConfig(String),

    /// Exception thrown by a browser API.
    #[error("js error: {0}")]
    Js(String),
}

impl MatteError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether the next eligible frame should rebuild the pipeline.
    ///
    /// Only a lost context qualifies. Exceptions on a live context (a tainted
    /// video, for one) would fail the same way on a rebuilt pipeline.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MatteError::ContextLost)
    }
}

impl From<JsValue> for MatteError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", value));
        MatteError::Js(message)
    }
}

impl From<MatteError> for JsValue {
    fn from(value: MatteError) -> Self {
        js_sys::Error::new(&value.to_string()).into()
    }
}
