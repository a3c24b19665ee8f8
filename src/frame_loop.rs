//! Animation-frame driven loop around a [`RenderSession`].

use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::{JsCast, prelude::Closure};
use web_sys::Window;

use crate::{
    error::{MatteError, MatteResult},
    session::{FrameOutcome, MatteSurface, RenderSession},
};

/// Something that can schedule the next repaint callback.
pub trait FrameScheduler {
    type Handle: Copy;

    fn request_frame(&self) -> MatteResult<Self::Handle>;

    /// Cancelling a handle that already fired or was cancelled is a no-op.
    fn cancel_frame(&self, handle: Self::Handle);
}

/// Keeps at most one frame callback pending for its session.
pub struct FrameLoop<S: MatteSurface, F: FrameScheduler> {
    session: RenderSession<S>,
    scheduler: F,
    pending: Option<F::Handle>,
    stopped: bool,
}

impl<S: MatteSurface, F: FrameScheduler> FrameLoop<S, F> {
    pub fn new(session: RenderSession<S>, scheduler: F) -> Self {
        Self {
            session,
            scheduler,
            pending: None,
            stopped: false,
        }
    }

    pub fn session(&self) -> &RenderSession<S> {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        !self.stopped && self.pending.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// (Re)start the loop. Any pending callback is replaced, never duplicated.
    pub fn start(&mut self) {
        if self.stopped {
            return;
        }
        self.cancel_pending();
        self.schedule();
    }

    /// Body of the frame callback.
    ///
    /// Reschedules before stepping so a bad frame never ends the loop.
    pub fn tick(&mut self) -> Option<FrameOutcome> {
        if self.stopped {
            return None;
        }
        self.schedule();
        Some(self.session.step())
    }

    /// Cancel the pending callback for good. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if !self.stopped {
            log::debug!("Stopping matte frame loop");
        }
        self.stopped = true;
        self.cancel_pending();
    }

    fn schedule(&mut self) {
        match self.scheduler.request_frame() {
            Ok(handle) => self.pending = Some(handle),
            Err(err) => {
                log::warn!("Failed to request animation frame: {}", err);
                self.pending = None;
            }
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

/// Slot for the JS callback that `requestAnimationFrame` invokes.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` on the page's window.
pub struct AnimationFrameScheduler {
    window: Window,
    callback: FrameCallback,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    type Handle = i32;

    fn request_frame(&self) -> MatteResult<i32> {
        let callback = self.callback.borrow();
        let callback = callback
            .as_ref()
            .ok_or_else(|| MatteError::Js("frame callback not installed".to_string()))?;
        Ok(self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())?)
    }

    fn cancel_frame(&self, handle: i32) {
        if let Err(err) = self.window.cancel_animation_frame(handle) {
            log::debug!("cancelAnimationFrame failed: {:?}", err);
        }
    }
}
