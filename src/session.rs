//! Per-frame matte decisions.
//!
//! `RenderSession` owns everything that decides *whether* a frame gets drawn:
//! readiness, playback intent, visibility, lazy pipeline construction and
//! resizing. The actual video element, canvas and GL calls sit behind
//! [`MatteSurface`] so the same logic runs against the browser and against
//! test doubles.

use std::{cell::Cell, rc::Rc};

use crate::{
    config::{MatteConfig, MatteUniforms},
    error::{MatteError, MatteResult},
};

/// Everything the frame step needs from the outside world.
pub trait MatteSurface {
    /// Decoded frame dimensions, or `None` while the video has no metadata.
    fn video_size(&self) -> Option<(u32, u32)>;

    fn is_paused(&self) -> bool;

    fn pause(&mut self);

    /// Fire-and-forget play request. Rejections are swallowed by the surface.
    fn request_play(&mut self);

    /// Build the rendering pipeline against the drawable. The viewport of a
    /// fresh pipeline matches the current backing size.
    fn init_renderer(&mut self) -> MatteResult<()>;

    /// Forget the current pipeline so the next `init_renderer` starts over.
    fn drop_renderer(&mut self);

    /// Current backing-store size of the drawable.
    fn backing_size(&self) -> (u32, u32);

    /// Resize the backing store and the viewport transform.
    fn resize(&mut self, width: u32, height: u32);

    /// Clear, upload the current video frame, set uniforms and draw.
    fn draw(&mut self, uniforms: &MatteUniforms) -> MatteResult<()>;
}

/// Host-controlled playback intent.
///
/// `None` means no external control, `Some(true)` must play and `Some(false)`
/// must pause. Clones share one slot, so the frame loop always reads the value
/// most recently written by the host.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSignal(Rc<Cell<Option<bool>>>);

impl PlaybackSignal {
    pub fn new(initial: Option<bool>) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    pub fn get(&self) -> Option<bool> {
        self.0.get()
    }

    pub fn set(&self, value: Option<bool>) {
        self.0.set(value);
    }
}

/// Whether the container currently overlaps the viewport.
#[derive(Debug, Clone)]
pub struct VisibilitySignal(Rc<Cell<bool>>);

impl Default for VisibilitySignal {
    // Assume visible until the observer reports otherwise.
    fn default() -> Self {
        Self(Rc::new(Cell::new(true)))
    }
}

impl VisibilitySignal {
    pub fn get(&self) -> bool {
        self.0.get()
    }

    pub fn set(&self, visible: bool) {
        self.0.set(visible);
    }
}

/// What a single frame step ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The video has no decoded dimensions yet.
    NotReady,
    /// Playback intent is `false`; the video is (now) paused.
    Paused,
    /// The video was paused and a play request went out.
    PlayRequested,
    /// Off-screen; the video keeps decoding but nothing is drawn.
    Hidden,
    /// No pipeline could be built for this drawable.
    Unavailable,
    /// The context was lost; the pipeline is rebuilt on the next eligible frame.
    ContextLost,
    Drawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    Pending,
    Ready,
    Unavailable,
}

pub struct RenderSession<S: MatteSurface> {
    surface: S,
    uniforms: MatteUniforms,
    playback: PlaybackSignal,
    visibility: VisibilitySignal,
    pipeline: PipelineState,
}

impl<S: MatteSurface> RenderSession<S> {
    pub fn new(
        surface: S,
        config: &MatteConfig,
        playback: PlaybackSignal,
        visibility: VisibilitySignal,
    ) -> Self {
        Self {
            surface,
            uniforms: config.uniforms(),
            playback,
            visibility,
            pipeline: PipelineState::Pending,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_rendering(&self) -> bool {
        self.pipeline == PipelineState::Ready
    }

    /// Run one frame. Never fails; every error becomes an outcome.
    pub fn step(&mut self) -> FrameOutcome {
        let Some((width, height)) = self.surface.video_size() else {
            return FrameOutcome::NotReady;
        };

        // Explicit pause intent wins over visibility.
        if self.playback.get() == Some(false) {
            if !self.surface.is_paused() {
                self.surface.pause();
            }
            return FrameOutcome::Paused;
        }

        if self.surface.is_paused() {
            self.surface.request_play();
            return FrameOutcome::PlayRequested;
        }

        if !self.visibility.get() {
            return FrameOutcome::Hidden;
        }

        match self.pipeline {
            PipelineState::Unavailable => return FrameOutcome::Unavailable,
            PipelineState::Pending => {
                if let Some(outcome) = self.init_pipeline() {
                    return outcome;
                }
            }
            PipelineState::Ready => {}
        }

        if self.surface.backing_size() != (width, height) {
            log::debug!("Resizing matte canvas to {}x{}", width, height);
            self.surface.resize(width, height);
        }

        match self.surface.draw(&self.uniforms) {
            Ok(()) => FrameOutcome::Drawn,
            Err(err) if err.is_recoverable() => {
                log::warn!("Matte draw failed, rebuilding pipeline: {}", err);
                self.surface.drop_renderer();
                self.pipeline = PipelineState::Pending;
                FrameOutcome::ContextLost
            }
            Err(err) => {
                log::warn!("Matte draw failed, rendering disabled: {}", err);
                self.surface.drop_renderer();
                self.pipeline = PipelineState::Unavailable;
                FrameOutcome::Unavailable
            }
        }
    }

    /// Returns an outcome when the frame must stop here.
    fn init_pipeline(&mut self) -> Option<FrameOutcome> {
        match self.surface.init_renderer() {
            Ok(()) => {
                log::debug!("Matte pipeline ready");
                self.pipeline = PipelineState::Ready;
                None
            }
            Err(MatteError::ContextLost) => {
                log::debug!("Context still lost, retrying next frame");
                Some(FrameOutcome::ContextLost)
            }
            Err(err) => {
                log::warn!("Matte rendering unavailable: {}", err);
                self.pipeline = PipelineState::Unavailable;
                Some(FrameOutcome::Unavailable)
            }
        }
    }
}
