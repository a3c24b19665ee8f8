#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use video_matte::{
    FrameLoop, FrameScheduler, MatteConfig, MatteError, MatteResult, MatteSurface, MatteUniforms,
    PlaybackSignal, RenderSession, VisibilitySignal,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub backing: (u32, u32),
    pub video: (u32, u32),
    pub uniforms: MatteUniforms,
}

/// In-memory video + canvas that records every call the session makes.
#[derive(Debug, Default)]
pub struct FakeSurface {
    pub video_size: Option<(u32, u32)>,
    pub paused: bool,
    /// When false, play requests are "rejected" and the video stays paused.
    pub autoplay_allowed: bool,
    pub backing: (u32, u32),
    pub has_renderer: bool,
    pub pause_calls: usize,
    pub play_requests: usize,
    pub init_calls: usize,
    pub drop_calls: usize,
    pub resizes: Vec<(u32, u32)>,
    pub draws: Vec<DrawCall>,
    pub init_errors: VecDeque<MatteError>,
    pub draw_errors: VecDeque<MatteError>,
}

impl FakeSurface {
    /// A loaded, playing 640x360 video on a fresh 300x150 canvas.
    pub fn playing() -> Self {
        Self {
            video_size: Some((640, 360)),
            paused: false,
            autoplay_allowed: true,
            backing: (300, 150),
            ..Default::default()
        }
    }
}

impl MatteSurface for FakeSurface {
    fn video_size(&self) -> Option<(u32, u32)> {
        self.video_size
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
        self.paused = true;
    }

    fn request_play(&mut self) {
        self.play_requests += 1;
        if self.autoplay_allowed {
            self.paused = false;
        }
    }

    fn init_renderer(&mut self) -> MatteResult<()> {
        self.init_calls += 1;
        if let Some(err) = self.init_errors.pop_front() {
            return Err(err);
        }
        self.has_renderer = true;
        Ok(())
    }

    fn drop_renderer(&mut self) {
        self.drop_calls += 1;
        self.has_renderer = false;
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
        self.backing = (width, height);
    }

    fn draw(&mut self, uniforms: &MatteUniforms) -> MatteResult<()> {
        assert!(self.has_renderer, "draw without a renderer");
        if let Some(err) = self.draw_errors.pop_front() {
            return Err(err);
        }
        self.draws.push(DrawCall {
            backing: self.backing,
            video: self.video_size.unwrap_or_default(),
            uniforms: *uniforms,
        });
        Ok(())
    }
}

pub struct Harness {
    pub session: RenderSession<FakeSurface>,
    pub playback: PlaybackSignal,
    pub visibility: VisibilitySignal,
}

impl Harness {
    pub fn new(surface: FakeSurface) -> Self {
        Self::with_config(surface, &MatteConfig::new("/clip.mp4"))
    }

    pub fn with_config(surface: FakeSurface, config: &MatteConfig) -> Self {
        let playback = PlaybackSignal::new(config.playing);
        let visibility = VisibilitySignal::default();
        let session = RenderSession::new(surface, config, playback.clone(), visibility.clone());
        Self {
            session,
            playback,
            visibility,
        }
    }

    pub fn surface(&self) -> &FakeSurface {
        self.session.surface()
    }

    pub fn surface_mut(&mut self) -> &mut FakeSurface {
        self.session.surface_mut()
    }
}

#[derive(Debug, Default)]
pub struct SchedulerState {
    next_handle: i32,
    pub pending: Vec<i32>,
    pub requested: usize,
    pub cancelled: Vec<i32>,
    pub fail_next: bool,
}

/// Scheduler whose callbacks only fire when the test says so.
#[derive(Debug, Clone, Default)]
pub struct FakeScheduler(pub Rc<RefCell<SchedulerState>>);

impl FakeScheduler {
    pub fn pending(&self) -> Vec<i32> {
        self.0.borrow().pending.clone()
    }

    /// Simulate the browser invoking the oldest pending callback.
    pub fn fire<S: MatteSurface>(
        &self,
        frame_loop: &mut FrameLoop<S, FakeScheduler>,
    ) -> Option<video_matte::FrameOutcome> {
        {
            let mut state = self.0.borrow_mut();
            if state.pending.is_empty() {
                return None;
            }
            state.pending.remove(0);
        }
        frame_loop.tick()
    }
}

impl FrameScheduler for FakeScheduler {
    type Handle = i32;

    fn request_frame(&self) -> MatteResult<i32> {
        let mut state = self.0.borrow_mut();
        if state.fail_next {
            state.fail_next = false;
            return Err(MatteError::Js("requestAnimationFrame unavailable".to_string()));
        }
        state.next_handle += 1;
        let handle = state.next_handle;
        state.requested += 1;
        state.pending.push(handle);
        Ok(handle)
    }

    fn cancel_frame(&self, handle: i32) {
        let mut state = self.0.borrow_mut();
        state.pending.retain(|h| *h != handle);
        state.cancelled.push(handle);
    }
}
