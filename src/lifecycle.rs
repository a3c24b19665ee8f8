//! Mount/unmount wiring for a matte session.
//!
//! Mounting attaches an intersection observer to the container, listens for
//! `loadeddata` and `play` on the video, and starts the frame loop as soon as
//! the video has a frame. Unmounting undoes all of it; after that no callback
//! can reach the session again.

use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::{JsCast, JsValue, prelude::Closure};
use web_sys::{
    Event, HtmlCanvasElement, HtmlElement, HtmlVideoElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::{
    backend::BrowserSurface,
    config::MatteConfig,
    error::{MatteError, MatteResult},
    frame_loop::{AnimationFrameScheduler, FrameCallback, FrameLoop},
    session::{PlaybackSignal, RenderSession, VisibilitySignal},
};

/// `HTMLMediaElement.HAVE_CURRENT_DATA`
const HAVE_CURRENT_DATA: u16 = 2;

/// Events that (re)start the frame loop.
const START_EVENTS: [&str; 2] = ["loadeddata", "play"];

type BrowserFrameLoop = FrameLoop<BrowserSurface, AnimationFrameScheduler>;

pub struct MountedMatte {
    frame_loop: Rc<RefCell<BrowserFrameLoop>>,
    playback: PlaybackSignal,
    video: HtmlVideoElement,
    observer: Option<IntersectionObserver>,
    on_start: Closure<dyn FnMut(Event)>,
    _on_intersect: Closure<dyn FnMut(js_sys::Array)>,
    _frame_callback: FrameCallback,
}

impl MountedMatte {
    pub fn mount(
        container: HtmlElement,
        video: HtmlVideoElement,
        canvas: HtmlCanvasElement,
        config: MatteConfig,
    ) -> MatteResult<Self> {
        let window = web_sys::window().ok_or_else(|| MatteError::Js("no window".to_string()))?;

        apply_presentation(&container, &canvas, &config)?;

        let playback = PlaybackSignal::new(config.playing);
        let visibility = VisibilitySignal::default();

        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = AnimationFrameScheduler::new(window, frame_callback.clone());
        let surface = BrowserSurface::new(video.clone(), canvas, config.clone());
        let session = RenderSession::new(surface, &config, playback.clone(), visibility.clone());
        let frame_loop = Rc::new(RefCell::new(FrameLoop::new(session, scheduler)));

        let weak_loop = Rc::downgrade(&frame_loop);
        *frame_callback.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
            let Some(frame_loop) = weak_loop.upgrade() else {
                return;
            };
            match frame_loop.try_borrow_mut() {
                Ok(mut frame_loop) => {
                    frame_loop.tick();
                }
                Err(_) => log::warn!("Matte frame loop busy, skipping frame"),
            };
        }));

        let on_intersect = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            let intersecting = entries
                .iter()
                .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| entry.is_intersecting());
            if let Some(visible) = latest_visibility(intersecting) {
                visibility.set(visible);
            }
        });
        let observer = IntersectionObserver::new_with_options(
            on_intersect.as_ref().unchecked_ref(),
            &observer_options(),
        )?;
        observer.observe(&container);

        let weak_loop = Rc::downgrade(&frame_loop);
        let on_start = Closure::<dyn FnMut(Event)>::new(move |_e: Event| {
            if let Some(frame_loop) = weak_loop.upgrade() {
                if let Ok(mut frame_loop) = frame_loop.try_borrow_mut() {
                    frame_loop.start();
                }
            }
        });
        for event in START_EVENTS {
            video.add_event_listener_with_callback(event, on_start.as_ref().unchecked_ref())?;
        }

        // The video may already have data from cache before the listeners attached.
        if has_current_data(video.ready_state()) {
            frame_loop.borrow_mut().start();
        }

        log::debug!("Mounted matte for {}", config.src);

        Ok(Self {
            frame_loop,
            playback,
            video,
            observer: Some(observer),
            on_start,
            _on_intersect: on_intersect,
            _frame_callback: frame_callback,
        })
    }

    pub fn set_playing(&self, playing: Option<bool>) {
        self.playback.set(playing);
    }

    pub fn is_rendering(&self) -> bool {
        self.frame_loop
            .try_borrow()
            .map(|l| l.session().is_rendering())
            .unwrap_or(false)
    }

    /// A frame callback is pending.
    pub fn is_running(&self) -> bool {
        self.frame_loop
            .try_borrow()
            .map(|l| l.is_running())
            .unwrap_or(false)
    }

    pub fn is_stopped(&self) -> bool {
        self.frame_loop
            .try_borrow()
            .map(|l| l.is_stopped())
            .unwrap_or(false)
    }

    /// Disconnect the observer, remove listeners and cancel the pending frame.
    pub fn unmount(&mut self) {
        let Some(observer) = self.observer.take() else {
            return;
        };
        observer.disconnect();

        for event in START_EVENTS {
            if let Err(err) = self
                .video
                .remove_event_listener_with_callback(event, self.on_start.as_ref().unchecked_ref())
            {
                log::warn!("Failed to remove {} listener: {:?}", event, err);
            }
        }

        match self.frame_loop.try_borrow_mut() {
            Ok(mut frame_loop) => frame_loop.stop(),
            Err(_) => log::error!("Matte frame loop busy during unmount"),
        }
        log::debug!("Unmounted matte");
    }
}

impl Drop for MountedMatte {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Any overlap with the viewport counts as visible.
pub fn observer_options() -> IntersectionObserverInit {
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(0.0));
    init
}

/// Visibility after a batch of observer entries, queued oldest first.
pub fn latest_visibility(entries: impl IntoIterator<Item = bool>) -> Option<bool> {
    entries.into_iter().last()
}

/// Whether the video already has a frame to draw.
pub fn has_current_data(ready_state: u16) -> bool {
    ready_state >= HAVE_CURRENT_DATA
}

/// Canvas sizing, fit, container scale and canvas background.
fn apply_presentation(
    container: &HtmlElement,
    canvas: &HtmlCanvasElement,
    config: &MatteConfig,
) -> MatteResult<()> {
    let style = canvas.style();
    style.set_property("width", "100%")?;
    style.set_property("height", "100%")?;
    style.set_property("object-fit", config.fit.css_object_fit())?;
    style.set_property("background", config.canvas_background())?;

    if let Some(scale) = config.scale {
        container
            .style()
            .set_property("transform", &format!("scale({})", scale))?;
    }
    Ok(())
}
