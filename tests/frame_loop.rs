mod common;

use common::{FakeScheduler, FakeSurface, Harness};
use video_matte::{FrameLoop, FrameOutcome, MatteError};

fn frame_loop(surface: FakeSurface) -> (FrameLoop<FakeSurface, FakeScheduler>, FakeScheduler) {
    let scheduler = FakeScheduler::default();
    let session = Harness::new(surface).session;
    (FrameLoop::new(session, scheduler.clone()), scheduler)
}

#[test]
fn test_start_keeps_a_single_pending_frame() {
    let (mut frame_loop, scheduler) = frame_loop(FakeSurface::playing());

    frame_loop.start();
    frame_loop.start();
    frame_loop.start();

    assert_eq!(scheduler.pending().len(), 1);
    assert_eq!(scheduler.0.borrow().cancelled.len(), 2);
    assert!(frame_loop.is_running());
}

#[test]
fn test_tick_reschedules_before_stepping() {
    let (mut frame_loop, scheduler) = frame_loop(FakeSurface {
        video_size: None,
        ..FakeSurface::playing()
    });
    frame_loop.start();

    for _ in 0..5 {
        assert_eq!(scheduler.fire(&mut frame_loop), Some(FrameOutcome::NotReady));
        assert_eq!(scheduler.pending().len(), 1);
    }
    assert_eq!(scheduler.0.borrow().requested, 6);
}

#[test]
fn test_failed_frame_does_not_end_the_loop() {
    let mut surface = FakeSurface::playing();
    surface.draw_errors.push_back(MatteError::ContextLost);
    let (mut frame_loop, scheduler) = frame_loop(surface);
    frame_loop.start();

    assert_eq!(scheduler.fire(&mut frame_loop), Some(FrameOutcome::ContextLost));
    assert_eq!(scheduler.fire(&mut frame_loop), Some(FrameOutcome::Drawn));
    assert!(frame_loop.is_running());
}

#[test]
fn test_stop_cancels_and_silences_the_loop() {
    let (mut frame_loop, scheduler) = frame_loop(FakeSurface::playing());
    frame_loop.start();
    assert_eq!(scheduler.fire(&mut frame_loop), Some(FrameOutcome::Drawn));

    frame_loop.stop();
    assert!(scheduler.pending().is_empty());
    assert!(frame_loop.is_stopped());
    assert!(!frame_loop.is_running());

    // Late `play` events and stray callbacks after teardown
    frame_loop.start();
    assert!(scheduler.pending().is_empty());
    assert_eq!(frame_loop.tick(), None);
    assert_eq!(frame_loop.session().surface().draws.len(), 1);
}

#[test]
fn test_stop_is_idempotent() {
    let (mut frame_loop, scheduler) = frame_loop(FakeSurface::playing());
    frame_loop.start();
    frame_loop.stop();
    frame_loop.stop();
    assert_eq!(scheduler.0.borrow().cancelled.len(), 1);
}

#[test]
fn test_stop_before_start_schedules_nothing() {
    let (mut frame_loop, scheduler) = frame_loop(FakeSurface::playing());
    frame_loop.stop();
    frame_loop.start();
    assert_eq!(scheduler.0.borrow().requested, 0);
}

#[test]
fn test_failed_request_can_be_restarted() {
    let (mut frame_loop, scheduler) = frame_loop(FakeSurface::playing());
    scheduler.0.borrow_mut().fail_next = true;

    frame_loop.start();
    assert!(!frame_loop.is_running());

    frame_loop.start();
    assert!(frame_loop.is_running());
    assert_eq!(scheduler.fire(&mut frame_loop), Some(FrameOutcome::Drawn));
}
