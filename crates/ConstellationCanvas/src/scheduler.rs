//! # Render Scheduling
//!
//! Redraws are coalesced into at most one pending animation frame. When the
//! scene is static and no particles are alive, nothing is scheduled at all.

use serde::{Deserialize, Serialize};

/// Opaque id of a requested animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub u64);

/// The host's animation-timing primitive (e.g. `requestAnimationFrame`).
pub trait FrameRequester {
    /// Asks for one callback on the next frame. `None` if the host refused.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancels a previously requested frame.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A requester for hosts that drive their own loop, and for tests.
///
/// Requests are only recorded; the host polls [`take_due`](Self::take_due)
/// and forwards the handle to the engine.
#[derive(Debug, Default)]
pub struct ManualFrameRequester {
    next_id: u64,
    pending: Option<FrameHandle>,
    /// Every handle ever requested, in order.
    pub requested: Vec<FrameHandle>,
    /// Every handle cancelled, in order.
    pub cancelled: Vec<FrameHandle>,
}

impl ManualFrameRequester {
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding request, if any, without consuming it.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Consumes the outstanding request, as if the frame fired.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameRequester for ManualFrameRequester {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        self.requested.push(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}

/// Tracks whether a redraw is owed and which frame, if any, will pay it.
#[derive(Debug, Default)]
pub struct RenderScheduler {
    needs_redraw: bool,
    pending: Option<FrameHandle>,
    torn_down: bool,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Flags a redraw without asking for a frame.
    pub fn mark_dirty(&mut self) {
        if !self.torn_down {
            self.needs_redraw = true;
        }
    }

    /// Flags a redraw and makes sure a frame is on its way.
    pub fn invalidate(&mut self, requester: &mut dyn FrameRequester) {
        self.mark_dirty();
        self.schedule(requester);
    }

    /// Requests the next tick unless one is already pending.
    pub fn schedule(&mut self, requester: &mut dyn FrameRequester) {
        if self.torn_down || self.pending.is_some() {
            return;
        }
        self.pending = requester.request_frame();
        if self.pending.is_none() {
            tracing::warn!("Host refused an animation frame request");
        }
    }

    /// Accepts a fired frame. Stale or foreign handles are rejected.
    pub fn begin_frame(&mut self, handle: FrameHandle) -> bool {
        if self.torn_down || self.pending != Some(handle) {
            tracing::trace!(?handle, pending = ?self.pending, "Ignoring stale frame");
            return false;
        }
        self.pending = None;
        true
    }

    /// Called after the painter ran.
    pub fn finish_draw(&mut self) {
        self.needs_redraw = false;
    }

    /// Cancels the outstanding frame. Every later call becomes a no-op.
    pub fn teardown(&mut self, requester: &mut dyn FrameRequester) {
        if self.torn_down {
            return;
        }
        if let Some(handle) = self.pending.take() {
            requester.cancel_frame(handle);
        }
        self.needs_redraw = false;
        self.torn_down = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_coalesces_requests() {
        let mut frames = ManualFrameRequester::new();
        let mut scheduler = RenderScheduler::new();
        scheduler.invalidate(&mut frames);
        scheduler.invalidate(&mut frames);
        scheduler.invalidate(&mut frames);
        assert_eq!(frames.requested.len(), 1);
        assert!(scheduler.needs_redraw());
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut frames = ManualFrameRequester::new();
        let mut scheduler = RenderScheduler::new();
        scheduler.invalidate(&mut frames);
        assert!(!scheduler.begin_frame(FrameHandle(999)));
        let due = frames.take_due().unwrap();
        assert!(scheduler.begin_frame(due));
        assert!(!scheduler.begin_frame(due));
    }

    #[test]
    fn test_teardown_cancels_and_is_final() {
        let mut frames = ManualFrameRequester::new();
        let mut scheduler = RenderScheduler::new();
        scheduler.invalidate(&mut frames);
        let pending = scheduler.pending().unwrap();
        scheduler.teardown(&mut frames);
        assert_eq!(frames.cancelled, vec![pending]);
        assert_eq!(frames.pending(), None);

        scheduler.invalidate(&mut frames);
        assert_eq!(frames.requested.len(), 1);
        assert!(!scheduler.needs_redraw());
    }
}
