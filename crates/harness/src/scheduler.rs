use core::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Frame clock used to wait for the next render frame.
///
/// Frames start at fixed multiples of the budget measured from the moment the
/// scheduler was created, so `next_frame` always resolves on a boundary.
#[derive(Debug)]
pub struct FrameScheduler {
    /// Length of one frame.
    budget: Duration,
    /// Start of frame zero.
    origin: Instant,
    /// Number of frames waited for since creation.
    frames: u64,
}

impl FrameScheduler {
    /// Creates a frame clock starting now. A zero budget is raised to 1ms.
    #[must_use]
    pub fn new(budget: Duration) -> Self {
        Self {
            budget: budget.max(Duration::from_millis(1)),
            origin: Instant::now(),
            frames: 0,
        }
    }

    /// Start of the first frame strictly after `now`.
    #[must_use]
    pub fn next_boundary(&self, now: Instant) -> Instant {
        let elapsed = now.saturating_duration_since(self.origin).as_nanos();
        let budget = self.budget.as_nanos().max(1);
        let index = elapsed / budget + 1;
        let offset = u64::try_from(budget.saturating_mul(index)).unwrap_or(u64::MAX);
        self.origin + Duration::from_nanos(offset)
    }

    /// Wait until the next frame boundary.
    pub async fn next_frame(&mut self) {
        let boundary = self.next_boundary(Instant::now());
        sleep_until(boundary).await;
        self.frames = self.frames.saturating_add(1);
    }

    /// Frames waited for since creation.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}
