//! Run-until-stopped frame loop with a single per-frame hook
//!
//! Interactive builds are driven by the windowing runner; `FrameLoop` drives
//! the same per-frame step from a deterministic clock so it can run without a
//! display (headless mode and tests).

use serde::Serialize;
use std::ops::ControlFlow;
use std::time::Duration;

/// Information handed to the per-frame hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameTick {
    /// Zero-based frame number
    pub frame: u64,
    pub delta: Duration,
    /// Time elapsed including this frame
    pub elapsed: Duration,
}

/// Frame numbering shared by every loop driver
#[derive(Debug, Clone, Default)]
pub struct FrameCounter {
    frames: u64,
    elapsed: Duration,
}

impl FrameCounter {
    pub fn advance(&mut self, delta: Duration) -> FrameTick {
        self.elapsed += delta;
        let tick = FrameTick {
            frame: self.frames,
            delta,
            elapsed: self.elapsed,
        };
        self.frames += 1;
        tick
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Source of frame durations
pub trait FrameClock {
    fn next_delta(&mut self) -> Duration;
}

/// Clock that advances by the same step every frame
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    step: Duration,
}

impl FixedStepClock {
    pub fn new(step: Duration) -> Self {
        Self { step }
    }

    pub fn from_hz(hz: u32) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1))
    }
}

impl FrameClock for FixedStepClock {
    fn next_delta(&mut self) -> Duration {
        self.step
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// The hook returned `ControlFlow::Break`
    Hook,
    FrameLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoopSummary {
    pub frames: u64,
    pub elapsed: Duration,
    pub stopped_by: StopReason,
}

pub struct FrameLoop<C: FrameClock> {
    clock: C,
    counter: FrameCounter,
    frame_limit: Option<u64>,
}

impl<C: FrameClock> FrameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            counter: FrameCounter::default(),
            frame_limit: None,
        }
    }

    /// Stop after `frames` frames even if the hook keeps going
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn counter(&self) -> &FrameCounter {
        &self.counter
    }

    /// Call `hook` once per frame until it breaks or the frame limit is hit.
    /// Without a limit this only returns when the hook asks it to.
    pub fn run<F>(&mut self, mut hook: F) -> LoopSummary
    where
        F: FnMut(&FrameTick) -> ControlFlow<()>,
    {
        let start = self.counter.frames();
        loop {
            if let Some(limit) = self.frame_limit {
                if self.counter.frames() - start >= limit {
                    return self.summary(start, StopReason::FrameLimit);
                }
            }

            let delta = self.clock.next_delta();
            let tick = self.counter.advance(delta);
            if hook(&tick).is_break() {
                return self.summary(start, StopReason::Hook);
            }
        }
    }

    fn summary(&self, start: u64, stopped_by: StopReason) -> LoopSummary {
        LoopSummary {
            frames: self.counter.frames() - start,
            elapsed: self.counter.elapsed(),
            stopped_by,
        }
    }
}
