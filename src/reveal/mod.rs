mod sequence;

pub use sequence::RevealSequence;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealEvent {
    Frame { generation: u64, text: String },
    Finished { generation: u64 },
}

impl RevealEvent {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Frame { generation, .. } | Self::Finished { generation } => *generation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl RevealPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Control handle for one reveal run. `cancel` is the only way to steer it.
#[derive(Debug, Clone)]
pub struct RevealHandle {
    generation: u64,
    token: CancellationToken,
    completed: Arc<AtomicBool>,
}

impl RevealHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stops the run. Frames already emitted stay where they are.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() && !self.is_completed()
    }

    pub fn phase(&self) -> RevealPhase {
        if self.is_completed() {
            RevealPhase::Completed
        } else if self.token.is_cancelled() {
            RevealPhase::Cancelled
        } else {
            RevealPhase::Running
        }
    }

    fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }
}

/// Discloses a text one space-separated token per tick.
///
/// At most one run is live: `start` cancels the previous one first. Every run
/// gets a fresh generation number, carried by all of its events, so consumers
/// can drop anything a superseded run already queued.
pub struct RevealAnimator {
    interval: Duration,
    next_generation: u64,
    active: Option<RevealHandle>,
}

impl RevealAnimator {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_generation: 0,
            active: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawns a reveal of `text` on the current tokio runtime.
    ///
    /// The first frame arrives one full interval after the call.
    pub fn start<F>(&mut self, text: impl Into<String>, sink: F) -> RevealHandle
    where
        F: Fn(RevealEvent) + Send + 'static,
    {
        self.cancel();
        self.next_generation += 1;

        let handle = RevealHandle {
            generation: self.next_generation,
            token: CancellationToken::new(),
            completed: Arc::new(AtomicBool::new(false)),
        };
        let sequence = RevealSequence::new(text);
        log::debug!(
            "reveal #{} started: {} word(s) every {:?}",
            handle.generation,
            sequence.frame_count(),
            self.interval
        );

        let first_tick = Instant::now() + self.interval;
        tokio::spawn(run_reveal(
            sequence,
            first_tick,
            self.interval,
            handle.clone(),
            sink,
        ));
        self.active = Some(handle.clone());
        handle
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = &self.active {
            if handle.phase() == RevealPhase::Running {
                log::debug!("reveal #{} cancelled", handle.generation);
                handle.cancel();
            }
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.active
            .as_ref()
            .map(RevealHandle::phase)
            .unwrap_or(RevealPhase::Idle)
    }

    pub fn active_generation(&self) -> Option<u64> {
        self.active.as_ref().map(RevealHandle::generation)
    }
}

async fn run_reveal<F>(
    mut sequence: RevealSequence,
    first_tick: Instant,
    period: Duration,
    handle: RevealHandle,
    sink: F,
) where
    F: Fn(RevealEvent),
{
    let mut ticker = interval_at(first_tick, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = handle.token.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let Some(frame) = sequence.next() else {
            break;
        };
        sink(RevealEvent::Frame {
            generation: handle.generation,
            text: frame,
        });
        if sequence.is_exhausted() {
            break;
        }
    }

    handle.completed.store(true, Ordering::Release);
    sink(RevealEvent::Finished {
        generation: handle.generation,
    });
}
