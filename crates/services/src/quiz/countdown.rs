use std::time::Duration;

use log::debug;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use super::controller::QuizEvent;
use super::state::TimerId;

/// Countdown granularity.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A running countdown task delivering `QuizEvent::Tick` once per period.
///
/// The task is aborted when this handle is dropped, so no tick can be sent
/// after the owner lets go of it.
#[derive(Debug)]
pub struct Countdown {
    id: TimerId,
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawn the ticking task on the current tokio runtime.
    ///
    /// The first tick arrives one full period after spawning.
    #[must_use]
    pub fn spawn(id: TimerId, period: Duration, events: UnboundedSender<QuizEvent>) -> Self {
        debug!("starting countdown {}", id.value());
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if events.send(QuizEvent::Tick(id)).is_err() {
                    break;
                }
            }
        });
        Self { id, handle }
    }

    #[must_use]
    pub fn id(&self) -> TimerId {
        self.id
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        debug!("stopping countdown {}", self.id.value());
        self.handle.abort();
    }
}
