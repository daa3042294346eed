//! Timer loop for the server-driven animator
//!
//! One interval per animator. Late ticks are skipped, not bunched up.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use super::boundary::SyncBoundary;
use super::server::ServerAnimator;
use crate::core::{PointSet, VisResult};

/// Cancels a running animator loop when triggered or dropped
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, rx)
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

/// Tick `animator` every `period` until `shutdown` fires (or its sender is dropped).
///
/// Returns the animator so the caller can inspect its final state.
pub async fn run_server_driven<B>(
    mut animator: ServerAnimator,
    mut boundary: B,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> VisResult<ServerAnimator>
where
    B: SyncBoundary<Arc<PointSet>>,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // the first tick of an interval completes immediately; t = 0 is the initial scene
    ticker.tick().await;

    debug!(period_ms = period.as_secs_f64() * 1000.0, "Animator started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                animator.tick(&mut boundary)?;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    let stats = animator.stats();
    info!(
        t = animator.time(),
        delivered = stats.delivered,
        superseded = stats.superseded,
        dropped = stats.dropped,
        "Animator stopped"
    );
    Ok(animator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::boundary::LatestSlot;
    use crate::core::{AnimationConfig, GridSpec};

    fn animator() -> ServerAnimator {
        let config = AnimationConfig {
            grid: GridSpec::new(-1.0, 1.0, 3),
            ..Default::default()
        };
        ServerAnimator::new(&config).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_at_configured_rate() {
        let slot = LatestSlot::new();
        let rx = slot.attach();
        let (shutdown, shutdown_rx) = Shutdown::new();
        let handle = tokio::spawn(run_server_driven(animator(), slot, Duration::from_millis(20), shutdown_rx));

        tokio::time::sleep(Duration::from_millis(205)).await;
        shutdown.trigger();
        let animator = handle.await.unwrap().unwrap();

        assert_eq!(animator.stats().ticks(), 10);
        // consumer never took anything: only the newest frame is pending
        assert_eq!(rx.take().map(|f| f.frame), Some(10));
        assert_eq!(animator.stats().superseded, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn no_pushes_after_stop() {
        let slot = LatestSlot::new();
        let rx = slot.attach();
        let (shutdown, shutdown_rx) = Shutdown::new();
        let handle = tokio::spawn(run_server_driven(animator(), slot, Duration::from_millis(20), shutdown_rx));

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(shutdown);
        let animator = handle.await.unwrap().unwrap();
        let ticks = animator.stats().ticks();
        assert_eq!(ticks, 2);

        let _ = rx.take();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.take().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn detached_renderer_only_drops() {
        let slot: LatestSlot<Arc<PointSet>> = LatestSlot::new();
        let (shutdown, shutdown_rx) = Shutdown::new();
        let handle = tokio::spawn(run_server_driven(animator(), slot, Duration::from_millis(20), shutdown_rx));

        tokio::time::sleep(Duration::from_millis(65)).await;
        shutdown.trigger();
        let animator = handle.await.unwrap().unwrap();
        assert_eq!(animator.stats().dropped, 3);
        assert_eq!(animator.last_delivered_t(), None);
        assert_eq!(animator.time(), 3.0 * 0.05);
    }
}
