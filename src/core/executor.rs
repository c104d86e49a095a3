//! How tier collectors are run.
//!
//! The main loop decides which tiers are due and hands their collectors to a
//! [`TierExecutor`]. Batches come back through [`TierExecutor::completed`];
//! a tier's `lastRun` is recorded only when its batch is applied.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::collectors::{CollectContext, Collector};
use super::scheduler::Tier;
use super::telemetry::TelemetryBatch;
use crate::error::Result;

const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

pub trait TierExecutor {
    /// Start a collector run. Callers check [`TierExecutor::in_flight`]
    /// first; a tier is never dispatched twice concurrently.
    fn dispatch(&mut self, collector: Arc<dyn Collector>, ctx: CollectContext);

    /// Batches that finished since the last call, in completion order.
    fn completed(&mut self) -> Vec<TelemetryBatch>;

    fn in_flight(&self, tier: Tier) -> bool;
}

/// Runs each collector to completion inside `dispatch`, on the caller's
/// thread. The tick blocks until every due tier is done.
#[derive(Debug, Default)]
pub struct InlineExecutor {
    done: Vec<TelemetryBatch>,
}

impl InlineExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TierExecutor for InlineExecutor {
    fn dispatch(&mut self, collector: Arc<dyn Collector>, ctx: CollectContext) {
        self.done.push(collector.collect(&ctx));
    }

    fn completed(&mut self) -> Vec<TelemetryBatch> {
        std::mem::take(&mut self.done)
    }

    fn in_flight(&self, _tier: Tier) -> bool {
        false
    }
}

/// Runs collectors on a small tokio worker pool. Their batches are picked
/// up by `completed` on a later tick.
pub struct BackgroundExecutor {
    runtime: Option<tokio::runtime::Runtime>,
    done_tx: mpsc::UnboundedSender<TelemetryBatch>,
    done_rx: mpsc::UnboundedReceiver<TelemetryBatch>,
    pending: HashSet<Tier>,
}

impl BackgroundExecutor {
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("collector-worker")
            .build()?;
        let (done_tx, done_rx) = mpsc::unbounded_channel();

        Ok(Self {
            runtime: Some(runtime),
            done_tx,
            done_rx,
            pending: HashSet::new(),
        })
    }
}

impl TierExecutor for BackgroundExecutor {
    fn dispatch(&mut self, collector: Arc<dyn Collector>, ctx: CollectContext) {
        let Some(runtime) = &self.runtime else {
            return;
        };
        let tier = collector.tier();
        if !self.pending.insert(tier) {
            log::debug!("{} tier still running, not dispatched", tier);
            return;
        }

        let done_tx = self.done_tx.clone();
        runtime.spawn_blocking(move || {
            let batch = collector.collect(&ctx);
            // The receiver only goes away at shutdown.
            let _ = done_tx.send(batch);
        });
    }

    fn completed(&mut self) -> Vec<TelemetryBatch> {
        let mut batches = Vec::new();
        while let Ok(batch) = self.done_rx.try_recv() {
            self.pending.remove(&batch.tier);
            batches.push(batch);
        }
        batches
    }

    fn in_flight(&self, tier: Tier) -> bool {
        self.pending.contains(&tier)
    }
}

impl Drop for BackgroundExecutor {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            if !self.pending.is_empty() {
                log::info!("Abandoning {} running collector(s)", self.pending.len());
            }
            runtime.shutdown_timeout(SHUTDOWN_GRACE);
        }
    }
}

/// The executor selected by configuration.
pub fn executor_for(background: bool) -> Result<Box<dyn TierExecutor>> {
    if background {
        Ok(Box::new(BackgroundExecutor::new()?))
    } else {
        Ok(Box::new(InlineExecutor::new()))
    }
}
