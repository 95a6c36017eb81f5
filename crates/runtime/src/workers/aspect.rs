//! Single-writer worker that owns one aspect store.
//!
//! Every mutation of the aspect arrives as a command on the worker's channel,
//! so store updates and the applier calls that follow them never interleave
//! with another cycle of the same aspect. Different aspects run on different
//! workers and proceed in parallel.

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use cache_core::{AspectKind, AspectStore, CombinedKey};

use super::reconcile::Reconciler;
use crate::api::{AspectReport, Result, RuntimeError};

/// One store mutation inside a cycle.
#[derive(Debug)]
pub(crate) enum StoreOp<C> {
    Add(CombinedKey, C),
    Remove(CombinedKey),
}

/// Commands that can be sent to an aspect worker.
pub(crate) enum AspectCommand<S: AspectStore> {
    /// Apply the ops, recompute, and push the delta to the applier.
    Cycle {
        ops: Vec<StoreOp<S::Contribution>>,
        reply: oneshot::Sender<AspectReport>,
    },
    /// Drop every contribution, then reconcile the host to the empty view.
    Clear {
        reply: oneshot::Sender<AspectReport>,
    },
    /// Read the resolved view without mutating anything.
    Inspect {
        reply: oneshot::Sender<AspectView<S::View>>,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct AspectView<V> {
    pub view: V,
    pub contributions: usize,
}

/// Background task processing one aspect's commands in arrival order.
pub(crate) struct AspectWorker<R: Reconciler> {
    store: R::Store,
    /// What the host last accepted. Deltas are computed against this.
    applied: <R::Store as AspectStore>::View,
    reconciler: R,
    command_rx: mpsc::Receiver<AspectCommand<R::Store>>,
}

impl<R: Reconciler> AspectWorker<R> {
    pub(crate) fn new(
        store: R::Store,
        reconciler: R,
        command_rx: mpsc::Receiver<AspectCommand<R::Store>>,
    ) -> Self {
        Self {
            store,
            applied: Default::default(),
            reconciler,
            command_rx,
        }
    }

    /// Main worker loop. Ends once every sender is dropped.
    pub(crate) async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }
        debug!(aspect = %self.store.kind(), "aspect worker stopped");
    }

    async fn handle_command(&mut self, cmd: AspectCommand<R::Store>) {
        match cmd {
            AspectCommand::Cycle { ops, reply } => {
                let report = self.run_cycle(ops).await;
                if reply.send(report).is_err() {
                    debug!("Cycle reply channel closed (caller dropped)");
                }
            }
            AspectCommand::Clear { reply } => {
                self.store.clear();
                let report = self.run_cycle(Vec::new()).await;
                if reply.send(report).is_err() {
                    debug!("Clear reply channel closed (caller dropped)");
                }
            }
            AspectCommand::Inspect { reply } => {
                let view = AspectView {
                    view: self.store.view(),
                    contributions: self.store.len(),
                };
                if reply.send(view).is_err() {
                    debug!("Inspect reply channel closed (caller dropped)");
                }
            }
        }
    }

    async fn run_cycle(
        &mut self,
        ops: Vec<StoreOp<<R::Store as AspectStore>::Contribution>>,
    ) -> AspectReport {
        let aspect = self.store.kind();
        let mut report = AspectReport::new(aspect);
        report.ops = ops.len();

        // The store mutation is synchronous; only the applier calls suspend.
        for op in ops {
            match op {
                StoreOp::Add(key, contribution) => {
                    self.store.try_add(key, contribution);
                }
                StoreOp::Remove(key) => {
                    if !self.store.try_remove(&key) {
                        report.stale += 1;
                    }
                }
            }
        }

        let resolved = self.store.view();
        let outcome = self.reconciler.reconcile(&mut self.applied, &resolved).await;
        report.applied = outcome.applied;
        report.failures = outcome.failures;
        report.contributions = self.store.len();

        debug!(
            %aspect,
            ops = report.ops,
            stale = report.stale,
            applied = report.applied,
            failures = report.failures,
            contributions = report.contributions,
            "aspect cycle complete"
        );
        report
    }
}

/// Sending half of an aspect worker.
pub(crate) struct AspectHandle<S: AspectStore> {
    aspect: AspectKind,
    command_tx: mpsc::Sender<AspectCommand<S>>,
}

impl<S: AspectStore> Clone for AspectHandle<S> {
    fn clone(&self) -> Self {
        Self {
            aspect: self.aspect,
            command_tx: self.command_tx.clone(),
        }
    }
}

impl<S: AspectStore> AspectHandle<S> {
    pub(crate) fn new(aspect: AspectKind, command_tx: mpsc::Sender<AspectCommand<S>>) -> Self {
        Self { aspect, command_tx }
    }

    /// Enqueues a cycle. The returned receiver resolves once it has run.
    pub(crate) async fn submit(&self, ops: Vec<StoreOp<S::Contribution>>) -> Result<PendingCycle> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(AspectCommand::Cycle {
            ops,
            reply: reply_tx,
        })
        .await?;
        Ok(PendingCycle::new(self.aspect, reply_rx))
    }

    pub(crate) async fn clear(&self) -> Result<PendingCycle> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(AspectCommand::Clear { reply: reply_tx }).await?;
        Ok(PendingCycle::new(self.aspect, reply_rx))
    }

    pub(crate) async fn inspect(&self) -> Result<oneshot::Receiver<AspectView<S::View>>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(AspectCommand::Inspect { reply: reply_tx }).await?;
        Ok(reply_rx)
    }

    async fn send(&self, cmd: AspectCommand<S>) -> Result<()> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed {
                aspect: self.aspect,
            })
    }

    pub(crate) fn aspect(&self) -> AspectKind {
        self.aspect
    }
}

/// Cycle that has been enqueued but not yet awaited.
pub(crate) struct PendingCycle {
    aspect: AspectKind,
    reply_rx: oneshot::Receiver<AspectReport>,
}

impl PendingCycle {
    fn new(aspect: AspectKind, reply_rx: oneshot::Receiver<AspectReport>) -> Self {
        Self { aspect, reply_rx }
    }

    pub(crate) async fn wait(self) -> Result<AspectReport> {
        let aspect = self.aspect;
        self.reply_rx
            .await
            .map_err(|source| RuntimeError::ReplyChannelClosed { aspect, source })
    }
}

/// Awaits already-enqueued cycles. The workers run concurrently, so this is
/// the join barrier for one logical mutation.
pub(crate) async fn join_cycles(pending: Vec<PendingCycle>) -> Result<Vec<AspectReport>> {
    let mut reports = Vec::with_capacity(pending.len());
    for cycle in pending {
        reports.push(cycle.wait().await?);
    }
    Ok(reports)
}

/// Waits for an inspect reply.
pub(crate) async fn wait_view<V>(
    aspect: AspectKind,
    reply_rx: oneshot::Receiver<AspectView<V>>,
) -> Result<AspectView<V>> {
    reply_rx
        .await
        .map_err(|source| RuntimeError::ReplyChannelClosed { aspect, source })
}
