use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use framegrade_core::{EffectsState, Frame};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use crate::error::ProcessError;
use crate::protocol::{WorkerRequest, WorkerResponse};
use crate::worker::{EffectWorker, WorkerHandle, WorkerState};

type Reply = Result<Frame, ProcessError>;

struct Waiter {
    width: u32,
    height: u32,
    tx: oneshot::Sender<Reply>,
}

#[derive(Default)]
struct PendingTable {
    closed: bool,
    waiters: HashMap<u64, Waiter>,
}

type Pending = Arc<Mutex<PendingTable>>;

fn lock(pending: &Pending) -> MutexGuard<'_, PendingTable> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Async front end for an [`EffectWorker`].
///
/// Each submitted frame gets a fresh id and a [`PendingFrame`] that resolves
/// when the worker answers that id. Responses may be awaited in any order.
/// Must be created inside a tokio runtime.
pub struct FrameProcessor {
    handle: WorkerHandle,
    pending: Pending,
    next_id: AtomicU64,
    ready: watch::Receiver<bool>,
}

impl FrameProcessor {
    pub fn new(worker: EffectWorker) -> Self {
        let (handle, responses) = worker.split();
        let pending: Pending = Arc::default();
        let (ready_tx, ready_rx) = watch::channel(false);

        tokio::spawn(dispatch(responses, Arc::clone(&pending), ready_tx));

        Self {
            handle,
            pending,
            next_id: AtomicU64::new(1),
            ready: ready_rx,
        }
    }

    /// Wait for the worker's ready signal. Returns `false` if the worker
    /// stopped without ever becoming ready.
    pub async fn wait_ready(&self) -> bool {
        let mut ready = self.ready.clone();
        ready.wait_for(|r| *r).await.is_ok()
    }

    /// Hand a frame to the worker. The frame's buffer is moved, not copied.
    pub fn submit(&self, frame: Frame, snapshot: EffectsState) -> Result<PendingFrame, ProcessError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();

        {
            let mut table = lock(&self.pending);
            if table.closed {
                return Err(ProcessError::Transport {
                    id,
                    reason: "worker has stopped".into(),
                });
            }
            table.waiters.insert(
                id,
                Waiter {
                    width: frame.width,
                    height: frame.height,
                    tx,
                },
            );
        }

        let request = WorkerRequest::Process {
            id,
            width: frame.width,
            height: frame.height,
            pixel_buffer: frame.data,
            snapshot,
        };
        if let Err(err) = self.handle.post(request) {
            lock(&self.pending).waiters.remove(&id);
            return Err(err);
        }

        debug!(id, "frame submitted");
        Ok(PendingFrame { id, rx })
    }

    /// Submit and wait for the graded frame.
    pub async fn process(&self, frame: Frame, snapshot: EffectsState) -> Reply {
        self.submit(frame, snapshot)?.await
    }

    /// Stop waiting for `id`. The worker still runs the request if it has
    /// started; its response is discarded. Returns `false` if `id` was not
    /// pending.
    pub fn cancel(&self, id: u64) -> bool {
        let removed = lock(&self.pending).waiters.remove(&id);
        if removed.is_some() {
            debug!(id, "request cancelled");
        }
        removed.is_some()
    }

    /// Number of submitted frames still waiting for an answer.
    pub fn in_flight(&self) -> usize {
        lock(&self.pending).waiters.len()
    }

    pub fn state(&self) -> WorkerState {
        self.handle.state()
    }

    /// Stop the worker. Every pending frame resolves with a transport error.
    pub fn terminate(&self) {
        self.handle.terminate();
    }
}

/// Routes worker responses to their waiters until the worker stops, then
/// fails whatever is left.
async fn dispatch(
    mut responses: mpsc::UnboundedReceiver<WorkerResponse>,
    pending: Pending,
    ready: watch::Sender<bool>,
) {
    while let Some(response) = responses.recv().await {
        match response {
            WorkerResponse::Ready => {
                ready.send_replace(true);
            }
            WorkerResponse::Result { id, pixel_buffer } => {
                let Some(waiter) = lock(&pending).waiters.remove(&id) else {
                    debug!(id, "discarding result for request nobody is waiting on");
                    continue;
                };
                let frame = Frame {
                    width: waiter.width,
                    height: waiter.height,
                    data: pixel_buffer,
                };
                let _ = waiter.tx.send(Ok(frame));
            }
            WorkerResponse::Error {
                id,
                error_kind,
                message,
                trace,
            } => {
                let Some(waiter) = lock(&pending).waiters.remove(&id) else {
                    debug!(id, "discarding error for request nobody is waiting on");
                    continue;
                };
                let _ = waiter.tx.send(Err(ProcessError::Remote {
                    id,
                    kind: error_kind,
                    message,
                    trace,
                }));
            }
        }
    }

    let orphans = {
        let mut table = lock(&pending);
        table.closed = true;
        std::mem::take(&mut table.waiters)
    };
    if !orphans.is_empty() {
        warn!(count = orphans.len(), "worker stopped with requests in flight");
    }
    for (id, waiter) in orphans {
        let _ = waiter.tx.send(Err(ProcessError::Transport {
            id,
            reason: "worker stopped before responding".into(),
        }));
    }
}

/// A submitted frame. Resolves to the graded frame or the error for its id.
#[derive(Debug)]
#[must_use = "a PendingFrame does nothing unless awaited"]
pub struct PendingFrame {
    id: u64,
    rx: oneshot::Receiver<Reply>,
}

impl PendingFrame {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Future for PendingFrame {
    type Output = Reply;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|reply| reply.unwrap_or(Err(ProcessError::Cancelled { id })))
    }
}
