use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::{Duration, Instant};

use framegrade_core::{Frame, Pipeline};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::WorkerConfig;
use crate::error::ProcessError;
use crate::protocol::{ErrorKind, WorkerRequest, WorkerResponse};

/// Lifecycle of a worker thread.
///
/// ```text
/// Uninitialized -> Ready <-> Processing
///        \            \         /
///         +----------> Terminated
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    Uninitialized = 0,
    Ready = 1,
    Processing = 2,
    Terminated = 3,
}

impl WorkerState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Uninitialized,
            1 => Self::Ready,
            2 => Self::Processing,
            _ => Self::Terminated,
        }
    }
}

enum Inbound {
    Request(WorkerRequest),
    Terminate,
}

/// State shared between the caller and the worker thread.
struct Shared {
    state: AtomicU8,
    terminated: AtomicBool,
}

impl Shared {
    /// Move to `to` unless already terminated.
    fn transition(&self, to: WorkerState) {
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                (cur != WorkerState::Terminated as u8).then_some(to as u8)
            });
    }

    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }
}

/// Sending half of a worker: posts requests and controls its lifetime.
///
/// Dropping the handle terminates the worker.
pub struct WorkerHandle {
    inbound: mpsc::UnboundedSender<Inbound>,
    shared: Arc<Shared>,
}

impl WorkerHandle {
    /// Queue a request. Requests are processed one at a time, in the order
    /// they were posted.
    pub fn post(&self, request: WorkerRequest) -> Result<(), ProcessError> {
        let id = request.id();
        if self.shared.is_terminated() {
            return Err(ProcessError::Transport {
                id,
                reason: "worker has been terminated".into(),
            });
        }
        self.inbound
            .send(Inbound::Request(request))
            .map_err(|_| ProcessError::Transport {
                id,
                reason: "worker thread has exited".into(),
            })
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    /// Stop the worker. Queued requests are abandoned; a request already
    /// running finishes but its response is dropped.
    pub fn terminate(&self) {
        if self.shared.terminated.swap(true, Ordering::AcqRel) {
            return;
        }
        self.shared
            .state
            .store(WorkerState::Terminated as u8, Ordering::Release);
        // Wakes the thread if it is parked on an empty queue.
        let _ = self.inbound.send(Inbound::Terminate);
        debug!("worker terminate requested");
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// A pipeline running on its own OS thread.
///
/// The first message out is always [`WorkerResponse::Ready`]. Every
/// [`WorkerRequest::Process`] is answered by exactly one `Result` or `Error`
/// carrying the same id, unless the worker is terminated first.
pub struct EffectWorker {
    handle: WorkerHandle,
    responses: mpsc::UnboundedReceiver<WorkerResponse>,
}

impl EffectWorker {
    pub fn spawn(config: &WorkerConfig) -> Result<Self, ProcessError> {
        Self::spawn_with(config, Pipeline::new())
    }

    /// Spawn with a caller-built pipeline.
    pub fn spawn_with(config: &WorkerConfig, pipeline: Pipeline) -> Result<Self, ProcessError> {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            state: AtomicU8::new(WorkerState::Uninitialized as u8),
            terminated: AtomicBool::new(false),
        });

        let thread_shared = Arc::clone(&shared);
        let budget = config.frame_budget();
        std::thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || worker_loop(pipeline, inbound_rx, response_tx, thread_shared, budget))
            .map_err(ProcessError::Spawn)?;

        info!(thread = %config.thread_name, budget_ms = ?config.frame_budget_ms, "effect worker spawned");

        Ok(Self {
            handle: WorkerHandle {
                inbound: inbound_tx,
                shared,
            },
            responses: response_rx,
        })
    }

    pub fn post(&self, request: WorkerRequest) -> Result<(), ProcessError> {
        self.handle.post(request)
    }

    /// Next response, or `None` once the worker has stopped.
    pub async fn recv(&mut self) -> Option<WorkerResponse> {
        self.responses.recv().await
    }

    /// Blocking variant of [`recv`](Self::recv) for callers outside an async
    /// runtime. Panics if called from within one.
    pub fn blocking_recv(&mut self) -> Option<WorkerResponse> {
        self.responses.blocking_recv()
    }

    pub fn state(&self) -> WorkerState {
        self.handle.state()
    }

    pub fn terminate(&self) {
        self.handle.terminate();
    }

    /// Separate the request side from the response stream so they can be
    /// driven from different tasks.
    pub fn split(self) -> (WorkerHandle, mpsc::UnboundedReceiver<WorkerResponse>) {
        (self.handle, self.responses)
    }
}

fn worker_loop(
    pipeline: Pipeline,
    mut inbound: mpsc::UnboundedReceiver<Inbound>,
    responses: mpsc::UnboundedSender<WorkerResponse>,
    shared: Arc<Shared>,
    budget: Option<Duration>,
) {
    shared.transition(WorkerState::Ready);
    if responses.send(WorkerResponse::Ready).is_err() {
        shared.transition(WorkerState::Terminated);
        return;
    }
    info!("effect worker ready");

    while let Some(msg) = inbound.blocking_recv() {
        if shared.is_terminated() {
            break;
        }
        let request = match msg {
            Inbound::Request(request) => request,
            Inbound::Terminate => break,
        };

        shared.transition(WorkerState::Processing);
        let response = handle_request(&pipeline, request, budget);

        if shared.is_terminated() {
            debug!(id = response.id(), "dropping response after terminate");
            break;
        }
        shared.transition(WorkerState::Ready);

        if responses.send(response).is_err() {
            debug!("response receiver dropped");
            break;
        }
    }

    shared.transition(WorkerState::Terminated);
    info!("effect worker stopped");
}

fn handle_request(
    pipeline: &Pipeline,
    request: WorkerRequest,
    budget: Option<Duration>,
) -> WorkerResponse {
    let WorkerRequest::Process {
        id,
        pixel_buffer,
        width,
        height,
        snapshot,
    } = request;

    let t0 = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let frame = Frame::from_data(width, height, pixel_buffer)?;
        pipeline.process_cpu(frame, &snapshot)
    }));
    let elapsed = t0.elapsed();

    match outcome {
        Ok(Ok(frame)) => {
            if let Some(budget) = budget.filter(|b| elapsed > *b) {
                warn!(
                    id,
                    elapsed_ms = elapsed.as_millis(),
                    budget_ms = budget.as_millis(),
                    w = width,
                    h = height,
                    "frame over budget"
                );
            } else {
                debug!(id, elapsed_ms = elapsed.as_millis(), "frame processed");
            }
            WorkerResponse::Result {
                id,
                pixel_buffer: frame.into_data(),
            }
        }
        Ok(Err(err)) => {
            error!(id, %err, "frame processing failed");
            WorkerResponse::Error {
                id,
                error_kind: ErrorKind::from(&err),
                message: err.to_string(),
                trace: Some(format!("{err:?}")),
            }
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(id, %message, "pipeline panicked");
            WorkerResponse::Error {
                id,
                error_kind: ErrorKind::Panic,
                message,
                trace: std::thread::current().name().map(|n| format!("thread '{n}'")),
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".into()
    }
}
