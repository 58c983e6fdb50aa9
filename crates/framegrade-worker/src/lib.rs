//! Runs the effects pipeline on a dedicated worker thread.
//!
//! [`EffectWorker`] is the raw message-level endpoint: post a
//! [`WorkerRequest`], read [`WorkerResponse`]s back. [`FrameProcessor`] sits
//! on top of it and turns each request into a future resolved by id.

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod worker;

pub use client::{FrameProcessor, PendingFrame};
pub use config::WorkerConfig;
pub use error::ProcessError;
pub use protocol::{ErrorKind, WorkerRequest, WorkerResponse};
pub use worker::{EffectWorker, WorkerHandle, WorkerState};
