use std::fmt;

use framegrade_core::{EffectsState, PipelineError};
use serde::{Deserialize, Serialize};

/// Message from the caller to the worker.
///
/// The pixel buffer is moved into the request and handed back in the
/// matching [`WorkerResponse::Result`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkerRequest {
    #[serde(rename_all = "camelCase")]
    Process {
        id: u64,
        pixel_buffer: Vec<u8>,
        width: u32,
        height: u32,
        snapshot: EffectsState,
    },
}

impl WorkerRequest {
    pub fn id(&self) -> u64 {
        match self {
            Self::Process { id, .. } => *id,
        }
    }
}

/// Message from the worker back to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkerResponse {
    /// Sent once, before any request is processed.
    Ready,
    #[serde(rename_all = "camelCase")]
    Result { id: u64, pixel_buffer: Vec<u8> },
    #[serde(rename_all = "camelCase")]
    Error {
        id: u64,
        error_kind: ErrorKind,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace: Option<String>,
    },
}

impl WorkerResponse {
    /// Correlation id, `None` for [`WorkerResponse::Ready`].
    pub fn id(&self) -> Option<u64> {
        match self {
            Self::Ready => None,
            Self::Result { id, .. } | Self::Error { id, .. } => Some(*id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    InvalidDimensions,
    InvalidParameter,
    Panic,
    Transport,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidDimensions => "invalidDimensions",
            Self::InvalidParameter => "invalidParameter",
            Self::Panic => "panic",
            Self::Transport => "transport",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&PipelineError> for ErrorKind {
    fn from(err: &PipelineError) -> Self {
        match err {
            PipelineError::InvalidDimensions { .. } => Self::InvalidDimensions,
            PipelineError::InvalidParameter { .. } => Self::InvalidParameter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_envelope_shape() {
        let req = WorkerRequest::Process {
            id: 3,
            pixel_buffer: vec![1, 2, 3, 4],
            width: 1,
            height: 1,
            snapshot: EffectsState::default(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["kind"], "process");
        assert_eq!(value["id"], 3);
        assert_eq!(value["pixelBuffer"], json!([1, 2, 3, 4]));
        assert!(value["snapshot"]["colorAdjustments"].is_object());

        let back: WorkerRequest = serde_json::from_value(value).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn ready_is_bare_tag() {
        let value = serde_json::to_value(WorkerResponse::Ready).unwrap();
        assert_eq!(value, json!({ "kind": "ready" }));
    }

    #[test]
    fn error_envelope_shape() {
        let resp = WorkerResponse::Error {
            id: 7,
            error_kind: ErrorKind::InvalidParameter,
            message: "bad curve".into(),
            trace: None,
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "error",
                "id": 7,
                "errorKind": "invalidParameter",
                "message": "bad curve",
            })
        );
        let back: WorkerResponse = serde_json::from_value(value).unwrap();
        assert_eq!(back.id(), Some(7));
    }

    #[test]
    fn pipeline_errors_map_to_wire_kinds() {
        let errs = [
            PipelineError::InvalidDimensions {
                width: 1,
                height: 1,
                expected: 4,
                actual: 3,
            },
            PipelineError::InvalidParameter {
                stage: "curves",
                reason: "nan".into(),
            },
        ];
        let kinds: Vec<_> = errs.iter().map(ErrorKind::from).collect();
        assert_eq!(kinds, [ErrorKind::InvalidDimensions, ErrorKind::InvalidParameter]);
        for kind in kinds {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }
}
