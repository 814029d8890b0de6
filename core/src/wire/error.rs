//! Error types for wire payload normalization

use thiserror::Error;

/// Errors while turning one inbound payload into an [`Event`](super::Event)
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("failed to decode payload")]
    Decode(#[from] serde_json::Error),

    #[error("unrecognized event kind '{kind}'")]
    UnrecognizedEventKind { kind: String },
}
