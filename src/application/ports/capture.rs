//! Audio capture port interface

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::voice::AudioFormat;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    /// No usable input device, or the user has not granted access.
    /// Fatal at adapter construction; callers show a permission-specific message.
    #[error("Microphone unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Capture stream failed: {0}")]
    StreamFailed(String),
}

/// Receives one interval's worth of captured audio bytes.
/// Invoked in strict temporal order.
pub type ChunkSink = Arc<dyn Fn(Vec<u8>) + Send + Sync>;

/// Port for chunked microphone capture.
///
/// Adapters acquire the input device at construction so that a missing or
/// denied microphone is a distinct, construction-fatal condition. Chunks are
/// delivered to the sink on a fixed short interval while active; the
/// concatenation of all chunks from one capture is a single playable body in
/// the adapter's `format()`.
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Begin capturing, delivering chunks to `sink` until `stop` is called.
    async fn start(&self, sink: ChunkSink) -> Result<(), CaptureError>;

    /// Stop capturing. Resolves only after the device has acknowledged the
    /// stop and the final chunk has been delivered to the sink.
    async fn stop(&self) -> Result<(), CaptureError>;

    /// Check if the device is currently capturing
    fn is_active(&self) -> bool;

    /// Container format of the delivered chunks
    fn format(&self) -> AudioFormat;

    /// Release the underlying device. Further starts fail with
    /// `DeviceUnavailable`.
    async fn close(&self) -> Result<(), CaptureError>;
}
