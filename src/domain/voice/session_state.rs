//! Recording cycle state machine

use std::fmt;
use thiserror::Error;

/// Where one command/response cycle currently is.
///
/// `Recording` spans from `start_listening` until the device acknowledges the
/// stop; `Processing` spans the upload and response handling. At most one
/// upload is ever in flight because only `Processing` reaches the gateway and
/// `Processing` refuses a new start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Processing,
}

impl SessionState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Processing => "processing",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request the current state refuses
#[derive(Debug, Clone, Error)]
#[error("Cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: &'static str,
}

/// Tracks one session's cycle position.
///
/// Every path ends back in `Idle`: a completed upload, a rejected upload, a
/// capture with nothing in it, and a capture that failed to start all leave
/// the session ready for the next `start_listening`.
#[derive(Debug, Default)]
pub struct CaptureSession {
    state: SessionState,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    fn refuse(&self, action: &'static str) -> InvalidStateTransition {
        InvalidStateTransition {
            current_state: self.state,
            action,
        }
    }

    /// Idle -> Recording.
    ///
    /// Refused while Recording, so two captures never interleave, and while
    /// Processing, so a new recording cannot race the in-flight upload.
    pub fn begin_capture(&mut self) -> Result<(), InvalidStateTransition> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Recording;
                Ok(())
            }
            _ => Err(self.refuse("start listening")),
        }
    }

    /// Recording -> Processing, once the device has acknowledged the stop
    pub fn finish_capture(&mut self) -> Result<(), InvalidStateTransition> {
        match self.state {
            SessionState::Recording => {
                self.state = SessionState::Processing;
                Ok(())
            }
            _ => Err(self.refuse("finish capture")),
        }
    }

    /// Recording -> Idle, for a capture that failed before producing anything
    pub fn cancel(&mut self) -> Result<(), InvalidStateTransition> {
        match self.state {
            SessionState::Recording => {
                self.state = SessionState::Idle;
                Ok(())
            }
            _ => Err(self.refuse("cancel capture")),
        }
    }

    /// Processing -> Idle, whether the upload succeeded or not
    pub fn complete(&mut self) -> Result<(), InvalidStateTransition> {
        match self.state {
            SessionState::Processing => {
                self.state = SessionState::Idle;
                Ok(())
            }
            _ => Err(self.refuse("complete cycle")),
        }
    }
}
