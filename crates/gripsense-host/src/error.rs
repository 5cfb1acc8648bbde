//! Session error taxonomy and the legacy numeric result surface.

use std::time::Duration;

use thiserror::Error;

use gripsense_core::{Hand, ProtocolError};

use crate::transport::TransportError;

/// Errors that can occur during a glove session operation.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Generic failure (device refused, session misuse)
    #[error("Operation failed: {0}")]
    Failed(String),

    /// An argument was invalid for the requested operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A numeric argument fell outside its documented interval
    #[error("Out of range: {what} = {value}")]
    OutOfRange {
        /// Which argument
        what: &'static str,
        /// The offending value
        value: f32,
    },

    /// The addressed hand has no connected glove
    #[error("Glove disconnected: {0:?} hand")]
    Disconnected(Hand),

    /// The session has not been initialized (or was shut down)
    #[error("Session not initialized")]
    NotInitialized,

    /// No device data arrived within the caller's deadline
    #[error("Timed out after {0:?} waiting for device data")]
    Timeout(Duration),

    /// Transport backend failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Malformed device payload
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Legacy numeric result codes, kept for callers bridging to the original
/// C surface. The set is closed; every [`SessionError`] maps into it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultCode {
    /// Generic failure
    Error = -1,
    /// Operation completed
    Success = 0,
    /// An argument was invalid
    InvalidArgument = 1,
    /// A numeric argument was outside its interval
    OutOfRange = 2,
    /// The addressed glove is not connected (or the session is down)
    Disconnected = 3,
}

impl ResultCode {
    /// Whether this code means the operation's outputs are valid.
    ///
    /// On any other code, outputs must not be read.
    #[inline]
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Collapse a session result to its numeric code.
    #[must_use]
    pub fn of<T>(result: &SessionResult<T>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(e) => e.result_code(),
        }
    }
}

impl SessionError {
    /// Map this error into the closed legacy code set.
    ///
    /// Timeouts and transport or protocol failures have no dedicated
    /// legacy code and collapse to [`ResultCode::Error`]; an
    /// uninitialized session reports as disconnected, matching the
    /// original surface.
    #[must_use]
    pub const fn result_code(&self) -> ResultCode {
        match self {
            Self::InvalidArgument(_) => ResultCode::InvalidArgument,
            Self::OutOfRange { .. } => ResultCode::OutOfRange,
            Self::Disconnected(_) | Self::NotInitialized => ResultCode::Disconnected,
            Self::Failed(_) | Self::Timeout(_) | Self::Transport(_) | Self::Protocol(_) => {
                ResultCode::Error
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_code_values() {
        assert_eq!(ResultCode::Error as i32, -1);
        assert_eq!(ResultCode::Success as i32, 0);
        assert_eq!(ResultCode::InvalidArgument as i32, 1);
        assert_eq!(ResultCode::OutOfRange as i32, 2);
        assert_eq!(ResultCode::Disconnected as i32, 3);
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            SessionError::InvalidArgument("hand").result_code(),
            ResultCode::InvalidArgument
        );
        assert_eq!(
            SessionError::OutOfRange {
                what: "power",
                value: 1.5
            }
            .result_code(),
            ResultCode::OutOfRange
        );
        assert_eq!(
            SessionError::Disconnected(Hand::Left).result_code(),
            ResultCode::Disconnected
        );
        assert_eq!(
            SessionError::NotInitialized.result_code(),
            ResultCode::Disconnected
        );
        assert_eq!(
            SessionError::Timeout(Duration::from_millis(100)).result_code(),
            ResultCode::Error
        );
        assert_eq!(
            SessionError::Failed("nope".into()).result_code(),
            ResultCode::Error
        );
    }

    #[test]
    fn test_result_collapse() {
        let ok: SessionResult<u32> = Ok(7);
        assert_eq!(ResultCode::of(&ok), ResultCode::Success);
        assert!(ResultCode::of(&ok).is_success());

        let err: SessionResult<u32> = Err(SessionError::NotInitialized);
        assert_eq!(ResultCode::of(&err), ResultCode::Disconnected);
        assert!(!ResultCode::of(&err).is_success());
    }
}
