use thiserror::Error;

#[derive(Debug, Error)]
pub enum RespError {
    #[error("Invalid frame type: {0:#04x}")]
    InvalidFrameType(u8),
    #[error("Invalid literal: {0:?}")]
    InvalidLiteral(String),
    #[error("Invalid length: {0}")]
    InvalidLength(i64),
    #[error("Invalid terminator: expected {expected:#04x}, got {got:#04x}")]
    InvalidTerminator { expected: u8, got: u8 },
    #[error("Invalid RDB header: {0:?}")]
    InvalidRdbHeader(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RespError {
    /// Protocol violations mean the stream itself is malformed.
    /// Everything else is a local resource failure (snapshot sink or socket).
    pub fn is_protocol_violation(&self) -> bool {
        !matches!(self, RespError::Io(_))
    }
}
