use thiserror::Error;

/// Errors that can occur while decoding or executing an instruction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpError {
    /// Malformed operand syntax, wrong operand count or an unparseable immediate.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Register number outside `x0..x31`.
    #[error("Register index out of range: x{0}")]
    RegisterIndex(u32),

    /// Rejected interpreter configuration.
    #[error("Config error: {0}")]
    Config(&'static str),
}

impl InterpError {
    pub(crate) fn decode(msg: impl Into<String>) -> Self {
        InterpError::Decode(msg.into())
    }
}

/// A failure inside a multi-line script, tagged with the offending line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {}: {source}", .line + 1)]
pub struct ScriptError {
    /// Zero-based line index in the original text.
    pub line: usize,
    pub source: InterpError,
}
