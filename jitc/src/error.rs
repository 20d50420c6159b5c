//! Result and errors.
use std::{
    fmt::{self, Display, Formatter},
    io,
    string::FromUtf8Error,
};

use crate::jit::CodegenError;

pub type JitcResult<T> = std::result::Result<T, JitcError>;

#[derive(Debug)]
pub enum JitcError {
    /// Code object could not be produced.
    Codegen(CodegenError),
    Io(io::Error),
    /// Source file is not valid UTF-8.
    Utf8(FromUtf8Error),
}

impl Display for JitcError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codegen(err) => write!(f, "code generation failed: {}", err),
            Self::Io(err) => write!(f, "{}", err),
            Self::Utf8(err) => write!(f, "source is not valid UTF-8: {}", err),
        }
    }
}

impl std::error::Error for JitcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codegen(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Utf8(err) => Some(err),
        }
    }
}

impl From<CodegenError> for JitcError {
    fn from(err: CodegenError) -> Self {
        JitcError::Codegen(err)
    }
}

impl From<io::Error> for JitcError {
    fn from(err: io::Error) -> Self {
        JitcError::Io(err)
    }
}

impl From<FromUtf8Error> for JitcError {
    fn from(err: FromUtf8Error) -> Self {
        JitcError::Utf8(err)
    }
}
