use std::{
    backtrace::{Backtrace, BacktraceStatus},
    fmt, io,
};

pub use nix::errno::Errno;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Why a wrapped call failed.
///
/// [`ErrorKind::Os`] is the only kind produced by the lenient wrappers. The
/// other kinds come from the strict wrappers, which treat conditions the
/// underlying call considers normal (end of input, trailing characters) as
/// failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// The call reported failure through its documented indicator and set `errno`.
    #[error("{}", capitalize(.0.desc()))]
    Os(Errno),
    /// Input ended where at least one more item was required.
    #[error("EOF")]
    Eof,
    /// Input ended in the middle of a fixed-size block.
    #[error("Partial data")]
    PartialData,
    /// A numeric conversion stopped before the end of its input.
    #[error("Junk after number")]
    Junk,
    /// The call failed through an indicator that carries no `errno`.
    #[error("Failed")]
    Failed,
}

fn capitalize(desc: &str) -> String {
    let mut chars = desc.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// An error raised by a wrapper, naming the function that failed.
pub struct Error {
    function: &'static str,
    kind: ErrorKind,
    stack: Box<Backtrace>,
}

impl Error {
    #[must_use]
    pub fn new(function: &'static str, kind: ErrorKind) -> Self {
        Self {
            function,
            kind,
            stack: Box::new(Backtrace::capture()),
        }
    }

    /// Builds an error from the current `errno`.
    ///
    /// Must be called right after the failed call, before anything else can
    /// overwrite `errno`.
    #[must_use]
    pub fn from_errno(function: &'static str) -> Self {
        Self::new(function, ErrorKind::Os(Errno::last()))
    }

    /// Builds an error from an error number returned directly by the call
    /// (the `pthread_*` convention).
    #[must_use]
    pub fn from_raw_errno(function: &'static str, errnum: i32) -> Self {
        Self::new(function, ErrorKind::Os(Errno::from_raw(errnum)))
    }

    #[must_use]
    pub fn function(&self) -> &'static str {
        self.function
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn errno(&self) -> Option<Errno> {
        match self.kind {
            ErrorKind::Os(errno) => Some(errno),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.kind == ErrorKind::Eof
    }

    /// Returns the call stack captured when the error was built.
    ///
    /// Capturing is controlled by `RUST_BACKTRACE` and `RUST_LIB_BACKTRACE`.
    #[must_use]
    pub fn backtrace(&self) -> &Backtrace {
        &self.stack
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("function", &self.function)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// `{}` prints `function: message`. `{:#}` additionally prints the captured
/// call stack, if any.
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.function, self.kind)?;
        if f.alternate() && self.stack.status() == BacktraceStatus::Captured {
            write!(f, "\n{}", self.stack)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        let kind = match error.kind {
            ErrorKind::Os(errno) => io::Error::from_raw_os_error(errno as i32).kind(),
            ErrorKind::Eof | ErrorKind::PartialData => io::ErrorKind::UnexpectedEof,
            ErrorKind::Junk => io::ErrorKind::InvalidData,
            ErrorKind::Failed => io::ErrorKind::Other,
        };
        Self::new(kind, error)
    }
}
