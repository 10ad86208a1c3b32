//! Thread creation.

use std::{panic, thread};

use crate::error::{Errno, Error, ErrorKind, Result};

/// A handle to a thread started by [`spawn`].
///
/// Dropping the handle detaches the thread.
#[derive(Debug)]
pub struct JoinHandle<T> {
    inner: thread::JoinHandle<T>,
}

impl<T> JoinHandle<T> {
    /// Waits for the thread to finish and returns the closure's result.
    ///
    /// A panic in the thread continues in the caller.
    pub fn join(self) -> T {
        match self.inner.join() {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

/// Starts a thread running `f`.
///
/// Failing to create the thread is reported under the name
/// `pthread_create`.
pub fn spawn<F, T>(f: F) -> Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let inner = thread::Builder::new().spawn(f).map_err(|e| {
        let kind = e
            .raw_os_error()
            .map_or(ErrorKind::Failed, |errnum| ErrorKind::Os(Errno::from_raw(errnum)));
        Error::new("pthread_create", kind)
    })?;
    Ok(JoinHandle { inner })
}
