//! Process-level helpers: turning a fallible `main` body into an exit status,
//! and the release discipline shared by the owning handles.

use std::{
    any::Any,
    env,
    ffi::OsString,
    fmt,
    io::{self, Write as _},
    panic::{self, AssertUnwindSafe},
    path::Path,
    process::ExitCode,
    thread,
};

use crate::error::Result;

/// Returns the base name of `argv[0]`.
#[must_use]
pub fn program_name() -> OsString {
    let arg0 = env::args_os().next().unwrap_or_default();
    Path::new(&arg0)
        .file_name()
        .map_or_else(|| arg0.clone(), ToOwned::to_owned)
}

/// Runs `f` and reports whether it succeeded.
///
/// An error (or a panic) is reported on standard error as `program: message`.
/// Panics are caught, so the caller always gets a `bool` back. The panic hook
/// is silenced while `f` runs, so a panic is reported only once.
pub fn is_successful<F, E>(f: F) -> bool
where
    F: FnOnce() -> Result<(), E>,
    E: fmt::Display,
{
    let prog = program_name();
    let prog = prog.to_string_lossy();

    // the report below replaces the default panic message
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(hook);

    let message = match result {
        Ok(Ok(())) => return true,
        Ok(Err(e)) => format!("{e:#}"),
        Err(payload) => panic_message(&*payload),
    };

    // stderr is unbuffered, nothing else is left to report if this fails
    let mut stderr = io::stderr().lock();
    if message.ends_with('\n') {
        let _ = write!(stderr, "{prog}: {message}");
    } else {
        let _ = writeln!(stderr, "{prog}: {message}");
    }
    false
}

/// Converts the outcome of `f` into the process exit status.
///
/// ```no_run
/// use std::process::ExitCode;
///
/// fn main() -> ExitCode {
///     treis_libc::rt::main_helper(|| {
///         treis_libc::unistd::chdir(c"/")?;
///         Ok::<_, treis_libc::error::Error>(())
///     })
/// }
/// ```
pub fn main_helper<F, E>(f: F) -> ExitCode
where
    F: FnOnce() -> Result<(), E>,
    E: fmt::Display,
{
    if is_successful(f) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown error".to_owned()
    }
}

/// Finishes the release of a resource from a `Drop` implementation.
///
/// While the thread is already unwinding, a failed release is logged and
/// dropped. Otherwise it panics with the error message.
pub(crate) fn finish_release(handle: &str, result: Result<()>) {
    match result {
        Ok(()) => {}
        Err(e) if thread::panicking() => {
            log::debug!("{handle}: release failed while unwinding, ignored: {e}");
        }
        Err(e) => panic!("{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};

    #[test]
    fn success_and_failure() {
        assert!(is_successful(|| Ok::<_, Error>(())));
        assert!(!is_successful(|| Err(Error::new("read", ErrorKind::Eof))));
        assert_eq!(main_helper(|| Ok::<_, Error>(())), ExitCode::SUCCESS);
        assert_eq!(
            main_helper(|| Err(Error::new("read", ErrorKind::Eof))),
            ExitCode::FAILURE
        );
    }

    #[test]
    fn panics_are_failures() {
        assert!(!is_successful(|| -> Result<(), Error> { panic!("boom") }));
        assert!(!is_successful(|| -> Result<(), Error> {
            panic::panic_any(42_i32)
        }));
    }

    #[test]
    fn panic_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&1_u8), "Unknown error");
    }

    #[test]
    fn release_failure_panics_outside_unwinding() {
        let r = panic::catch_unwind(|| {
            finish_release("Fd", Err(Error::new("close", ErrorKind::Failed)));
        });
        let payload = r.unwrap_err();
        assert_eq!(panic_message(&*payload), "close: Failed");
    }

    #[test]
    fn release_failure_is_silent_while_unwinding() {
        struct ReleaseOnDrop;
        impl Drop for ReleaseOnDrop {
            fn drop(&mut self) {
                finish_release("Fd", Err(Error::new("close", ErrorKind::Failed)));
            }
        }

        let r = panic::catch_unwind(|| {
            let _guard = ReleaseOnDrop;
            panic!("first");
        });
        assert_eq!(panic_message(&*r.unwrap_err()), "first");
    }
}
