//! Process creation, replacement, waiting and termination.

use core::{convert::Infallible, fmt, ptr};
use std::ffi::{CStr, c_char, c_int};

use libc::pid_t;
pub use libc::{SIGABRT, SIGINT, SIGKILL, SIGTERM, WNOHANG};

use crate::{error::Result, rt};

/// A status word returned by `waitpid` or `pclose`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WaitStatus(c_int);

impl WaitStatus {
    #[must_use]
    pub fn from_raw(status: c_int) -> Self {
        Self(status)
    }

    #[must_use]
    pub fn into_raw(self) -> c_int {
        self.0
    }

    /// Returns `true` if the process exited with status 0.
    #[must_use]
    pub fn success(self) -> bool {
        self.exit_code() == Some(0)
    }

    /// `WEXITSTATUS`, if the process exited normally.
    #[must_use]
    pub fn exit_code(self) -> Option<c_int> {
        libc::WIFEXITED(self.0).then(|| libc::WEXITSTATUS(self.0))
    }

    /// `WTERMSIG`, if the process was killed by a signal.
    #[must_use]
    pub fn signal(self) -> Option<c_int> {
        libc::WIFSIGNALED(self.0).then(|| libc::WTERMSIG(self.0))
    }
}

impl fmt::Debug for WaitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WaitStatus({self})")
    }
}

impl fmt::Display for WaitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.exit_code() {
            write!(f, "exit status: {code}")
        } else if let Some(signal) = self.signal() {
            write!(f, "signal: {signal}")
        } else {
            write!(f, "unrecognised wait status: {} {:#x}", self.0, self.0)
        }
    }
}

/// `waitpid(2)`. Returns the pid that changed state (0 under [`WNOHANG`] if
/// none did) and its status.
pub fn waitpid(pid: pid_t, options: c_int) -> Result<(pid_t, WaitStatus)> {
    let mut status = 0;
    let pid = cvt!(waitpid(pid, &raw mut status, options))?;
    Ok((pid, WaitStatus(status)))
}

/// `kill(2)`.
pub fn kill(pid: pid_t, sig: c_int) -> Result<()> {
    cvt!(kill(pid, sig))?;
    Ok(())
}

/// `exit(3)`: runs `atexit` handlers and flushes stdio streams.
pub fn exit(status: c_int) -> ! {
    unsafe { libc::exit(status) }
}

/// `_exit(2)`: terminates at once, safe to call in a forked child.
pub fn _exit(status: c_int) -> ! {
    unsafe { libc::_exit(status) }
}

/// `abort(3)`.
pub fn abort() -> ! {
    unsafe { libc::abort() }
}

/// A child process that is waited for exactly once.
///
/// Dropping a `Child` blocks until the process terminates. A failed
/// `waitpid` panics unless the thread is already panicking.
pub struct Child {
    pid: pid_t,
}

impl Child {
    #[must_use]
    pub fn id(&self) -> pid_t {
        self.pid
    }

    /// Sends `sig` to the child.
    pub fn kill(&self, sig: c_int) -> Result<()> {
        kill(self.pid, sig)
    }

    /// Waits for the child to terminate.
    pub fn wait(self) -> Result<WaitStatus> {
        let pid = self.pid;
        core::mem::forget(self);
        wait_raw(pid)
    }
}

fn wait_raw(pid: pid_t) -> Result<WaitStatus> {
    let (_, status) = waitpid(pid, 0)?;
    log::trace!("child {pid} terminated with {status}");
    Ok(status)
}

impl Drop for Child {
    fn drop(&mut self) {
        rt::finish_release("Child", wait_raw(self.pid).map(|_| ()));
    }
}

impl fmt::Debug for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Child").field("pid", &self.pid).finish()
    }
}

/// Which side of a `fork` the caller is on.
#[derive(Debug)]
pub enum Fork {
    Parent(Child),
    Child,
}

/// `fork(2)`.
///
/// # Safety
///
/// If other threads exist, the child may only call async-signal-safe
/// functions (such as [`execv`] and [`_exit`]) until it execs.
pub unsafe fn fork() -> Result<Fork> {
    let pid = cvt!(fork())?;
    if pid == 0 {
        return Ok(Fork::Child);
    }
    log::trace!("forked child {pid}");
    Ok(Fork::Parent(Child { pid }))
}

fn null_terminated(args: &[&CStr]) -> Vec<*const c_char> {
    args.iter()
        .map(|arg| arg.as_ptr())
        .chain([ptr::null()])
        .collect()
}

/// `execv(3)`. Only returns on failure.
pub fn execv(path: &CStr, argv: &[&CStr]) -> Result<Infallible> {
    let argv = null_terminated(argv);
    cvt!(execv(path.as_ptr(), argv.as_ptr()))?;
    unreachable!("execv returned without failing")
}

/// `execvp(3)`, which searches `PATH` for `file`. Only returns on failure.
pub fn execvp(file: &CStr, argv: &[&CStr]) -> Result<Infallible> {
    let argv = null_terminated(argv);
    cvt!(execvp(file.as_ptr(), argv.as_ptr()))?;
    unreachable!("execvp returned without failing")
}

/// `execve(2)`. Only returns on failure.
pub fn execve(path: &CStr, argv: &[&CStr], envp: &[&CStr]) -> Result<Infallible> {
    let argv = null_terminated(argv);
    let envp = null_terminated(envp);
    cvt!(execve(path.as_ptr(), argv.as_ptr(), envp.as_ptr()))?;
    unreachable!("execve returned without failing")
}

/// Exit status of a spawned child whose `execv` failed.
pub const EXEC_FAILED: c_int = 127;

/// Runs the program at `path` in a child process.
///
/// The child only execs, and exits with [`EXEC_FAILED`] if that fails, so
/// this is sound in a multi-threaded process.
pub fn spawn(path: &CStr, argv: &[&CStr]) -> Result<Child> {
    let c_argv = null_terminated(argv);
    match unsafe { fork() }? {
        Fork::Parent(child) => {
            log::trace!("spawned {path:?} as {}", child.id());
            Ok(child)
        }
        Fork::Child => unsafe {
            libc::execv(path.as_ptr(), c_argv.as_ptr());
            libc::_exit(EXEC_FAILED)
        },
    }
}
