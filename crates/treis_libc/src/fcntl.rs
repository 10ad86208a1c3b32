//! `<fcntl.h>` wrappers and [`Fd`], the owning file descriptor.

use core::fmt;
use std::{
    ffi::{CStr, c_int},
    io,
    os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd, RawFd},
};

use bitflags::bitflags;
pub use libc::{FD_CLOEXEC, mode_t};

use crate::{error::Result, rt, unistd};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct OpenFlags: c_int {
        const READ_ONLY = libc::O_RDONLY;
        const WRITE_ONLY = libc::O_WRONLY;
        const READ_WRITE = libc::O_RDWR;
        const CREATE = libc::O_CREAT;
        const EXCL = libc::O_EXCL;
        const TRUNC = libc::O_TRUNC;
        const APPEND = libc::O_APPEND;
        const NONBLOCK = libc::O_NONBLOCK;
        const DIRECTORY = libc::O_DIRECTORY;
        const NOFOLLOW = libc::O_NOFOLLOW;
        const CLOEXEC = libc::O_CLOEXEC;
    }
}

/// Wrappers that hand out raw descriptors. The caller is responsible for
/// closing them.
pub mod no_raii {
    use super::*;

    /// `open(2)` without a mode argument.
    pub fn open2(path: &CStr, oflag: OpenFlags) -> Result<RawFd> {
        cvt!(open(path.as_ptr(), oflag.bits()))
    }

    /// `open(2)` with a mode argument, needed when `oflag` contains
    /// [`OpenFlags::CREATE`].
    pub fn open3(path: &CStr, oflag: OpenFlags, mode: mode_t) -> Result<RawFd> {
        cvt!(open(path.as_ptr(), oflag.bits(), mode))
    }
}

/// `fcntl(fd, F_GETFD)`.
pub fn fcntl_getfd<F>(fildes: F) -> Result<c_int>
where
    F: AsFd,
{
    cvt!(fcntl(fildes.as_fd().as_raw_fd(), libc::F_GETFD))
}

/// `fcntl(fd, F_SETFD, flags)`.
pub fn fcntl_setfd<F>(fildes: F, flags: c_int) -> Result<()>
where
    F: AsFd,
{
    cvt!(fcntl(fildes.as_fd().as_raw_fd(), libc::F_SETFD, flags))?;
    Ok(())
}

/// An owned file descriptor, closed exactly once.
///
/// Dropping an `Fd` closes it and panics if `close` fails, unless the thread
/// is already panicking; in that case the failure is only logged. Use
/// [`Fd::close`] to get the error as a value instead.
pub struct Fd {
    fd: RawFd,
}

impl Fd {
    pub fn open2(path: &CStr, oflag: OpenFlags) -> Result<Self> {
        let fd = no_raii::open2(path, oflag)?;
        Ok(Self { fd })
    }

    pub fn open3(path: &CStr, oflag: OpenFlags, mode: mode_t) -> Result<Self> {
        let fd = no_raii::open3(path, oflag, mode)?;
        Ok(Self { fd })
    }

    #[must_use]
    pub fn get(&self) -> RawFd {
        self.fd
    }

    /// Closes the descriptor, reporting a `close` failure.
    pub fn close(self) -> Result<()> {
        let fd = self.into_raw_fd();
        unsafe { unistd::close(fd) }
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        rt::finish_release("Fd", unsafe { unistd::close(self.fd) });
    }
}

impl fmt::Debug for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fd").field("fd", &self.fd).finish()
    }
}

impl AsFd for Fd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        unsafe { BorrowedFd::borrow_raw(self.fd) }
    }
}

impl AsRawFd for Fd {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl FromRawFd for Fd {
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        Self { fd }
    }
}

impl IntoRawFd for Fd {
    fn into_raw_fd(self) -> RawFd {
        let fd = self.fd;
        core::mem::forget(self);
        fd
    }
}

impl From<OwnedFd> for Fd {
    fn from(fd: OwnedFd) -> Self {
        Self {
            fd: fd.into_raw_fd(),
        }
    }
}

impl From<Fd> for OwnedFd {
    fn from(fd: Fd) -> Self {
        unsafe { Self::from_raw_fd(fd.into_raw_fd()) }
    }
}

impl io::Read for Fd {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(unistd::read(&*self, buf)?)
    }
}

impl io::Read for &Fd {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(unistd::read(*self, buf)?)
    }
}

impl io::Write for Fd {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(unistd::write(&*self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for &Fd {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(unistd::write(*self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
