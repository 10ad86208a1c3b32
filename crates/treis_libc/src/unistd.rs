//! `<unistd.h>` wrappers.
//!
//! Each function calls its namesake once. A return value of `-1` becomes
//! [`Error`] carrying `errno`; everything else is passed through.

use std::{
    ffi::{CStr, c_int, c_uint},
    os::fd::{AsFd, AsRawFd as _, FromRawFd as _, RawFd},
};

pub use libc::{F_OK, R_OK, SEEK_CUR, SEEK_END, SEEK_SET, W_OK, X_OK, off_t, pid_t};

use crate::{
    error::{Errno, Error, ErrorKind, Result},
    fcntl::Fd,
};

/// `read(2)`. Returns 0 at end of file.
pub fn read<F>(fildes: F, buf: &mut [u8]) -> Result<usize>
where
    F: AsFd,
{
    let n = cvt!(read(
        fildes.as_fd().as_raw_fd(),
        buf.as_mut_ptr().cast(),
        buf.len()
    ))?;
    Ok(n.cast_unsigned())
}

/// `write(2)`.
pub fn write<F>(fildes: F, buf: &[u8]) -> Result<usize>
where
    F: AsFd,
{
    let n = cvt!(write(fildes.as_fd().as_raw_fd(), buf.as_ptr().cast(), buf.len()))?;
    Ok(n.cast_unsigned())
}

/// `close(2)`.
///
/// `EINTR` is reported like any other error; the descriptor state is then
/// unspecified.
///
/// # Safety
///
/// `fildes` must be open and owned by the caller, and must not be used
/// afterwards. Closing a descriptor owned by an [`Fd`] or an `OwnedFd` makes
/// that owner release a dangling number.
pub unsafe fn close(fildes: RawFd) -> Result<()> {
    cvt!(close(fildes))?;
    Ok(())
}

/// `dup(2)`.
pub fn dup<F>(fildes: F) -> Result<Fd>
where
    F: AsFd,
{
    let fd = cvt!(dup(fildes.as_fd().as_raw_fd()))?;
    Ok(unsafe { Fd::from_raw_fd(fd) })
}

/// `dup2(2)`. Returns `fildes2`.
///
/// # Safety
///
/// If `fildes2` is open it is closed silently, so it must not be owned by
/// anything that will close it again.
pub unsafe fn dup2<F>(fildes: F, fildes2: RawFd) -> Result<RawFd>
where
    F: AsFd,
{
    cvt!(dup2(fildes.as_fd().as_raw_fd(), fildes2))
}

/// `pipe(2)`. Returns the read end and the write end.
pub fn pipe() -> Result<(Fd, Fd)> {
    let mut fds: [c_int; 2] = [-1; 2];
    cvt!(pipe(fds.as_mut_ptr()))?;
    unsafe { Ok((Fd::from_raw_fd(fds[0]), Fd::from_raw_fd(fds[1]))) }
}

/// `lseek(2)`.
pub fn lseek<F>(fildes: F, offset: off_t, whence: c_int) -> Result<off_t>
where
    F: AsFd,
{
    cvt!(lseek(fildes.as_fd().as_raw_fd(), offset, whence))
}

pub fn fsync<F>(fildes: F) -> Result<()>
where
    F: AsFd,
{
    cvt!(fsync(fildes.as_fd().as_raw_fd()))?;
    Ok(())
}

pub fn ftruncate<F>(fildes: F, length: off_t) -> Result<()>
where
    F: AsFd,
{
    cvt!(ftruncate(fildes.as_fd().as_raw_fd(), length))?;
    Ok(())
}

pub fn unlink(path: &CStr) -> Result<()> {
    cvt!(unlink(path.as_ptr()))?;
    Ok(())
}

pub fn rmdir(path: &CStr) -> Result<()> {
    cvt!(rmdir(path.as_ptr()))?;
    Ok(())
}

pub fn chdir(path: &CStr) -> Result<()> {
    cvt!(chdir(path.as_ptr()))?;
    Ok(())
}

/// `access(2)`.
pub fn access(path: &CStr, amode: c_int) -> Result<()> {
    cvt!(access(path.as_ptr(), amode))?;
    Ok(())
}

/// `getcwd(3)`. The result borrows `buf`.
pub fn getcwd(buf: &mut [u8]) -> Result<&CStr> {
    let ptr = cvt_null!(getcwd(buf.as_mut_ptr().cast(), buf.len()))?;
    Ok(unsafe { CStr::from_ptr(ptr) })
}

/// `isatty(3)`.
///
/// `ENOTTY` only says the descriptor is not a terminal, which is an answer
/// rather than a failure.
pub fn isatty<F>(fildes: F) -> Result<bool>
where
    F: AsFd,
{
    if unsafe { libc::isatty(fildes.as_fd().as_raw_fd()) } == 1 {
        return Ok(true);
    }
    match Errno::last() {
        Errno::ENOTTY => Ok(false),
        errno => Err(Error::new("isatty", ErrorKind::Os(errno))),
    }
}

/// `getpid(2)`. Always successful.
#[must_use]
pub fn getpid() -> pid_t {
    unsafe { libc::getpid() }
}

/// `getppid(2)`. Always successful.
#[must_use]
pub fn getppid() -> pid_t {
    unsafe { libc::getppid() }
}

/// `sleep(3)`. Returns the number of seconds left unslept.
pub fn sleep(seconds: c_uint) -> c_uint {
    unsafe { libc::sleep(seconds) }
}

#[cfg(test)]
mod tests {
    use std::os::fd::BorrowedFd;

    use super::*;

    // far above any descriptor a test process opens
    const BAD_FD: RawFd = 999_999;

    #[test]
    fn pipe_round_trip() {
        let (rx, tx) = pipe().unwrap();
        assert_eq!(write(&tx, b"hello").unwrap(), 5);
        drop(tx);

        let mut buf = [0; 16];
        assert_eq!(read(&rx, &mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], b"hello");
        assert_eq!(read(&rx, &mut buf).unwrap(), 0);
    }

    #[test]
    fn write_to_read_end_fails() {
        let (rx, _tx) = pipe().unwrap();
        let e = write(&rx, b"x").unwrap_err();
        assert_eq!(e.function(), "write");
        assert_eq!(e.errno(), Some(Errno::EBADF));
    }

    #[test]
    fn read_bad_descriptor() {
        let bad = unsafe { BorrowedFd::borrow_raw(BAD_FD) };
        let e = read(bad, &mut [0; 4]).unwrap_err();
        assert_eq!(e.function(), "read");
        assert_eq!(e.errno(), Some(Errno::EBADF));
    }

    #[test]
    fn lseek_on_pipe_is_illegal() {
        let (rx, _tx) = pipe().unwrap();
        let e = lseek(&rx, 0, SEEK_SET).unwrap_err();
        assert_eq!(e.errno(), Some(Errno::ESPIPE));
    }

    #[test]
    fn path_calls_report_missing_entries() {
        let missing = c"/nonexistent/treis/entry";
        assert_eq!(unlink(missing).unwrap_err().function(), "unlink");
        assert_eq!(rmdir(missing).unwrap_err().function(), "rmdir");
        assert_eq!(chdir(missing).unwrap_err().errno(), Some(Errno::ENOENT));
        assert_eq!(access(missing, F_OK).unwrap_err().function(), "access");
        access(c"/", F_OK).unwrap();
    }

    #[test]
    fn getcwd_too_small() {
        let mut buf = [0; 1];
        let e = getcwd(&mut buf).unwrap_err();
        assert_eq!(e.errno(), Some(Errno::ERANGE));

        let mut buf = [0; 4096];
        assert!(getcwd(&mut buf).unwrap().to_bytes().starts_with(b"/"));
    }

    #[test]
    fn pipe_is_not_a_tty() {
        let (rx, _tx) = pipe().unwrap();
        assert!(!isatty(&rx).unwrap());
        let bad = unsafe { BorrowedFd::borrow_raw(BAD_FD) };
        assert_eq!(isatty(bad).unwrap_err().errno(), Some(Errno::EBADF));
    }

    #[test]
    fn dup_shares_the_pipe() {
        let (rx, tx) = pipe().unwrap();
        let tx2 = dup(&tx).unwrap();
        drop(tx);
        write(&tx2, b"z").unwrap();
        let mut buf = [0; 1];
        assert_eq!(read(&rx, &mut buf).unwrap(), 1);
        assert!(getpid() > 0);
    }

    #[test]
    fn dup2_onto_owned_descriptor() {
        let (rx, tx) = pipe().unwrap();
        let (other_rx, other_tx) = pipe().unwrap();
        drop(other_rx);
        // `other_tx` keeps owning the number and closes it on drop
        let target = other_tx.get();
        assert_eq!(unsafe { dup2(&tx, target) }.unwrap(), target);
        drop(tx);
        write(&other_tx, b"via dup2").unwrap();
        drop(other_tx);

        let mut buf = [0; 16];
        assert_eq!(read(&rx, &mut buf).unwrap(), 8);
        assert_eq!(&buf[..8], b"via dup2");

        let e = unsafe { dup2(&rx, -1) }.unwrap_err();
        assert_eq!(e.function(), "dup2");
        assert_eq!(e.errno(), Some(Errno::EBADF));
    }

    #[test]
    fn ftruncate_and_fsync_regular_file() {
        let file = tempfile::tempfile().unwrap();
        ftruncate(&file, 10).unwrap();
        fsync(&file).unwrap();
        assert_eq!(file.metadata().unwrap().len(), 10);
        ftruncate(&file, 0).unwrap();
        assert_eq!(file.metadata().unwrap().len(), 0);
    }

    #[test]
    fn ftruncate_and_fsync_reject_pipes() {
        let (rx, tx) = pipe().unwrap();
        let e = ftruncate(&tx, 0).unwrap_err();
        assert_eq!(e.function(), "ftruncate");
        assert_eq!(e.errno(), Some(Errno::EINVAL));
        let e = fsync(&rx).unwrap_err();
        assert_eq!(e.function(), "fsync");
        assert_eq!(e.errno(), Some(Errno::EINVAL));
        let e = ftruncate(&tx, -1).unwrap_err();
        assert_eq!(e.errno(), Some(Errno::EINVAL));
    }
}
