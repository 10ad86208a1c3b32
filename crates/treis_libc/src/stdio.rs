//! `<stdio.h>` wrappers around `FILE *` streams.
//!
//! Character and line input clear the stream's error flag before the call, so
//! only an error raised by that very call is reported. Reaching end of file
//! is not an error for the lenient functions (`fgetc`, `getchar`, `getdelim`,
//! `fread`); the `_strict` variants report it as [`ErrorKind::Eof`].

use core::{fmt, ptr::NonNull};
use std::{
    ffi::{CStr, c_char, c_int},
    os::fd::{IntoRawFd as _, RawFd},
};

use libc::FILE;

use crate::{
    error::{Error, ErrorKind, Result},
    fcntl::Fd,
    process::WaitStatus,
    rt,
};

unsafe extern "C" {
    #[link_name = "stdin"]
    static mut STDIN: *mut FILE;
    #[link_name = "stdout"]
    static mut STDOUT: *mut FILE;
    #[link_name = "stderr"]
    static mut STDERR: *mut FILE;

    fn clearerr(stream: *mut FILE);
    #[link_name = "getdelim"]
    fn c_getdelim(
        lineptr: *mut *mut c_char,
        n: *mut usize,
        delimiter: c_int,
        stream: *mut FILE,
    ) -> isize;
}

/// Something that can be passed where C expects a `FILE *`.
pub trait AsStream {
    fn as_stream_ptr(&self) -> *mut FILE;
}

impl<T> AsStream for &T
where
    T: AsStream + ?Sized,
{
    fn as_stream_ptr(&self) -> *mut FILE {
        T::as_stream_ptr(self)
    }
}

impl<T> AsStream for &mut T
where
    T: AsStream + ?Sized,
{
    fn as_stream_ptr(&self) -> *mut FILE {
        T::as_stream_ptr(self)
    }
}

/// An owned `FILE *`, closed with `fclose` exactly once.
///
/// Drop follows the same rule as [`Fd`]: a failed `fclose` panics unless the
/// thread is already panicking.
pub struct Stream {
    ptr: NonNull<FILE>,
}

// stdio streams lock themselves
unsafe impl Send for Stream {}

impl Stream {
    /// `fopen(3)`.
    pub fn fopen(path: &CStr, mode: &CStr) -> Result<Self> {
        let ptr = cvt_null!(fopen(path.as_ptr(), mode.as_ptr()))?;
        Ok(Self {
            ptr: unsafe { NonNull::new_unchecked(ptr) },
        })
    }

    /// `fdopen(3)`. On success the stream takes over `fd`; on failure `fd`
    /// is closed.
    pub fn fdopen(fd: Fd, mode: &CStr) -> Result<Self> {
        let ptr = cvt_null!(fdopen(fd.get(), mode.as_ptr()))?;
        let _ = fd.into_raw_fd();
        Ok(Self {
            ptr: unsafe { NonNull::new_unchecked(ptr) },
        })
    }

    /// `fclose(3)`, reporting its failure.
    pub fn fclose(self) -> Result<()> {
        let ptr = self.ptr.as_ptr();
        core::mem::forget(self);
        fclose_raw(ptr)
    }
}

fn fclose_raw(ptr: *mut FILE) -> Result<()> {
    if unsafe { libc::fclose(ptr) } == libc::EOF {
        return Err(Error::from_errno("fclose"));
    }
    Ok(())
}

impl Drop for Stream {
    fn drop(&mut self) {
        rt::finish_release("Stream", fclose_raw(self.ptr.as_ptr()));
    }
}

impl AsStream for Stream {
    fn as_stream_ptr(&self) -> *mut FILE {
        self.ptr.as_ptr()
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream").field("ptr", &self.ptr).finish()
    }
}

/// One of the three standard streams. Never closed by this crate.
#[derive(Debug, Clone, Copy)]
pub struct StdStream {
    ptr: *mut FILE,
}

impl AsStream for StdStream {
    fn as_stream_ptr(&self) -> *mut FILE {
        self.ptr
    }
}

#[must_use]
pub fn stdin() -> StdStream {
    StdStream {
        ptr: unsafe { STDIN },
    }
}

#[must_use]
pub fn stdout() -> StdStream {
    StdStream {
        ptr: unsafe { STDOUT },
    }
}

#[must_use]
pub fn stderr() -> StdStream {
    StdStream {
        ptr: unsafe { STDERR },
    }
}

fn ferror(stream: *mut FILE) -> bool {
    unsafe { libc::ferror(stream) != 0 }
}

/// `fileno(3)`.
pub fn fileno<S>(stream: S) -> Result<RawFd>
where
    S: AsStream,
{
    cvt!(fileno(stream.as_stream_ptr()))
}

/// `fflush(3)`.
pub fn fflush<S>(stream: S) -> Result<()>
where
    S: AsStream,
{
    if unsafe { libc::fflush(stream.as_stream_ptr()) } == libc::EOF {
        return Err(Error::from_errno("fflush"));
    }
    Ok(())
}

/// `fputs(3)`.
pub fn fputs<S>(s: &CStr, stream: S) -> Result<()>
where
    S: AsStream,
{
    if unsafe { libc::fputs(s.as_ptr(), stream.as_stream_ptr()) } == libc::EOF {
        return Err(Error::from_errno("fputs"));
    }
    Ok(())
}

/// `fwrite(3)` of bytes. A short count always means an error.
pub fn fwrite<S>(buf: &[u8], stream: S) -> Result<usize>
where
    S: AsStream,
{
    let n = unsafe { libc::fwrite(buf.as_ptr().cast(), 1, buf.len(), stream.as_stream_ptr()) };
    if n < buf.len() {
        return Err(Error::from_errno("fwrite"));
    }
    Ok(n)
}

/// `fread(3)` of bytes. A short count at end of file is not an error.
pub fn fread<S>(buf: &mut [u8], stream: S) -> Result<usize>
where
    S: AsStream,
{
    let stream = stream.as_stream_ptr();
    unsafe { clearerr(stream) };
    let n = unsafe { libc::fread(buf.as_mut_ptr().cast(), 1, buf.len(), stream) };
    if n < buf.len() && ferror(stream) {
        return Err(Error::from_errno("fread"));
    }
    Ok(n)
}

/// `fgetc(3)`, which behaves exactly like `getc(3)`. Returns `None` at end of
/// file.
pub fn fgetc<S>(stream: S) -> Result<Option<u8>>
where
    S: AsStream,
{
    getc_impl("fgetc", stream.as_stream_ptr())
}

/// `getchar(3)`. Returns `None` at end of file.
pub fn getchar() -> Result<Option<u8>> {
    getc_impl("getchar", stdin().ptr)
}

fn getc_impl(function: &'static str, stream: *mut FILE) -> Result<Option<u8>> {
    unsafe { clearerr(stream) };
    let c = unsafe { libc::fgetc(stream) };
    if c == libc::EOF {
        if ferror(stream) {
            return Err(Error::from_errno(function));
        }
        return Ok(None);
    }
    Ok(Some(c.to_le_bytes()[0]))
}

/// Like [`fgetc`], but end of file is an [`ErrorKind::Eof`] error.
pub fn fgetc_strict<S>(stream: S) -> Result<u8>
where
    S: AsStream,
{
    fgetc(stream)?.ok_or_else(|| Error::new("fgetc_strict", ErrorKind::Eof))
}

/// Like [`getchar`], but end of file is an [`ErrorKind::Eof`] error.
pub fn getchar_strict() -> Result<u8> {
    getchar()?.ok_or_else(|| Error::new("getchar_strict", ErrorKind::Eof))
}

/// The `malloc`-owned buffer that `getdelim`/`getline` grow as needed.
pub struct LineBuf {
    ptr: *mut c_char,
    cap: usize,
    len: usize,
}

impl LineBuf {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ptr: core::ptr::null_mut(),
            cap: 0,
            len: 0,
        }
    }

    /// Bytes of the last line read, including the delimiter if present.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        if self.ptr.is_null() {
            return &[];
        }
        unsafe { core::slice::from_raw_parts(self.ptr.cast(), self.len) }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cap
    }
}

impl Default for LineBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LineBuf {
    fn drop(&mut self) {
        unsafe { libc::free(self.ptr.cast()) };
    }
}

impl fmt::Debug for LineBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineBuf")
            .field("line", &self.as_bytes().escape_ascii().to_string())
            .field("cap", &self.cap)
            .finish_non_exhaustive()
    }
}

/// `getdelim(3)`. Returns the length of the line read into `line`, or `None`
/// at end of file.
pub fn getdelim<S>(line: &mut LineBuf, delimiter: u8, stream: S) -> Result<Option<usize>>
where
    S: AsStream,
{
    getdelim_impl("getdelim", line, delimiter, stream.as_stream_ptr())
}

/// `getline(3)`: [`getdelim`] with `'\n'`.
pub fn getline<S>(line: &mut LineBuf, stream: S) -> Result<Option<usize>>
where
    S: AsStream,
{
    getdelim_impl("getline", line, b'\n', stream.as_stream_ptr())
}

fn getdelim_impl(
    function: &'static str,
    line: &mut LineBuf,
    delimiter: u8,
    stream: *mut FILE,
) -> Result<Option<usize>> {
    unsafe { clearerr(stream) };
    let n = unsafe {
        c_getdelim(
            &raw mut line.ptr,
            &raw mut line.cap,
            c_int::from(delimiter),
            stream,
        )
    };
    if n == -1 {
        line.len = 0;
        if ferror(stream) {
            return Err(Error::from_errno(function));
        }
        return Ok(None);
    }
    line.len = n.cast_unsigned();
    Ok(Some(line.len))
}

/// `vfprintf(3)` over Rust formatting arguments. Returns the number of bytes
/// written.
pub fn vfprintf<S>(stream: S, args: fmt::Arguments<'_>) -> Result<usize>
where
    S: AsStream,
{
    let stream = stream.as_stream_ptr();
    let text = args.to_string();
    let n = unsafe { libc::fwrite(text.as_ptr().cast(), 1, text.len(), stream) };
    if n < text.len() {
        return Err(Error::from_errno("vfprintf"));
    }
    Ok(n)
}

/// `vprintf(3)` over Rust formatting arguments. See also [`printf!`](crate::printf).
pub fn vprintf(args: fmt::Arguments<'_>) -> Result<usize> {
    let n = vfprintf(stdout(), args).map_err(|e| Error::new("vprintf", e.kind()))?;
    Ok(n)
}

/// A stream connected to a shell command started by `popen(3)`.
///
/// The command is waited for by [`Popen::pclose`], or on drop, where a
/// failed `pclose` panics unless the thread is already panicking.
pub struct Popen {
    ptr: NonNull<FILE>,
}

impl Popen {
    /// `popen(3)`.
    pub fn popen(command: &CStr, mode: &CStr) -> Result<Self> {
        let ptr = cvt_null!(popen(command.as_ptr(), mode.as_ptr()))?;
        log::trace!("popen: started {command:?}");
        Ok(Self {
            ptr: unsafe { NonNull::new_unchecked(ptr) },
        })
    }

    /// `pclose(3)`. Returns the wait status of the command.
    pub fn pclose(self) -> Result<WaitStatus> {
        let ptr = self.ptr.as_ptr();
        core::mem::forget(self);
        pclose_raw(ptr)
    }
}

fn pclose_raw(ptr: *mut FILE) -> Result<WaitStatus> {
    let status = cvt!(pclose(ptr))?;
    Ok(WaitStatus::from_raw(status))
}

impl Drop for Popen {
    fn drop(&mut self) {
        rt::finish_release("Popen", pclose_raw(self.ptr.as_ptr()).map(|_| ()));
    }
}

impl AsStream for Popen {
    fn as_stream_ptr(&self) -> *mut FILE {
        self.ptr.as_ptr()
    }
}

impl fmt::Debug for Popen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popen").field("ptr", &self.ptr).finish()
    }
}
