//! Helpers that repeat `read`/`write` until a whole buffer is transferred.
//!
//! Repetition matters for terminals and pipes, where a single call may return
//! fewer bytes than requested without having reached the end of the input.

use std::os::fd::AsFd;

use crate::{
    error::{Error, ErrorKind, Result},
    unistd,
};

/// Reads until `buf` is full or `read` returns 0, and returns the number of
/// bytes read.
///
/// Useful for sampling the head of a file, e.g. to guess whether it is text.
/// An empty `buf` performs no call at all.
pub fn read_repeatedly<F>(fildes: F, buf: &mut [u8]) -> Result<usize>
where
    F: AsFd,
{
    let fildes = fildes.as_fd();
    let mut have_read = 0;
    while have_read < buf.len() {
        let n = unistd::read(fildes, &mut buf[have_read..])?;
        if n == 0 {
            break;
        }
        have_read += n;
    }
    Ok(have_read)
}

/// Reads one fixed-size block.
///
/// Returns `true` if the block was read completely and `false` if the input
/// was already at its end. Input ending inside the block is an
/// [`ErrorKind::PartialData`] error.
pub fn read_full<F>(fildes: F, buf: &mut [u8]) -> Result<bool>
where
    F: AsFd,
{
    let have_read = read_repeatedly(fildes, buf)?;
    if have_read == buf.len() {
        return Ok(true);
    }
    if have_read == 0 {
        return Ok(false);
    }
    Err(Error::new("read_full", ErrorKind::PartialData))
}

/// Like [`read_full`], but end of input is an [`ErrorKind::Eof`] error.
pub fn read_full_strict<F>(fildes: F, buf: &mut [u8]) -> Result<()>
where
    F: AsFd,
{
    if !read_full(fildes, buf)? {
        return Err(Error::new("read_full_strict", ErrorKind::Eof));
    }
    Ok(())
}

/// Writes the whole of `buf`, repeating `write` after short writes.
///
/// A `write` that accepts no bytes at all is reported as
/// [`ErrorKind::Failed`].
pub fn write_repeatedly<F>(fildes: F, mut buf: &[u8]) -> Result<()>
where
    F: AsFd,
{
    let fildes = fildes.as_fd();
    while !buf.is_empty() {
        let n = unistd::write(fildes, buf)?;
        if n == 0 {
            return Err(Error::new("write_repeatedly", ErrorKind::Failed));
        }
        buf = &buf[n..];
    }
    Ok(())
}
