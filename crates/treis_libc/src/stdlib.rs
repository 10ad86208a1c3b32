//! `<stdlib.h>` wrappers: environment, temporary files, path resolution.

use std::{
    ffi::{CStr, CString, c_char},
    os::fd::FromRawFd as _,
};

use crate::{error::Result, fcntl::Fd};

/// `getenv(3)`. An unset variable is `None`, not an error.
#[must_use]
pub fn getenv(name: &CStr) -> Option<CString> {
    let value = unsafe { libc::getenv(name.as_ptr()) };
    if value.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(value) }.to_owned())
}

/// `setenv(3)`.
///
/// # Safety
///
/// No other thread may read or write the environment concurrently.
pub unsafe fn setenv(name: &CStr, value: &CStr, overwrite: bool) -> Result<()> {
    cvt!(setenv(name.as_ptr(), value.as_ptr(), overwrite.into()))?;
    Ok(())
}

/// `unsetenv(3)`.
///
/// # Safety
///
/// No other thread may read or write the environment concurrently.
pub unsafe fn unsetenv(name: &CStr) -> Result<()> {
    cvt!(unsetenv(name.as_ptr()))?;
    Ok(())
}

fn template_buf(template: &CStr) -> Vec<u8> {
    template.to_bytes_with_nul().to_vec()
}

fn into_cstring(buf: Vec<u8>) -> CString {
    // the call only overwrites the `X`s, so the single NUL stays last
    unsafe { CString::from_vec_with_nul_unchecked(buf) }
}

/// `mkstemp(3)`. `template` must end in `XXXXXX`; returns the open file and
/// the name that replaced them.
pub fn mkstemp(template: &CStr) -> Result<(Fd, CString)> {
    let mut buf = template_buf(template);
    let fd = cvt!(mkstemp(buf.as_mut_ptr().cast::<c_char>()))?;
    let fd = unsafe { Fd::from_raw_fd(fd) };
    Ok((fd, into_cstring(buf)))
}

/// `mkdtemp(3)`. Returns the name of the created directory.
pub fn mkdtemp(template: &CStr) -> Result<CString> {
    let mut buf = template_buf(template);
    cvt_null!(mkdtemp(buf.as_mut_ptr().cast::<c_char>()))?;
    Ok(into_cstring(buf))
}

/// `realpath(3)` with a null `resolved_path`; the `malloc`'d result is copied
/// and freed.
pub fn realpath(path: &CStr) -> Result<CString> {
    let resolved = cvt_null!(realpath(path.as_ptr(), core::ptr::null_mut()))?;
    let owned = unsafe { CStr::from_ptr(resolved) }.to_owned();
    unsafe { libc::free(resolved.cast()) };
    Ok(owned)
}
