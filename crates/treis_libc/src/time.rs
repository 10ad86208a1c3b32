//! `<time.h>` wrappers.

use core::mem::MaybeUninit;
use std::ffi::CStr;

pub use libc::{CLOCK_MONOTONIC, CLOCK_REALTIME, clockid_t, time_t, timespec, tm};

use crate::error::{Errno, Error, ErrorKind, Result};

/// `time(2)`.
pub fn time() -> Result<time_t> {
    cvt!(time(core::ptr::null_mut()))
}

/// `localtime_r(3)`.
pub fn localtime_r(timer: time_t) -> Result<tm> {
    let mut result = MaybeUninit::<tm>::uninit();
    cvt_null!(localtime_r(&raw const timer, result.as_mut_ptr()))?;
    Ok(unsafe { result.assume_init() })
}

/// `gmtime_r(3)`.
pub fn gmtime_r(timer: time_t) -> Result<tm> {
    let mut result = MaybeUninit::<tm>::uninit();
    cvt_null!(gmtime_r(&raw const timer, result.as_mut_ptr()))?;
    Ok(unsafe { result.assume_init() })
}

/// `mktime(3)`. `time` is normalised in place, as C does.
///
/// `-1` is also the valid result for one second before the epoch, so only a
/// `-1` that comes with an `errno` is a failure.
pub fn mktime(time: &mut tm) -> Result<time_t> {
    Errno::clear();
    let t = unsafe { libc::mktime(time) };
    if t == -1 && Errno::last_raw() != 0 {
        return Err(Error::from_errno("mktime"));
    }
    Ok(t)
}

/// `clock_gettime(2)`.
pub fn clock_gettime(clock: clockid_t) -> Result<timespec> {
    let mut tp = MaybeUninit::<timespec>::uninit();
    cvt!(clock_gettime(clock, tp.as_mut_ptr()))?;
    Ok(unsafe { tp.assume_init() })
}

/// `nanosleep(2)`. An interrupted sleep is an `EINTR` error.
pub fn nanosleep(request: &timespec) -> Result<()> {
    cvt!(nanosleep(request, core::ptr::null_mut()))?;
    Ok(())
}

const STRFTIME_INITIAL: usize = 256;
// 256 x 4^4
const STRFTIME_LIMIT: usize = 65_536;

/// `strftime(3)`.
///
/// `strftime` returns 0 both when the buffer is too small and for formats
/// that legitimately expand to nothing, and sets no `errno` in either case.
/// The buffer is grown a few times before a zero is taken as
/// [`ErrorKind::Failed`]; an empty `format` yields an empty string.
pub fn strftime(format: &CStr, time: &tm) -> Result<String> {
    if format.is_empty() {
        return Ok(String::new());
    }
    let mut buf = vec![0_u8; STRFTIME_INITIAL];
    loop {
        let n = unsafe { libc::strftime(buf.as_mut_ptr().cast(), buf.len(), format.as_ptr(), time) };
        if n > 0 {
            buf.truncate(n);
            return Ok(String::from_utf8_lossy(&buf).into_owned());
        }
        if buf.len() >= STRFTIME_LIMIT {
            return Err(Error::new("strftime", ErrorKind::Failed));
        }
        buf.resize(buf.len() * 4, 0);
    }
}
