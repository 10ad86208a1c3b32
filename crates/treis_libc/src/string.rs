//! Message lookup and string-to-number conversion.
//!
//! The `strto*` wrappers return the converted value together with the number
//! of bytes consumed, which is where C would have set `*endptr`. Leftover
//! characters are normal for the lenient wrappers. The `_strict` wrappers
//! require the whole string to be a number.

use core::ptr::{self, NonNull};
use std::ffi::{CStr, c_char, c_double, c_int, c_long, c_longlong, c_ulong};

pub use libc::{LC_ALL_MASK, locale_t};

use crate::error::{Errno, Error, ErrorKind, Result};

unsafe extern "C" {
    #[link_name = "strerror_l"]
    fn c_strerror_l(errnum: c_int, locale: locale_t) -> *mut c_char;
}

/// A locale object from `newlocale(3)`, freed on drop.
#[derive(Debug)]
pub struct Locale {
    ptr: NonNull<core::ffi::c_void>,
}

impl Locale {
    /// `newlocale(3)` with no base locale.
    pub fn new(category_mask: c_int, locale: &CStr) -> Result<Self> {
        let ptr = cvt_null!(newlocale(category_mask, locale.as_ptr(), ptr::null_mut()))?;
        Ok(Self {
            ptr: unsafe { NonNull::new_unchecked(ptr.cast()) },
        })
    }

    /// The `"POSIX"` locale for every category.
    pub fn posix() -> Result<Self> {
        Self::new(LC_ALL_MASK, c"POSIX")
    }

    #[must_use]
    pub fn as_raw(&self) -> locale_t {
        self.ptr.as_ptr().cast()
    }
}

impl Drop for Locale {
    fn drop(&mut self) {
        // freelocale reports nothing
        unsafe { libc::freelocale(self.as_raw()) }
    }
}

/// `strerror_l(3)`. A null result is [`ErrorKind::Failed`].
pub fn strerror_l(errnum: c_int, locale: &Locale) -> Result<String> {
    let msg = unsafe { c_strerror_l(errnum, locale.as_raw()) };
    if msg.is_null() {
        return Err(Error::new("strerror_l", ErrorKind::Failed));
    }
    Ok(unsafe { CStr::from_ptr(msg) }
        .to_string_lossy()
        .into_owned())
}

fn convert<T>(
    function: &'static str,
    nptr: &CStr,
    f: impl FnOnce(*const c_char, *mut *mut c_char) -> T,
) -> Result<(T, usize)> {
    let mut end = ptr::null_mut();
    Errno::clear();
    let value = f(nptr.as_ptr(), &raw mut end);
    match Errno::last_raw() {
        0 => {}
        errnum => return Err(Error::from_raw_errno(function, errnum)),
    }
    let consumed = unsafe { end.cast_const().offset_from(nptr.as_ptr()) };
    Ok((value, consumed.cast_unsigned()))
}

fn whole<T>(function: &'static str, nptr: &CStr, (value, consumed): (T, usize)) -> Result<T> {
    if consumed == 0 || consumed != nptr.count_bytes() {
        return Err(Error::new(function, ErrorKind::Junk));
    }
    Ok(value)
}

/// `strtol(3)`. Out-of-range input is an `ERANGE` error.
pub fn strtol(nptr: &CStr, base: c_int) -> Result<(c_long, usize)> {
    convert("strtol", nptr, |s, end| unsafe { libc::strtol(s, end, base) })
}

/// `strtoll(3)`.
pub fn strtoll(nptr: &CStr, base: c_int) -> Result<(c_longlong, usize)> {
    convert("strtoll", nptr, |s, end| unsafe { libc::strtoll(s, end, base) })
}

/// `strtoul(3)`. Note that C accepts a leading minus sign here and negates
/// the result.
pub fn strtoul(nptr: &CStr, base: c_int) -> Result<(c_ulong, usize)> {
    convert("strtoul", nptr, |s, end| unsafe { libc::strtoul(s, end, base) })
}

/// `strtod(3)`.
pub fn strtod(nptr: &CStr) -> Result<(c_double, usize)> {
    convert("strtod", nptr, |s, end| unsafe { libc::strtod(s, end) })
}

/// Like [`strtol`], but the whole string must be consumed.
pub fn strtol_strict(nptr: &CStr, base: c_int) -> Result<c_long> {
    whole("strtol_strict", nptr, strtol(nptr, base)?)
}

pub fn strtoll_strict(nptr: &CStr, base: c_int) -> Result<c_longlong> {
    whole("strtoll_strict", nptr, strtoll(nptr, base)?)
}

pub fn strtoul_strict(nptr: &CStr, base: c_int) -> Result<c_ulong> {
    whole("strtoul_strict", nptr, strtoul(nptr, base)?)
}

pub fn strtod_strict(nptr: &CStr) -> Result<c_double> {
    whole("strtod_strict", nptr, strtod(nptr)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_messages() {
        let posix = Locale::posix().unwrap();
        assert_eq!(
            strerror_l(libc::ENOENT, &posix).unwrap(),
            "No such file or directory"
        );
        assert_eq!(strerror_l(libc::EBADF, &posix).unwrap(), "Bad file descriptor");
    }

    #[test]
    fn unknown_locale() {
        let e = Locale::new(LC_ALL_MASK, c"xx_NOWHERE.treis").unwrap_err();
        assert_eq!(e.function(), "newlocale");
        assert_eq!(e.errno(), Some(Errno::ENOENT));
    }

    #[test]
    fn lenient_conversion_reports_rest() {
        assert_eq!(strtol(c"  42abc", 10).unwrap(), (42, 4));
        assert_eq!(strtol(c"ff", 16).unwrap(), (255, 2));
        assert_eq!(strtol(c"0x1F", 0).unwrap(), (31, 4));
        assert_eq!(strtoll(c"-9000000000", 10).unwrap(), (-9_000_000_000, 11));
        assert_eq!(strtoul(c"7 ", 8).unwrap(), (7, 1));
        assert_eq!(strtod(c"2.5e1x").unwrap(), (25.0, 5));
        assert_eq!(strtol(c"none", 10).unwrap(), (0, 0));
    }

    #[test]
    fn natural_errors() {
        let e = strtol(c"99999999999999999999999", 10).unwrap_err();
        assert_eq!(e.function(), "strtol");
        assert_eq!(e.errno(), Some(Errno::ERANGE));
        assert!(e.to_string().starts_with("strtol: "));

        let e = strtol(c"10", 99).unwrap_err();
        assert_eq!(e.errno(), Some(Errno::EINVAL));

        let e = strtod(c"1e999999").unwrap_err();
        assert_eq!(e.errno(), Some(Errno::ERANGE));
    }

    #[test]
    fn strict_conversion() {
        assert_eq!(strtol_strict(c"-12", 10).unwrap(), -12);
        assert_eq!(strtoll_strict(c"123456789012", 10).unwrap(), 123_456_789_012);
        assert_eq!(strtoul_strict(c"0777", 0).unwrap(), 0o777);
        assert_eq!(strtod_strict(c"0.5").unwrap(), 0.5);

        let e = strtol_strict(c"12 ", 10).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Junk);
        assert_eq!(e.to_string(), "strtol_strict: Junk after number");
        assert_eq!(strtol_strict(c"", 10).unwrap_err().kind(), ErrorKind::Junk);
        assert_eq!(strtod_strict(c"x").unwrap_err().function(), "strtod_strict");
        // the natural error wins over the strict one
        assert_eq!(
            strtoul_strict(c"99999999999999999999999", 10)
                .unwrap_err()
                .function(),
            "strtoul"
        );
    }
}
