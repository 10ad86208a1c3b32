use std::{
    ffi::{CStr, CString, OsString},
    os::unix::ffi::OsStringExt as _,
};

#[doc(hidden)]
pub use treis_libc as __libc;

#[macro_export]
macro_rules! message {
    ($($msg:tt)*) => {
        {
            let prog = $crate::__libc::rt::program_name();
            ::std::eprintln!(
                "{prog}: {msg}",
                prog = prog.to_string_lossy(),
                msg = ::core::format_args!($($msg)*),
            );
        }
    }
}

#[macro_export]
macro_rules! message_err {
    ($err:expr, $($msg:tt)*) => {
        $crate::message!("{msg}: {err}", msg = ::core::format_args!($($msg)*), err = $err)
    };
}

#[macro_export]
macro_rules! usage_and_exit {
    ($($args:tt)*) => {
        {
            let prog = $crate::__libc::rt::program_name();
            ::std::eprintln!(
                "Usage: {prog} {args}",
                prog = prog.to_string_lossy(),
                args = ::core::format_args!($($args)*),
            );
            $crate::__libc::process::exit(2);
        }
    };
}

/// Command-line arguments after the program name, as C strings.
///
/// Arguments never contain NUL bytes, so the conversion cannot fail.
pub fn args_cstr() -> impl ExactSizeIterator<Item = CString> {
    std::env::args_os().skip(1).map(os_to_cstring)
}

#[must_use]
pub fn os_to_cstring(arg: OsString) -> CString {
    let mut bytes = arg.into_vec();
    bytes.retain(|&b| b != 0);
    bytes.push(0);
    CString::from_vec_with_nul(bytes).unwrap_or_default()
}

/// Joins a directory path and an entry name with a single `/`.
#[must_use]
pub fn join_path(dir: &CStr, name: &CStr) -> CString {
    let mut bytes = dir.to_bytes().to_vec();
    if !bytes.ends_with(b"/") {
        bytes.push(b'/');
    }
    bytes.extend_from_slice(name.to_bytes());
    bytes.push(0);
    CString::from_vec_with_nul(bytes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_adds_single_separator() {
        assert_eq!(join_path(c"/tmp", c"a").as_c_str(), c"/tmp/a");
        assert_eq!(join_path(c"/", c"etc").as_c_str(), c"/etc");
        assert_eq!(join_path(c"dir/", c"x").as_c_str(), c"dir/x");
    }

    #[test]
    fn os_string_conversion() {
        assert_eq!(os_to_cstring(OsString::from("abc")).as_c_str(), c"abc");
    }
}
