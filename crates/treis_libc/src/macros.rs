/// Calls a libc function that reports failure by returning `-1`.
macro_rules! cvt {
    ($func:ident ( $($arg:expr),* $(,)? )) => {{
        let ret = unsafe { ::libc::$func($($arg),*) };
        if ret == -1 {
            Err($crate::error::Error::from_errno(stringify!($func)))
        } else {
            Ok(ret)
        }
    }};
}

/// Calls a libc function that reports failure by returning a null pointer.
macro_rules! cvt_null {
    ($func:ident ( $($arg:expr),* $(,)? )) => {{
        let ret = unsafe { ::libc::$func($($arg),*) };
        if ret.is_null() {
            Err($crate::error::Error::from_errno(stringify!($func)))
        } else {
            Ok(ret)
        }
    }};
}

/// Formats with Rust syntax and writes to the C `stdout` stream.
#[macro_export]
macro_rules! printf {
    ($($arg:tt)*) => {
        $crate::stdio::vprintf(::core::format_args!($($arg)*))
    };
}

/// Formats with Rust syntax and writes to a stream.
#[macro_export]
macro_rules! fprintf {
    ($stream:expr, $($arg:tt)*) => {
        $crate::stdio::vfprintf($stream, ::core::format_args!($($arg)*))
    };
}
