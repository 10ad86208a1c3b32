//! Wrappers around POSIX and glibc functions that report failure as
//! [`error::Error`] instead of through `errno` and sentinel return values.
//!
//! Each wrapper calls its namesake exactly once and passes the result through
//! unchanged unless the call's documented failure indicator occurred. Conditions
//! the C function treats as normal, such as end of file, are not errors;
//! wrappers with a `_strict` suffix report them as errors too.
//!
//! Resources are held by owning handles ([`fcntl::Fd`], [`dirent::Dir`],
//! [`stdio::Stream`], [`stdio::Popen`], [`process::Child`]) which release
//! them on drop. A failed release panics, except while the thread is already
//! panicking, where it is logged and ignored.

#[macro_use]
mod macros;

pub mod dirent;
pub mod error;
pub mod fcntl;
pub mod io;
pub mod process;
pub mod rt;
pub mod stat;
pub mod stdio;
pub mod stdlib;
pub mod string;
pub mod thread;
pub mod time;
pub mod unistd;
