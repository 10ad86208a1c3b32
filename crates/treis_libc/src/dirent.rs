//! `<dirent.h>` wrappers.

use core::{fmt, ptr::NonNull};
use std::{
    ffi::{CStr, CString},
    os::fd::{AsRawFd as _, IntoRawFd as _, RawFd},
};

use libc::{DIR, ino_t};
use strum::{Display, FromRepr};

use crate::{
    error::{Errno, Error, Result},
    fcntl::Fd,
    rt,
};

/// File type reported in `d_type`. Not every file system fills it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, Display)]
#[repr(u8)]
pub enum FileType {
    #[strum(to_string = "fifo")]
    Fifo = libc::DT_FIFO,
    #[strum(to_string = "character device")]
    CharDevice = libc::DT_CHR,
    #[strum(to_string = "directory")]
    Dir = libc::DT_DIR,
    #[strum(to_string = "block device")]
    BlockDevice = libc::DT_BLK,
    #[strum(to_string = "regular file")]
    File = libc::DT_REG,
    #[strum(to_string = "symbolic link")]
    Symlink = libc::DT_LNK,
    #[strum(to_string = "socket")]
    Socket = libc::DT_SOCK,
}

/// One entry read from a directory stream, copied out of the `dirent`
/// buffer, which the next `readdir` may overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    ino: ino_t,
    name: CString,
    file_type: Option<FileType>,
}

impl DirEntry {
    #[must_use]
    pub fn ino(&self) -> ino_t {
        self.ino
    }

    #[must_use]
    pub fn name(&self) -> &CStr {
        &self.name
    }

    /// `None` for `DT_UNKNOWN`.
    #[must_use]
    pub fn file_type(&self) -> Option<FileType> {
        self.file_type
    }

    /// `true` for `.` and `..`.
    #[must_use]
    pub fn is_dot_or_dot_dot(&self) -> bool {
        matches!(self.name.to_bytes(), b"." | b"..")
    }
}

/// An open directory stream, closed with `closedir` exactly once.
pub struct Dir {
    ptr: NonNull<DIR>,
}

// a DIR is only touched through `&mut self` or by value
unsafe impl Send for Dir {}

impl Dir {
    /// `opendir(3)`.
    pub fn opendir(path: &CStr) -> Result<Self> {
        let ptr = cvt_null!(opendir(path.as_ptr()))?;
        Ok(Self {
            ptr: unsafe { NonNull::new_unchecked(ptr) },
        })
    }

    /// `fdopendir(3)`. On success the stream takes over `fd`; on failure `fd`
    /// is closed.
    pub fn fdopendir(fd: Fd) -> Result<Self> {
        let ptr = cvt_null!(fdopendir(fd.as_raw_fd()))?;
        let _ = fd.into_raw_fd();
        Ok(Self {
            ptr: unsafe { NonNull::new_unchecked(ptr) },
        })
    }

    /// `readdir(3)`. Returns `None` at the end of the stream.
    ///
    /// `readdir` signals both the end and an error with a null pointer, so
    /// `errno` is cleared first and consulted afterwards.
    pub fn readdir(&mut self) -> Result<Option<DirEntry>> {
        Errno::clear();
        let ent = unsafe { libc::readdir(self.ptr.as_ptr()) };
        if ent.is_null() {
            return match Errno::last_raw() {
                0 => Ok(None),
                errnum => Err(Error::from_raw_errno("readdir", errnum)),
            };
        }
        let ent = unsafe { &*ent };
        let name = unsafe { CStr::from_ptr(ent.d_name.as_ptr()) };
        Ok(Some(DirEntry {
            ino: ent.d_ino,
            name: name.to_owned(),
            file_type: FileType::from_repr(ent.d_type),
        }))
    }

    /// `rewinddir(3)`. Always successful.
    pub fn rewinddir(&mut self) {
        unsafe { libc::rewinddir(self.ptr.as_ptr()) }
    }

    /// `dirfd(3)`. The descriptor stays owned by the stream.
    pub fn dirfd(&self) -> Result<RawFd> {
        cvt!(dirfd(self.ptr.as_ptr()))
    }

    /// `closedir(3)`, reporting its failure.
    pub fn closedir(self) -> Result<()> {
        let ptr = self.ptr.as_ptr();
        core::mem::forget(self);
        closedir_raw(ptr)
    }
}

fn closedir_raw(ptr: *mut DIR) -> Result<()> {
    cvt!(closedir(ptr))?;
    Ok(())
}

impl Drop for Dir {
    fn drop(&mut self) {
        rt::finish_release("Dir", closedir_raw(self.ptr.as_ptr()));
    }
}

impl fmt::Debug for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dir").field("ptr", &self.ptr).finish()
    }
}

impl Iterator for Dir {
    type Item = Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.readdir().transpose()
    }
}
