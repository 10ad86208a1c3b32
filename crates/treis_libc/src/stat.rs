//! `<sys/stat.h>` wrappers.

use core::{fmt, mem::MaybeUninit};
use std::{
    ffi::CStr,
    os::fd::{AsFd, AsRawFd as _},
};

pub use libc::{gid_t, ino_t, mode_t, nlink_t, off_t, uid_t};

use crate::{dirent::FileType, error::Result};

/// The result of `stat`, `lstat` or `fstat`.
#[derive(Clone, Copy)]
pub struct FileStat(libc::stat);

impl FileStat {
    #[must_use]
    pub fn as_raw(&self) -> &libc::stat {
        &self.0
    }

    #[must_use]
    pub fn ino(&self) -> ino_t {
        self.0.st_ino
    }

    /// The whole `st_mode`, type bits included.
    #[must_use]
    pub fn mode(&self) -> mode_t {
        self.0.st_mode
    }

    /// The permission bits of `st_mode`.
    #[must_use]
    pub fn permissions(&self) -> mode_t {
        self.0.st_mode & 0o7777
    }

    #[must_use]
    pub fn file_type(&self) -> Option<FileType> {
        let ty = match self.0.st_mode & libc::S_IFMT {
            libc::S_IFIFO => FileType::Fifo,
            libc::S_IFCHR => FileType::CharDevice,
            libc::S_IFDIR => FileType::Dir,
            libc::S_IFBLK => FileType::BlockDevice,
            libc::S_IFREG => FileType::File,
            libc::S_IFLNK => FileType::Symlink,
            libc::S_IFSOCK => FileType::Socket,
            _ => return None,
        };
        Some(ty)
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.file_type() == Some(FileType::Dir)
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        self.file_type() == Some(FileType::File)
    }

    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.file_type() == Some(FileType::Symlink)
    }

    #[must_use]
    pub fn nlink(&self) -> nlink_t {
        self.0.st_nlink
    }

    #[must_use]
    pub fn uid(&self) -> uid_t {
        self.0.st_uid
    }

    #[must_use]
    pub fn gid(&self) -> gid_t {
        self.0.st_gid
    }

    #[must_use]
    pub fn size(&self) -> off_t {
        self.0.st_size
    }

    /// Modification time in seconds since the epoch.
    #[must_use]
    pub fn mtime(&self) -> libc::time_t {
        self.0.st_mtime
    }
}

impl fmt::Debug for FileStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStat")
            .field("ino", &self.ino())
            .field("mode", &format_args!("{:o}", self.mode()))
            .field("nlink", &self.nlink())
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

/// `stat(2)`.
pub fn stat(path: &CStr) -> Result<FileStat> {
    let mut buf = MaybeUninit::uninit();
    cvt!(stat(path.as_ptr(), buf.as_mut_ptr()))?;
    Ok(FileStat(unsafe { buf.assume_init() }))
}

/// `lstat(2)`: like [`stat`], but does not follow a final symbolic link.
pub fn lstat(path: &CStr) -> Result<FileStat> {
    let mut buf = MaybeUninit::uninit();
    cvt!(lstat(path.as_ptr(), buf.as_mut_ptr()))?;
    Ok(FileStat(unsafe { buf.assume_init() }))
}

/// `fstat(2)`.
pub fn fstat<F>(fildes: F) -> Result<FileStat>
where
    F: AsFd,
{
    let mut buf = MaybeUninit::uninit();
    cvt!(fstat(fildes.as_fd().as_raw_fd(), buf.as_mut_ptr()))?;
    Ok(FileStat(unsafe { buf.assume_init() }))
}

/// `mkdir(2)`.
pub fn mkdir(path: &CStr, mode: mode_t) -> Result<()> {
    cvt!(mkdir(path.as_ptr(), mode))?;
    Ok(())
}

/// `chmod(2)`.
pub fn chmod(path: &CStr, mode: mode_t) -> Result<()> {
    cvt!(chmod(path.as_ptr(), mode))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{ffi::CString, os::unix::fs::symlink, path::Path};

    use super::*;
    use crate::{
        error::Errno,
        fcntl::{Fd, OpenFlags},
        unistd,
    };

    fn c_path(path: &Path) -> CString {
        CString::new(path.as_os_str().as_encoded_bytes()).unwrap()
    }

    #[test]
    fn stat_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        let link = dir.path().join("link");
        std::fs::write(&file, "12345").unwrap();
        symlink(&file, &link).unwrap();

        let st = stat(&c_path(dir.path())).unwrap();
        assert!(st.is_dir());

        let st = stat(&c_path(&link)).unwrap();
        assert!(st.is_file());
        assert_eq!(st.size(), 5);
        assert_eq!(st.nlink(), 1);

        let st = lstat(&c_path(&link)).unwrap();
        assert!(st.is_symlink());
        assert_eq!(st.file_type(), Some(FileType::Symlink));

        let fd = Fd::open2(&c_path(&file), OpenFlags::READ_ONLY).unwrap();
        assert_eq!(fstat(&fd).unwrap().ino(), stat(&c_path(&file)).unwrap().ino());

        let st = stat(c"/dev/null").unwrap();
        assert_eq!(st.file_type(), Some(FileType::CharDevice));
    }

    #[test]
    fn mkdir_and_chmod() {
        let dir = tempfile::tempdir().unwrap();
        let sub = c_path(&dir.path().join("sub"));
        mkdir(&sub, 0o755).unwrap();
        let e = mkdir(&sub, 0o755).unwrap_err();
        assert_eq!(e.function(), "mkdir");
        assert_eq!(e.errno(), Some(Errno::EEXIST));

        chmod(&sub, 0o700).unwrap();
        assert_eq!(stat(&sub).unwrap().permissions(), 0o700);
        unistd::rmdir(&sub).unwrap();
        assert_eq!(stat(&sub).unwrap_err().errno(), Some(Errno::ENOENT));
    }
}
