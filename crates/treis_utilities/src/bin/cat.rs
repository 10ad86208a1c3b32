use std::{
    ffi::CStr,
    io,
    os::fd::{AsFd, BorrowedFd},
    process::ExitCode,
};

use treis_libc::{
    error::Result,
    fcntl::{Fd, OpenFlags},
    io::write_repeatedly,
    rt, unistd,
};

fn cat(input: BorrowedFd<'_>, output: BorrowedFd<'_>) -> Result<()> {
    let mut buf = [0; 4096];
    loop {
        let nread = unistd::read(input, &mut buf)?;
        if nread == 0 {
            return Ok(());
        }
        write_repeatedly(output, &buf[..nread])?;
    }
}

fn cat_path(path: &CStr, output: BorrowedFd<'_>) -> Result<()> {
    if path == c"-" {
        return cat(io::stdin().as_fd(), output);
    }
    let file = Fd::open2(path, OpenFlags::READ_ONLY)?;
    log::debug!("copying {path:?} (fd {})", file.get());
    cat(file.as_fd(), output)?;
    file.close()
}

fn main() -> ExitCode {
    env_logger::init();

    rt::main_helper(|| {
        let stdout = io::stdout();
        let output = stdout.as_fd();
        let paths = treis_utilities::args_cstr().collect::<Vec<_>>();
        if paths.is_empty() {
            return cat(io::stdin().as_fd(), output);
        }
        for path in &paths {
            cat_path(path, output)?;
        }
        Ok(())
    })
}
