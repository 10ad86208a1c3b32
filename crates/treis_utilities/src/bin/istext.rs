use std::{ffi::CStr, process::ExitCode};

use treis_libc::{
    error::{Error, Result},
    fcntl::{Fd, OpenFlags},
    io::read_repeatedly,
    printf, rt,
};

/// Number of leading bytes inspected.
const SAMPLE_LEN: usize = 1000;

/// A sample looks like text when it has no NUL byte and is valid UTF-8,
/// except possibly for a character cut off at the end of the sample.
fn looks_like_text(sample: &[u8]) -> bool {
    if memchr::memchr(0, sample).is_some() {
        return false;
    }
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

fn istext(path: &CStr) -> Result<bool> {
    let file = Fd::open2(path, OpenFlags::READ_ONLY)?;
    let mut sample = [0; SAMPLE_LEN];
    let len = read_repeatedly(&file, &mut sample)?;
    log::debug!("{path:?}: sampled {len} bytes");
    file.close()?;
    Ok(looks_like_text(&sample[..len]))
}

fn main() -> ExitCode {
    env_logger::init();

    let paths = treis_utilities::args_cstr().collect::<Vec<_>>();
    if paths.is_empty() {
        treis_utilities::usage_and_exit!("FILE...");
    }

    rt::main_helper(|| {
        for path in &paths {
            let kind = if istext(path)? { "text" } else { "binary" };
            printf!("{}: {kind}\n", path.to_string_lossy())?;
        }
        Ok::<_, Error>(())
    })
}
