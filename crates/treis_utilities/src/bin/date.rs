use std::{ffi::CString, process::ExitCode};

use treis_libc::{printf, rt, time};

const DEFAULT_FORMAT: &std::ffi::CStr = c"%a %b %e %H:%M:%S %Z %Y";

fn usage() -> ! {
    treis_utilities::usage_and_exit!("[-u] [+FORMAT]")
}

fn main() -> ExitCode {
    env_logger::init();

    let mut utc = false;
    let mut format = DEFAULT_FORMAT.to_owned();
    for arg in treis_utilities::args_cstr() {
        match arg.to_bytes() {
            b"-u" => utc = true,
            [b'+', rest @ ..] => {
                format = CString::new(rest).unwrap_or_else(|_| usage());
            }
            _ => usage(),
        }
    }

    rt::main_helper(|| {
        let now = time::time()?;
        let tm = if utc {
            time::gmtime_r(now)?
        } else {
            time::localtime_r(now)?
        };
        log::debug!("formatting {now} with {format:?}");
        printf!("{}\n", time::strftime(&format, &tm)?)?;
        Ok::<_, treis_libc::error::Error>(())
    })
}
