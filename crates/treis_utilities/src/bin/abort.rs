use std::process::ExitCode;

use treis_libc::{process, rt};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = treis_utilities::args_cstr();
    if args.len() > 1 {
        treis_utilities::usage_and_exit!("[MESSAGE]");
    }

    let Some(message) = args.next() else {
        log::debug!("aborting");
        process::abort();
    };

    rt::main_helper(|| -> Result<(), treis_libc::error::Error> {
        panic!("{}", message.to_string_lossy())
    })
}
