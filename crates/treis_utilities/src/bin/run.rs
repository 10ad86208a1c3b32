use std::{ffi::CString, process::ExitCode};

use treis_libc::{
    error::{Error, Result},
    process::{self, EXEC_FAILED, Fork},
    rt,
};
use treis_utilities::message_err;

fn run() -> Result<u8> {
    let args = treis_utilities::args_cstr().collect::<Vec<_>>();
    let argv = args.iter().map(CString::as_c_str).collect::<Vec<_>>();
    let Some(&command) = argv.first() else {
        treis_utilities::usage_and_exit!("COMMAND [ARG...]");
    };

    // SAFETY: no other thread has been started
    match unsafe { process::fork() }? {
        Fork::Child => {
            let Err(e) = process::execvp(command, &argv);
            message_err!(e, "cannot run {}", command.to_string_lossy());
            process::_exit(EXEC_FAILED)
        }
        Fork::Parent(child) => {
            log::debug!("running {command:?} as {}", child.id());
            let status = child.wait()?;
            log::debug!("{command:?} finished with {status}");
            let code = match (status.exit_code(), status.signal()) {
                (Some(code), _) => code,
                (None, Some(signal)) => 128 + signal,
                (None, None) => 1,
            };
            Ok(u8::try_from(code).unwrap_or(u8::MAX))
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut code = 0;
    let status = rt::main_helper(|| {
        code = run()?;
        Ok::<_, Error>(())
    });
    if code == 0 {
        status
    } else {
        ExitCode::from(code)
    }
}
