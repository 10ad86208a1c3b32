use std::{ffi::CStr, process::ExitCode};

use treis_libc::{
    dirent::{Dir, FileType},
    error::{Error, Result},
    printf, rt,
    stat::{self, FileStat},
};

#[derive(Debug, Default, Clone, Copy)]
struct Options {
    all: bool,
    long: bool,
}

fn type_char(st: &FileStat) -> char {
    match st.file_type() {
        Some(FileType::Dir) => 'd',
        Some(FileType::Symlink) => 'l',
        Some(FileType::CharDevice) => 'c',
        Some(FileType::BlockDevice) => 'b',
        Some(FileType::Fifo) => 'p',
        Some(FileType::Socket) => 's',
        Some(FileType::File) | None => '-',
    }
}

fn print_entry(name: &CStr, path: &CStr, opts: Options) -> Result<()> {
    let name = name.to_string_lossy();
    if !opts.long {
        printf!("{name}\n")?;
        return Ok(());
    }
    let st = stat::lstat(path)?;
    printf!(
        "{}{:04o} {:3} {:10} {name}\n",
        type_char(&st),
        st.permissions(),
        st.nlink(),
        st.size(),
    )?;
    Ok(())
}

fn ls(path: &CStr, opts: Options) -> Result<()> {
    if !stat::stat(path)?.is_dir() {
        return print_entry(path, path, opts);
    }

    let dir = Dir::opendir(path)?;
    let mut entries = Vec::new();
    for ent in dir {
        let ent = ent?;
        if !opts.all && ent.name().to_bytes().starts_with(b".") {
            continue;
        }
        entries.push(ent);
    }
    entries.sort_by(|a, b| a.name().cmp(b.name()));
    log::debug!("{path:?}: {} entries", entries.len());

    for ent in &entries {
        let full = treis_utilities::join_path(path, ent.name());
        print_entry(ent.name(), &full, opts)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let mut opts = Options::default();
    let mut paths = Vec::new();
    for arg in treis_utilities::args_cstr() {
        match arg.to_bytes() {
            b"-a" => opts.all = true,
            b"-l" => opts.long = true,
            b"-la" | b"-al" => {
                opts.all = true;
                opts.long = true;
            }
            [b'-', _, ..] => treis_utilities::usage_and_exit!("[-a] [-l] [PATH...]"),
            _ => paths.push(arg),
        }
    }
    if paths.is_empty() {
        paths.push(c".".to_owned());
    }

    rt::main_helper(|| {
        let multiple = paths.len() > 1;
        for path in &paths {
            if multiple {
                printf!("{}:\n", path.to_string_lossy())?;
            }
            ls(path, opts)?;
        }
        Ok::<_, Error>(())
    })
}
