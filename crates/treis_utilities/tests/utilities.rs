#![cfg(test)]

use std::{
    fs,
    io::Write as _,
    os::unix::process::ExitStatusExt as _,
    path::Path,
    process::{Command, Output, Stdio},
};

use anyhow::{Context as _, ensure};
use regex::Regex;
use treis_libc::process::SIGABRT;

fn command(bin: &str) -> Command {
    let mut cmd = Command::new(bin);
    // errors print a call stack when backtraces are enabled
    cmd.env_remove("RUST_BACKTRACE")
        .env_remove("RUST_LIB_BACKTRACE")
        .env_remove("RUST_LOG");
    cmd
}

fn run<I, S>(bin: &str, args: I) -> Result<Output, anyhow::Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    command(bin)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("failed to run {bin}"))
}

fn stdout(output: &Output) -> &str {
    std::str::from_utf8(&output.stdout).unwrap()
}

fn stderr(output: &Output) -> &str {
    std::str::from_utf8(&output.stderr).unwrap()
}

fn write_files(dir: &Path, files: &[(&str, &str)]) -> Result<(), anyhow::Error> {
    for (name, content) in files {
        fs::write(dir.join(name), content)?;
    }
    Ok(())
}

const CAT: &str = env!("CARGO_BIN_EXE_cat");
const LS: &str = env!("CARGO_BIN_EXE_ls");
const DATE: &str = env!("CARGO_BIN_EXE_date");
const ISTEXT: &str = env!("CARGO_BIN_EXE_istext");
const RUN: &str = env!("CARGO_BIN_EXE_run");
const ABORT: &str = env!("CARGO_BIN_EXE_abort");

#[test]
fn cat_concatenates_files() -> Result<(), anyhow::Error> {
    let dir = tempfile::tempdir()?;
    write_files(dir.path(), &[("a", "first\n"), ("b", "second\n")])?;
    let output = run(CAT, [dir.path().join("a"), dir.path().join("b")])?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "first\nsecond\n");
    Ok(())
}

#[test]
fn cat_reads_standard_input() -> Result<(), anyhow::Error> {
    let mut child = command(CAT)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .context("stdin is piped")?
        .write_all(b"from stdin")?;
    let output = child.wait_with_output()?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "from stdin");
    Ok(())
}

#[test]
fn cat_reports_missing_file() -> Result<(), anyhow::Error> {
    let output = run(CAT, ["/nonexistent/treis"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "cat: open: No such file or directory\n");
    Ok(())
}

#[test]
fn ls_lists_sorted_entries() -> Result<(), anyhow::Error> {
    let dir = tempfile::tempdir()?;
    write_files(dir.path(), &[("b", ""), ("a", "12345"), (".hidden", "")])?;

    let output = run(LS, [dir.path()])?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "a\nb\n");

    let output = run(LS, [dir.path().as_os_str(), "-a".as_ref()])?;
    assert_eq!(stdout(&output), ".\n..\n.hidden\na\nb\n");

    let output = run(LS, [dir.path().as_os_str(), "-l".as_ref()])?;
    let re = Regex::new(r"^-\d{4} +1 +5 a\n-\d{4} +1 +0 b\n$")?;
    ensure!(re.is_match(stdout(&output)), "{:?}", stdout(&output));
    Ok(())
}

#[test]
fn ls_reports_missing_directory() -> Result<(), anyhow::Error> {
    let output = run(LS, ["/nonexistent/treis"])?;
    assert!(!output.status.success());
    assert_eq!(stderr(&output), "ls: stat: No such file or directory\n");
    Ok(())
}

#[test]
fn date_formats() -> Result<(), anyhow::Error> {
    let output = run(DATE, ["-u", "+%Y-%m-%d %H:%M"])?;
    assert!(output.status.success());
    let re = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}\n$")?;
    ensure!(re.is_match(stdout(&output)), "{:?}", stdout(&output));

    let output = run(DATE, ["-u"])?;
    let re = Regex::new(r"^\w{3} \w{3} [ \d]\d \d{2}:\d{2}:\d{2} (UTC|GMT) \d{4}\n$")?;
    ensure!(re.is_match(stdout(&output)), "{:?}", stdout(&output));

    let output = run(DATE, ["--bogus"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).starts_with("Usage: date"));
    Ok(())
}

#[test]
fn istext_classifies_files() -> Result<(), anyhow::Error> {
    let dir = tempfile::tempdir()?;
    let mut long_text = "line of text\n".repeat(200);
    long_text.push_str("\0 after the sampled prefix");
    write_files(
        dir.path(),
        &[("text", "hello\n"), ("binary", "\x7fELF\0\0"), ("long", long_text.as_str())],
    )?;

    let output = run(ISTEXT, ["text", "binary", "long"].map(|name| dir.path().join(name)))?;
    assert!(output.status.success());
    let lines = stdout(&output).lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("text: text"));
    assert!(lines[1].ends_with("binary: binary"));
    assert!(lines[2].ends_with("long: text"));
    Ok(())
}

#[test]
fn run_propagates_exit_status() -> Result<(), anyhow::Error> {
    let output = run(RUN, ["sh", "-c", "exit 3"])?;
    assert_eq!(output.status.code(), Some(3));

    let output = run(RUN, ["echo", "hello"])?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "hello\n");

    let output = run(RUN, ["sh", "-c", "kill -9 $$"])?;
    assert_eq!(output.status.code(), Some(128 + 9));
    Ok(())
}

#[test]
fn run_missing_command() -> Result<(), anyhow::Error> {
    let output = run(RUN, ["treis-no-such-command"])?;
    assert_eq!(output.status.code(), Some(127));
    let re = Regex::new(r"^run: cannot run treis-no-such-command: execvp: No such file or directory\n$")?;
    ensure!(re.is_match(stderr(&output)), "{:?}", stderr(&output));

    let output = run(RUN, std::iter::empty::<&str>())?;
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}

#[test]
fn panic_is_reported_once() -> Result<(), anyhow::Error> {
    let output = run(ABORT, ["boom"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "abort: boom\n");
    assert_eq!(stdout(&output), "");
    Ok(())
}

#[test]
fn abort_without_message() -> Result<(), anyhow::Error> {
    let output = run(ABORT, std::iter::empty::<&str>())?;
    assert_eq!(output.status.signal(), Some(SIGABRT));

    let output = run(ABORT, ["a", "b"])?;
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr(&output), "Usage: abort [MESSAGE]\n");
    Ok(())
}
