// The child's half of a fork.  Nothing here returns: the process is
// either replaced by the program or exits with a Failure code.

use std::ffi::CString;
use std::fmt::Display;
use std::os::unix::io::RawFd;

use anyhow::Result;
use nix::fcntl::{fcntl, open, FcntlArg, FdFlag, OFlag};
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::sys::stat::Mode;
use nix::unistd::{dup2, execvp};

use super::Failure;
use crate::line::command::Command;
use crate::signals;

pub fn run(command: &Command, args: Result<Vec<CString>>) -> ! {
    // ^C should kill a foreground child even though the shell ignores it.
    if let Err(e) = signals::reset_for_child() {
        eprintln!("smallsh: sigaction: {}", e);
    }

    if let Some(path) = command.output() {
        let flags = OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC;
        if let Err(e) = redirect(path, flags, STDOUT_FILENO) {
            fail(Failure::Redirect, path, e);
        }
    }

    if let Some(path) = command.input() {
        if let Err(e) = redirect(path, OFlag::O_RDONLY, STDIN_FILENO) {
            fail(Failure::Redirect, path, e);
        }
    }

    let program = command.program().unwrap_or_default();

    let args = match args {
        Ok(args) if !args.is_empty() => args,
        Ok(_) => fail(Failure::Exec, program, "empty command"),
        Err(e) => fail(Failure::Exec, program, e),
    };

    match execvp(&args[0], &args) {
        Ok(never) => match never {},
        Err(e) => fail(Failure::Exec, program, e),
    }
}

fn redirect(path: &str, flags: OFlag, target: RawFd) -> nix::Result<()> {
    let fd = open(path, flags, Mode::from_bits_truncate(0o666))?;

    dup2(fd, target)?;
    fcntl(fd, FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC))?;

    Ok(())
}

fn fail(failure: Failure, what: &str, err: impl Display) -> ! {
    eprintln!("smallsh: {}: {}", what, err);
    std::process::exit(failure.code())
}

