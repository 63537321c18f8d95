// Runs external programs.  Every invocation forks exactly one child;
// the parent either waits for it or reports its pid and moves on, and
// then sweeps up any background children that have finished.

use std::io::{self, Write};

use anyhow::Result;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};
use tracing::debug;

use crate::line::command::Command;
use crate::shell::state::Outcome;
use crate::shell::Shell;

mod child;
mod reaper;
pub use reaper::sweep;

// Why a command never got to run.  The codes are the child's exit
// status, except for Spawn, where there is no child and the shell
// records the code itself.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Failure {
    Spawn,
    Redirect,
    Exec,
}

impl Failure {
    pub fn code(self) -> i32 {
        match self {
            Failure::Redirect => 1,
            Failure::Exec => 2,
            Failure::Spawn => 3,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Foreground,
    Background,
}

impl Mode {
    // Foreground-only mode silently overrides `&`.
    pub fn select(background_requested: bool, foreground_only: bool) -> Mode {
        if background_requested && !foreground_only {
            Mode::Background
        } else {
            Mode::Foreground
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ChildHandle {
    pid: Pid,
    mode: Mode,
}

impl ChildHandle {
    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

pub fn execute(smsh: &mut Shell, command: &Command) -> Result<()> {
    let mode = Mode::select(command.is_background(), smsh.state().is_foreground_only());

    match spawn(command, mode) {
        Ok(handle) => match handle.mode() {
            Mode::Background => {
                println!("background pid is {}", handle.pid());
                io::stdout().flush()?;
            }
            Mode::Foreground => {
                let outcome = wait_foreground(handle.pid())?;
                debug!(pid = %handle.pid(), ?outcome, "foreground child finished");

                if let Outcome::Signaled(_) = outcome {
                    println!("{}", outcome);
                    io::stdout().flush()?;
                }

                smsh.state_mut().record(outcome);
            }
        },
        Err(e) => {
            eprintln!("smallsh: fork: {}", e);
            smsh.state_mut().record(Outcome::Exited(Failure::Spawn.code()));
        }
    }

    sweep()
}

// Returns only in the parent.  The child either becomes `command` or
// exits with one of the Failure codes.
pub fn spawn(command: &Command, mode: Mode) -> Result<ChildHandle> {
    // Converted before forking; the child reports a bad argument as an
    // exec failure.
    let args = command.exec_args();

    // Anything still buffered would otherwise be written twice.
    io::stdout().flush()?;

    match unsafe { fork()? } {
        ForkResult::Parent { child } => {
            debug!(pid = %child, ?mode, program = ?command.program(), "spawned child");
            Ok(ChildHandle { pid: child, mode })
        }
        ForkResult::Child => child::run(command, args),
    }
}

// Blocks until exactly `pid` has terminated.
pub fn wait_foreground(pid: Pid) -> Result<Outcome> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(Outcome::Exited(code)),
            Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(Outcome::Signaled(signal as i32)),
            Ok(_) => continue,
            Err(Errno::EINTR) => continue, // ^Z toggled the mode while we waited
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::line::token::tokenize;
    use nix::unistd::getpid;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn command(rawline: &str) -> Command {
        Command::parse(&tokenize(rawline, getpid()))
    }

    #[rstest]
    #[case(false, false, Mode::Foreground)]
    #[case(true, false, Mode::Background)]
    #[case(true, true, Mode::Foreground)]
    #[case(false, true, Mode::Foreground)]
    fn mode_selection(#[case] requested: bool, #[case] fg_only: bool, #[case] mode: Mode) {
        assert_eq!(Mode::select(requested, fg_only), mode);
    }

    #[test]
    fn failure_codes_are_distinct() {
        let codes = [Failure::Spawn.code(), Failure::Redirect.code(), Failure::Exec.code()];

        assert!(codes.iter().all(|c| *c != 0));
        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
        assert_ne!(codes[0], codes[2]);
    }

    #[test]
    fn foreground_exit_code() {
        let handle = spawn(&command("true"), Mode::Foreground).unwrap();
        assert_eq!(wait_foreground(handle.pid()).unwrap(), Outcome::Exited(0));

        let handle = spawn(&command("false"), Mode::Foreground).unwrap();
        assert_eq!(wait_foreground(handle.pid()).unwrap(), Outcome::Exited(1));
    }

    #[test]
    fn foreground_killed_by_signal() {
        let handle = spawn(&command("sleep 5"), Mode::Foreground).unwrap();
        nix::sys::signal::kill(handle.pid(), nix::sys::signal::Signal::SIGKILL).unwrap();

        assert_eq!(wait_foreground(handle.pid()).unwrap(), Outcome::Signaled(9));
    }

    #[test]
    fn missing_program_is_exec_failure() {
        let handle = spawn(&command("no-such-program-smallsh"), Mode::Foreground).unwrap();

        assert_eq!(
            wait_foreground(handle.pid()).unwrap(),
            Outcome::Exited(Failure::Exec.code())
        );
    }

    #[test]
    fn unreadable_input_is_redirect_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let line = format!("cat < {}", missing.display());

        let handle = spawn(&command(&line), Mode::Foreground).unwrap();

        assert_eq!(
            wait_foreground(handle.pid()).unwrap(),
            Outcome::Exited(Failure::Redirect.code())
        );
    }

    #[test]
    fn redirection_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("out.txt");
        let second = dir.path().join("copy.txt");

        let line = format!("echo round trip > {}", first.display());
        let handle = spawn(&command(&line), Mode::Foreground).unwrap();
        assert_eq!(wait_foreground(handle.pid()).unwrap(), Outcome::Exited(0));

        let line = format!("cat < {} > {}", first.display(), second.display());
        let handle = spawn(&command(&line), Mode::Foreground).unwrap();
        assert_eq!(wait_foreground(handle.pid()).unwrap(), Outcome::Exited(0));

        let original = std::fs::read(&first).unwrap();
        assert_eq!(original, b"round trip\n".to_vec());
        assert_eq!(std::fs::read(&second).unwrap(), original);
    }
}
