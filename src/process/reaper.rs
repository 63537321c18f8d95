// Background children are not kept in a table.  After each command the
// shell polls for any finished child, without blocking, until none are
// left to collect.

use std::io::{self, Write};

use anyhow::Result;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use tracing::debug;

pub fn sweep() -> Result<()> {
    loop {
        match waitpid(None, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(pid, code)) => {
                println!("child {} terminated, signal {}", pid, raw_exit_status(code));
                io::stdout().flush()?;
            }
            Ok(WaitStatus::StillAlive) => break,
            Ok(status) => {
                // Killed or stopped children are collected but not reported.
                debug!(?status, "reaped background child");
            }
            Err(Errno::ECHILD) => break, // No children at all
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

// The status word wait(2) hands back for a normal exit.
pub fn raw_exit_status(code: i32) -> i32 {
    (code & 0xff) << 8
}
