// Signal dispositions for the shell and its children.
//
// The shell ignores SIGINT so ^C only reaches the foreground child.
// SIGTSTP toggles foreground-only mode.  The mode lives in an atomic
// because the handler may run between any two instructions of the main
// loop; the handler touches nothing else and writes with write(2) only.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use nix::libc::{c_int, STDOUT_FILENO};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd;

pub const ENTER_MESSAGE: &str = "Entering foreground-only mode (& is now ignored)\n";
pub const EXIT_MESSAGE: &str = "Exiting foreground-only mode\n";

static FOREGROUND_ONLY: AtomicBool = AtomicBool::new(false);

pub fn foreground_only() -> bool {
    FOREGROUND_ONLY.load(Ordering::SeqCst)
}

// Flips the mode and returns the message announcing the new mode.
pub fn toggle_foreground_only() -> &'static str {
    if FOREGROUND_ONLY.fetch_xor(true, Ordering::SeqCst) {
        EXIT_MESSAGE
    } else {
        ENTER_MESSAGE
    }
}

extern "C" fn handle_sigtstp(_signo: c_int) {
    let message = toggle_foreground_only();

    // Nothing can be done about a failed write in here.
    let _ = unistd::write(STDOUT_FILENO, message.as_bytes());
}

// Installed once, at startup, in the shell process.
//
// SIGTSTP is installed without SA_RESTART: a blocking read at the prompt
// fails with EINTR so the prompt is redrawn right after the message.
pub fn install() -> Result<()> {
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::all());
    let toggle = SigAction::new(
        SigHandler::Handler(handle_sigtstp),
        SaFlags::empty(),
        SigSet::all(),
    );

    unsafe {
        sigaction(Signal::SIGINT, &ignore)?;
        sigaction(Signal::SIGTSTP, &toggle)?;
    }

    Ok(())
}

// Called in a freshly forked child, before exec.
pub fn reset_for_child() -> Result<()> {
    let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());

    unsafe {
        sigaction(Signal::SIGINT, &default)?;
        sigaction(Signal::SIGTSTP, &default)?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    #[test]
    #[serial(foreground_mode)]
    fn two_toggles_restore_mode() {
        let before = foreground_only();

        let first = toggle_foreground_only();
        assert_eq!(foreground_only(), !before);

        let second = toggle_foreground_only();
        assert_eq!(foreground_only(), before);

        if before {
            assert_eq!((first, second), (EXIT_MESSAGE, ENTER_MESSAGE));
        } else {
            assert_eq!((first, second), (ENTER_MESSAGE, EXIT_MESSAGE));
        }
    }

    #[test]
    #[serial(foreground_mode)]
    fn starts_off() {
        // Every test that toggles restores the mode before returning.
        assert!(!foreground_only());
    }
}
