use crate::shell::Shell;

use anyhow::Result;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::getpgrp;
use tracing::debug;

use std::env;
use std::io::{self, Write};

// A bad directory is ignored: the working directory and the recorded
// status are left as they were.
pub fn chdir(_smsh: &mut Shell, argv: Vec<&str>) -> Result<()> {
    let result = if argv.len() == 1 {
        match env::var_os("HOME") {
            Some(dir) => env::set_current_dir(dir),
            None => return Ok(()),
        }
    } else {
        env::set_current_dir(argv[1])
    };

    if let Err(e) = result {
        debug!(?argv, "cd failed: {}", e);
    }

    Ok(())
}

// Takes every process in our group down with us, background children
// included.  We are in that group too, so in practice SIGKILL ends the
// shell before exit() is reached.
pub fn exit(_smsh: &mut Shell, _argv: Vec<&str>) -> Result<()> {
    killpg(getpgrp(), Signal::SIGKILL)?;
    std::process::exit(0);
}

pub fn status(smsh: &mut Shell, _argv: Vec<&str>) -> Result<()> {
    let mut stdout = io::stdout();

    writeln!(stdout, "{}", smsh.state().last())?;
    stdout.flush()?;

    Ok(())
}
