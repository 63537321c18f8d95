use anyhow::Result;
use tracing::{debug, warn};
use xdg::BaseDirectories;

use super::Shell;
use crate::signals;
use crate::sources::{script::Script, tty::Tty};

pub fn init() -> Result<Shell> {
    signals::install()?;

    let mut smsh = Shell::new();

    smsh.push_source(Tty::build_source());

    // Pushed last so that it runs before the first prompt.
    push_init_script(&mut smsh);

    Ok(smsh)
}

// Looks for $XDG_CONFIG_HOME/smallsh/init.  A missing or unreadable
// script never stops the shell from starting.
pub fn push_init_script(smsh: &mut Shell) {
    let base_dirs = match BaseDirectories::with_prefix("smallsh") {
        Ok(base_dirs) => base_dirs,
        Err(e) => {
            debug!("no XDG base directories: {}", e);
            return;
        }
    };

    if let Some(path) = base_dirs.find_config_file("init") {
        debug!(path = %path.display(), "running startup script");

        match Script::build_source(path.clone()) {
            Ok(script) => smsh.push_source(script),
            Err(e) => warn!(path = %path.display(), "unable to read startup script: {}", e),
        }
    }
}
