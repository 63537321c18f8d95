use crate::line::command::Command;
use crate::line::Line;
use crate::process;
use crate::sources::Source;
use anyhow::Result;

use std::collections::HashMap;

mod modules;
use modules::*;
mod init;
pub mod state;
use state::State;

pub struct Shell {
    sources: Vec<Box<dyn Source>>,
    builtins: HashMap<&'static str, Builtin>,
    state: State,
}

impl Shell {
    // A shell with its builtins loaded but nothing to read from.
    pub fn new() -> Shell {
        let mut smsh = Shell {
            sources: Vec::new(),
            builtins: HashMap::new(),
            state: State::new(),
        };

        load_module(&mut smsh, Module::Core);

        smsh
    }

    // The interactive shell: signal handlers, the tty, and the startup
    // script.
    pub fn init() -> Result<Shell> {
        init::init()
    }

    pub fn run(&mut self) -> Result<()> {
        while let Some(line) = self.get_line()? {
            line.execute(self)?;
        }

        Ok(())
    }

    fn get_line(&mut self) -> Result<Option<Line>> {
        if let Some(mut source) = self.sources.pop() {
            if let Some(line) = source.get_line()? {
                self.sources.push(source);
                Ok(Some(line))
            } else {
                self.get_line()
            }
        } else {
            Ok(None)
        }
    }

    // Builtins and comments run here; anything else is forked off.
    pub fn dispatch(&mut self, command: &Command) -> Result<()> {
        let program = match command.program() {
            Some(program) => program,
            None => return Ok(()),
        };

        if program.starts_with('#') {
            return Ok(());
        }

        if let Some(f) = self.get_builtin(program).copied() {
            f(self, command.argv())
        } else {
            process::execute(self, command)
        }
    }

    pub fn get_builtin(&self, command: &str) -> Option<&Builtin> {
        self.builtins.get(command)
    }

    pub fn push_source(&mut self, source: Box<dyn Source>) {
        self.sources.push(source)
    }

    // Reports where the failing line came from and abandons every
    // source stacked above the tty.
    pub fn backtrace(&mut self) {
        while let Some(mut source) = self.sources.pop() {
            let _ = source.print_error();

            if source.is_tty() {
                self.sources.push(source);
                break;
            }
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}
