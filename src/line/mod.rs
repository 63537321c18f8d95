use std::fmt;

use anyhow::Result;
use nix::unistd::getpid;

use crate::shell::Shell;
use crate::sources::SourceKind;

pub mod command;
use command::Command;
pub mod token;
use token::{tokenize, Token};

// Represents one line given to the shell, already split into tokens.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    rawline: String, // Original string passed to Line.
                     // Does not include trailing newlines
    source: SourceKind,
    line_num: usize,
    tokens: Vec<Token>,
}

impl Line {
    pub fn new(mut rawline: String, line_num: usize, source: SourceKind) -> Line {
        while rawline.ends_with('\n') || rawline.ends_with('\r') {
            rawline.pop();
        }

        let tokens = tokenize(&rawline, getpid());

        Line {
            rawline,
            source,
            line_num,
            tokens,
        }
    }

    pub fn execute(&self, smsh: &mut Shell) -> Result<()> {
        if self.tokens.is_empty() {
            return Ok(());
        }

        let command = Command::parse(&self.tokens);

        smsh.dispatch(&command)
    }

    pub fn rawline(&self) -> &str {
        &self.rawline
    }

    pub fn source(&self) -> &SourceKind {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            SourceKind::Tty => {
                write!(f, "\tTTY line {}: {}", self.line_num, self.rawline)
            }
            SourceKind::Script(s) => {
                write!(f, "\tScript `{}` line {}: {}", s, self.line_num, self.rawline)
            }
        }
    }
}
