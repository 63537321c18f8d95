// Reads lines from STDIN with raw read(2) calls rather than through
// std's buffered Stdin.  A buffered reader retries reads interrupted by a
// signal; we want the interruption, so that toggling foreground-only mode
// puts the user straight back at a fresh prompt.

use std::io::{self, Write};

use anyhow::Result;
use nix::errno::Errno;
use nix::libc::STDIN_FILENO;
use nix::unistd;

use super::{Source, SourceKind};
use crate::line::Line;

const PROMPT: &str = ":";
const CHUNK: usize = 2048;

enum Read {
    Line(String),
    Interrupted,
    Eof,
}

pub struct Tty {
    pending: Vec<u8>, // Bytes read past the last newline
    line_num: usize,
    last_line: Option<Line>,
}

impl Tty {
    pub fn build_source() -> Box<dyn Source> {
        Box::new(Tty {
            pending: Vec::new(),
            line_num: 0,
            last_line: None,
        })
    }

    fn read_line(&mut self) -> Result<Read> {
        let mut chunk = [0_u8; CHUNK];

        loop {
            if let Some(idx) = self.pending.iter().position(|b| *b == b'\n') {
                let rest = self.pending.split_off(idx + 1);
                let line = std::mem::replace(&mut self.pending, rest);
                return Ok(Read::Line(String::from_utf8_lossy(&line).into_owned()));
            }

            match unistd::read(STDIN_FILENO, &mut chunk) {
                Ok(0) if self.pending.is_empty() => return Ok(Read::Eof),
                Ok(0) => {
                    // Final line had no newline
                    let line = std::mem::take(&mut self.pending);
                    return Ok(Read::Line(String::from_utf8_lossy(&line).into_owned()));
                }
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(Errno::EINTR) => return Ok(Read::Interrupted),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Source for Tty {
    fn get_line(&mut self) -> Result<Option<Line>> {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        match self.read_line()? {
            Read::Line(text) => {
                self.line_num += 1;

                let line = Line::new(text, self.line_num, SourceKind::Tty);
                self.last_line = Some(line.clone());

                Ok(Some(line))
            }
            Read::Interrupted => Ok(Some(Line::new(String::new(), self.line_num, SourceKind::Tty))),
            Read::Eof => Ok(None),
        }
    }

    fn is_tty(&self) -> bool {
        true
    }

    fn print_error(&mut self) -> Result<()> {
        if let Some(line) = &self.last_line {
            eprintln!("{}", line);
        }

        Ok(())
    }
}
