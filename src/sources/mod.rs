use anyhow::Result;

use super::line::Line;

pub mod script;
pub mod tty;

// Used in Line struct to identify source
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum SourceKind {
    Tty,
    Script(String), // String contains script pathname
}

pub trait Source {
    // Ok(None) means the source is exhausted.
    fn get_line(&mut self) -> Result<Option<Line>>;
    fn is_tty(&self) -> bool;
    fn print_error(&mut self) -> Result<()>;
}
