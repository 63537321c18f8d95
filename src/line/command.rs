use std::ffi::CString;

use anyhow::Result;

use super::token::{Token, TokenKind};

// Everything needed to run one line: the argument vector (program
// first), optional redirection targets, and whether `&` was given.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Command {
    args: Vec<String>,
    input: Option<String>,
    output: Option<String>,
    background: bool,
}

impl Command {
    // Redirection operators take the next token verbatim, whatever it
    // is.  A trailing `<` or `>` with nothing after it clears that
    // redirection.  `&` counts wherever it appears.
    pub fn parse(tokens: &[Token]) -> Command {
        let mut command = Command::default();
        let mut tokens = tokens.iter();

        while let Some(token) = tokens.next() {
            match token.kind() {
                TokenKind::RedirectOut => {
                    command.output = tokens.next().map(|t| t.text().to_string());
                }
                TokenKind::RedirectIn => {
                    command.input = tokens.next().map(|t| t.text().to_string());
                }
                TokenKind::Background => {
                    command.background = true;
                }
                TokenKind::Word => {
                    command.args.push(token.text().to_string());
                }
            }
        }

        command
    }

    pub fn program(&self) -> Option<&str> {
        self.args.first().map(|s| s.as_str())
    }

    pub fn argv(&self) -> Vec<&str> {
        self.args.iter().map(|s| s.as_str()).collect()
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn is_background(&self) -> bool {
        self.background
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    // execvp() wants C strings; nix adds the terminating null pointer.
    pub fn exec_args(&self) -> Result<Vec<CString>> {
        let mut cstrings = Vec::<CString>::with_capacity(self.args.len());

        for arg in &self.args {
            cstrings.push(CString::new(arg.as_str())?);
        }

        Ok(cstrings)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::line::token::tokenize;
    use nix::unistd::Pid;
    use pretty_assertions::assert_eq;

    fn parse(rawline: &str) -> Command {
        Command::parse(&tokenize(rawline, Pid::from_raw(100)))
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_arguments() {
        let command = parse("ls -l /tmp");

        assert_eq!(
            command,
            Command {
                args: strings(&["ls", "-l", "/tmp"]),
                input: None,
                output: None,
                background: false,
            }
        );
    }

    #[test]
    fn full_redirection_and_background() {
        let command = parse("sort < in.txt > out$$ &");

        assert_eq!(
            command,
            Command {
                args: strings(&["sort"]),
                input: Some("in.txt".to_string()),
                output: Some("out100".to_string()),
                background: true,
            }
        );
    }

    #[test]
    fn background_anywhere_counts() {
        let command = parse("sleep & 5");

        assert_eq!(command.argv(), vec!["sleep", "5"]);
        assert!(command.is_background());
    }

    #[test]
    fn trailing_redirect_without_target() {
        let command = parse("ls >");

        assert_eq!(command.argv(), vec!["ls"]);
        assert_eq!(command.output(), None);
    }

    #[test]
    fn dangling_redirect_clears_earlier_target() {
        let command = parse("ls > a.txt >");

        assert_eq!(command.output(), None);
    }

    #[test]
    fn redirect_target_taken_verbatim() {
        let command = parse("cat < &");

        assert_eq!(command.input(), Some("&"));
        assert!(!command.is_background());
    }

    #[test]
    fn operators_only_is_empty() {
        let command = parse("> out.txt &");

        assert!(command.is_empty());
        assert_eq!(command.program(), None);
        assert_eq!(command.output(), Some("out.txt"));
    }

    #[test]
    fn exec_args_match_argv() {
        let command = parse("echo one two");
        let cstrings = command.exec_args().unwrap();

        assert_eq!(cstrings.len(), 3);
        assert_eq!(cstrings[0].to_str().unwrap(), "echo");
        assert_eq!(cstrings[2].to_str().unwrap(), "two");
    }
}
