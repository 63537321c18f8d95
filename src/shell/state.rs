use std::fmt;

use crate::signals;

// How the last foreground command ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Exited(i32),
    Signaled(i32),
}

impl Outcome {
    // What the shell itself exits with when input runs out.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Exited(code) => *code,
            Outcome::Signaled(signo) => 128 + signo,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Exited(code) => write!(f, "exit status {}", code),
            Outcome::Signaled(signo) => write!(f, "terminated by signal {}", signo),
        }
    }
}

pub struct State {
    // Only foreground external commands set this.
    // Builtins and background commands leave it alone.
    last: Outcome,
}

impl State {
    pub fn new() -> Self {
        State {
            last: Outcome::Exited(0),
        }
    }

    pub fn last(&self) -> Outcome {
        self.last
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.last = outcome;
    }

    // Set asynchronously by the SIGTSTP handler.
    pub fn is_foreground_only(&self) -> bool {
        signals::foreground_only()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Outcome::Exited(0), "exit status 0")]
    #[case(Outcome::Exited(2), "exit status 2")]
    #[case(Outcome::Signaled(9), "terminated by signal 9")]
    fn status_lines(#[case] outcome: Outcome, #[case] expected: &str) {
        assert_eq!(outcome.to_string(), expected);
    }

    #[test]
    fn record_replaces_last() {
        let mut state = State::new();
        assert_eq!(state.last(), Outcome::Exited(0));

        state.record(Outcome::Signaled(15));
        assert_eq!(state.last(), Outcome::Signaled(15));
        assert_eq!(state.last().exit_code(), 143);
    }
}
