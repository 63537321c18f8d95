// A Token is one whitespace-delimited piece of a line.  There is no quoting
// and no escaping: a token is whatever lies between runs of whitespace,
// after a trailing `$$` has been replaced by the shell's process id.
// Operators (`<`, `>`, `&`) are only recognized when they stand alone.

use nix::unistd::Pid;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Word,
    RedirectOut,
    RedirectIn,
    Background,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    text: String,
    kind: TokenKind,
}

impl Token {
    pub fn new(text: &str, pid: Pid) -> Token {
        let text = expand_pid(text, pid);
        let kind = get_kind(&text);

        Token { text, kind }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }
}

// Breaks rawline into expanded, classified tokens.
// An empty or all-whitespace line yields no tokens.
pub fn tokenize(rawline: &str, pid: Pid) -> Vec<Token> {
    get_words(rawline)
        .iter()
        .map(|word| Token::new(word, pid))
        .collect()
}

// Only a single trailing `$$` is replaced; `a$$b` is left alone.
pub fn expand_pid(text: &str, pid: Pid) -> String {
    match text.strip_suffix("$$") {
        Some(prefix) => format!("{}{}", prefix, pid),
        None => text.to_string(),
    }
}

fn get_kind(text: &str) -> TokenKind {
    match text {
        ">" => TokenKind::RedirectOut,
        "<" => TokenKind::RedirectIn,
        "&" => TokenKind::Background,
        _ => TokenKind::Word,
    }
}

fn get_words(rawline: &str) -> Vec<String> {
    let mut words = Vec::<String>::new();
    let mut word = String::new();

    for grapheme in rawline.graphemes(true) {
        match grapheme {
            " " | "\t" | "\n" | "\r" | "\r\n" => {
                if !word.is_empty() {
                    words.push(word);
                    word = String::new();
                }
            }
            _ => {
                word.push_str(grapheme);
            }
        }
    }

    if !word.is_empty() {
        words.push(word);
    }

    words
}
