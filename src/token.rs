// Tokenization for the surface syntax of §6.1. Splits on whitespace,
// parenthesis boundaries, and transitions between alphabetic, digit, and
// punctuation character classes, except that a registered literal name
// always ends a token, even mid alphabetic-run, so `sN` tokenizes as `s`
// then `N` rather than as one identifier.

use std::fmt;

use crate::signature::Signature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Atom,
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte offset of this token's first character within the source line.
    pub start: usize,
    pub line: String,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub index: usize,
    pub line: String,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}:", self.message)?;
        writeln!(f, "{}", self.line)?;
        for (i, _) in self.line.char_indices() {
            write!(f, "{}", if i < self.index { ' ' } else { '^' })?;
            if i >= self.index {
                break;
            }
        }
        Ok(())
    }
}

impl std::error::Error for LexError {}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Alnum,
    Paren(char),
    Punct,
}

fn classify(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Space
    } else if c == '(' || c == ')' {
        CharClass::Paren(c)
    } else if c.is_alphanumeric() || c == '_' {
        CharClass::Alnum
    } else {
        CharClass::Punct
    }
}

/// Tokenizes one line of source. `sig` is consulted only to split a
/// contiguous alphanumeric run into registered-name-sized pieces.
pub fn tokenize(line: &str, sig: &Signature) -> Result<Vec<Token>, LexError> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];
        match classify(c) {
            CharClass::Space => {
                i += 1;
            }
            CharClass::Paren(p) => {
                tokens.push(Token {
                    kind: if p == '(' { TokenKind::LeftParen } else { TokenKind::RightParen },
                    text: p.to_string(),
                    start,
                    line: line.to_string(),
                });
                i += 1;
            }
            CharClass::Alnum => {
                let mut j = i;
                while j < chars.len() && classify(chars[j].1) == CharClass::Alnum {
                    j += 1;
                }
                let run_end_byte = if j < chars.len() { chars[j].0 } else { line.len() };
                let run = &line[start..run_end_byte];
                for (offset, piece) in split_registered_run(run, sig) {
                    tokens.push(Token {
                        kind: TokenKind::Atom,
                        text: piece.to_string(),
                        start: start + offset,
                        line: line.to_string(),
                    });
                }
                i = j;
            }
            CharClass::Punct => {
                let mut j = i;
                while j < chars.len() && classify(chars[j].1) == CharClass::Punct {
                    j += 1;
                }
                let run_end_byte = if j < chars.len() { chars[j].0 } else { line.len() };
                let run = &line[start..run_end_byte];
                tokens.push(Token { kind: TokenKind::Atom, text: run.to_string(), start, line: line.to_string() });
                i = j;
            }
        }
    }

    Ok(tokens)
}

/// Splits an alphanumeric run into pieces, preferring the longest prefix
/// that names a registered literal at each step, and otherwise consuming
/// the whole remaining run as a single identifier (variable or unknown
/// literal, resolved later by the parser).
fn split_registered_run<'a>(run: &'a str, sig: &Signature) -> Vec<(usize, &'a str)> {
    let mut pieces = Vec::new();
    let mut offset = 0;
    while offset < run.len() {
        let rest = &run[offset..];
        let mut matched = None;
        // Longest registered-name prefix match.
        for end in (1..=rest.len()).rev() {
            if !rest.is_char_boundary(end) {
                continue;
            }
            if sig.is_registered(&rest[..end]) {
                matched = Some(end);
                break;
            }
        }
        match matched {
            Some(end) if end < rest.len() => {
                pieces.push((offset, &rest[..end]));
                offset += end;
            }
            _ => {
                pieces.push((offset, rest));
                break;
            }
        }
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;

    #[test]
    fn test_tokenize_simple_application() {
        let sig = Signature::peano();
        let tokens = tokenize("+ 0 N", &sig).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["+", "0", "N"]);
    }

    #[test]
    fn test_tokenize_splits_registered_name_without_separator() {
        let sig = Signature::peano();
        let tokens = tokenize("sN", &sig).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["s", "N"]);
    }

    #[test]
    fn test_tokenize_parens() {
        let sig = Signature::peano();
        let tokens = tokenize("(0)", &sig).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::LeftParen);
        assert_eq!(tokens[2].kind, TokenKind::RightParen);
    }
}
