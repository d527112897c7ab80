//! Tokenizer for the condition mini-language.

use crate::error::EvalError;

/// A lexical token with its byte position in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    LParen,
    RParen,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
}

/// Tokenizes the source, rejecting any character outside the mini-language.
pub fn tokenize(source: &str) -> Result<Vec<Token>, EvalError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                i += 1;
            }
            '(' => {
                tokens.push(Token { kind: TokenKind::LParen, pos: start });
                i += 1;
            }
            ')' => {
                tokens.push(Token { kind: TokenKind::RParen, pos: start });
                i += 1;
            }
            '.' => {
                tokens.push(Token { kind: TokenKind::Dot, pos: start });
                i += 1;
            }
            '+' => {
                tokens.push(Token { kind: TokenKind::Plus, pos: start });
                i += 1;
            }
            '-' => {
                tokens.push(Token { kind: TokenKind::Minus, pos: start });
                i += 1;
            }
            '*' => {
                tokens.push(Token { kind: TokenKind::Star, pos: start });
                i += 1;
            }
            '/' => {
                tokens.push(Token { kind: TokenKind::Slash, pos: start });
                i += 1;
            }
            '%' => {
                tokens.push(Token { kind: TokenKind::Percent, pos: start });
                i += 1;
            }
            '!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Token { kind: TokenKind::NotEq, pos: start });
                    i += 2;
                } else {
                    tokens.push(Token { kind: TokenKind::Bang, pos: start });
                    i += 1;
                }
            }
            '<' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Token { kind: TokenKind::Le, pos: start });
                    i += 2;
                } else {
                    tokens.push(Token { kind: TokenKind::Lt, pos: start });
                    i += 1;
                }
            }
            '>' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Token { kind: TokenKind::Ge, pos: start });
                    i += 2;
                } else {
                    tokens.push(Token { kind: TokenKind::Gt, pos: start });
                    i += 1;
                }
            }
            '=' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Token { kind: TokenKind::EqEq, pos: start });
                    i += 2;
                } else {
                    return Err(EvalError::Parse {
                        pos: start,
                        message: "expected '==' (assignment is not supported)".to_string(),
                    });
                }
            }
            '&' => {
                if bytes.get(i + 1) == Some(&b'&') {
                    tokens.push(Token { kind: TokenKind::AndAnd, pos: start });
                    i += 2;
                } else {
                    return Err(EvalError::Parse {
                        pos: start,
                        message: "expected '&&'".to_string(),
                    });
                }
            }
            '|' => {
                if bytes.get(i + 1) == Some(&b'|') {
                    tokens.push(Token { kind: TokenKind::OrOr, pos: start });
                    i += 2;
                } else {
                    return Err(EvalError::Parse {
                        pos: start,
                        message: "expected '||'".to_string(),
                    });
                }
            }
            '\'' | '"' => {
                let quote = c;
                i += 1;
                let mut text = String::new();
                // Literal bodies may contain any character, so walk chars
                // rather than bytes here.
                loop {
                    match source[i..].chars().next() {
                        Some(ch) if ch == quote => {
                            i += ch.len_utf8();
                            break;
                        }
                        Some('\\') => {
                            // Only quote and backslash escapes are recognized.
                            match source[i + 1..].chars().next() {
                                Some(e) if e == quote || e == '\\' => {
                                    text.push(e);
                                    i += 1 + e.len_utf8();
                                }
                                _ => {
                                    return Err(EvalError::Parse {
                                        pos: i,
                                        message: "unsupported escape sequence".to_string(),
                                    });
                                }
                            }
                        }
                        Some(ch) => {
                            text.push(ch);
                            i += ch.len_utf8();
                        }
                        None => {
                            return Err(EvalError::Parse {
                                pos: start,
                                message: "unterminated string literal".to_string(),
                            });
                        }
                    }
                }
                tokens.push(Token { kind: TokenKind::Str(text), pos: start });
            }
            '0'..='9' => {
                let mut end = i;
                let mut seen_dot = false;
                while end < bytes.len() {
                    let b = bytes[end] as char;
                    if b.is_ascii_digit() {
                        end += 1;
                    } else if b == '.'
                        && !seen_dot
                        && bytes.get(end + 1).is_some_and(|n| n.is_ascii_digit())
                    {
                        seen_dot = true;
                        end += 1;
                    } else {
                        break;
                    }
                }
                let text = &source[i..end];
                let number = text.parse::<f64>().map_err(|_| EvalError::Parse {
                    pos: start,
                    message: format!("invalid number literal '{text}'"),
                })?;
                tokens.push(Token { kind: TokenKind::Number(number), pos: start });
                i = end;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = i;
                while end < bytes.len() {
                    let b = bytes[end] as char;
                    if b.is_ascii_alphanumeric() || b == '_' {
                        end += 1;
                    } else {
                        break;
                    }
                }
                let ident = &source[i..end];
                let kind = match ident {
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    "null" => TokenKind::Null,
                    _ => TokenKind::Ident(ident.to_string()),
                };
                tokens.push(Token { kind, pos: start });
                i = end;
            }
            other => {
                return Err(EvalError::Parse {
                    pos: start,
                    message: format!("unexpected character '{other}'"),
                });
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_comparison() {
        let tokens = tokenize("performance.duration_ms > 1000").unwrap();
        let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
        assert!(matches!(kinds[0], TokenKind::Ident(s) if s == "performance"));
        assert!(matches!(kinds[1], TokenKind::Dot));
        assert!(matches!(kinds[3], TokenKind::Gt));
        assert!(matches!(kinds[4], TokenKind::Number(n) if *n == 1000.0));
    }

    #[test]
    fn string_literals_with_both_quotes() {
        let tokens = tokenize(r#"step.name == 'validate' || step.name == "run""#).unwrap();
        assert!(tokens
            .iter()
            .any(|t| matches!(&t.kind, TokenKind::Str(s) if s == "validate")));
        assert!(tokens
            .iter()
            .any(|t| matches!(&t.kind, TokenKind::Str(s) if s == "run")));
    }

    #[test]
    fn multibyte_string_literal_survives_intact() {
        let tokens = tokenize("name == 'café'").unwrap();
        assert!(tokens
            .iter()
            .any(|t| matches!(&t.kind, TokenKind::Str(s) if s == "café")));

        let tokens = tokenize("emoji == \"🦀 crab\"").unwrap();
        assert!(tokens
            .iter()
            .any(|t| matches!(&t.kind, TokenKind::Str(s) if s == "🦀 crab")));
    }

    #[test]
    fn rejects_single_equals() {
        let err = tokenize("a = 1").unwrap_err();
        assert!(matches!(err, EvalError::Parse { .. }));
    }

    #[test]
    fn rejects_foreign_characters() {
        assert!(tokenize("a # b").is_err());
        assert!(tokenize("a ; b").is_err());
    }
}
