//! Precedence-climbing parser for the condition mini-language.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::EvalError;
use crate::lexer::{tokenize, Token, TokenKind};
use crate::value::Value;

/// Maximum nesting depth accepted by the parser.
pub const MAX_DEPTH: usize = 64;

/// Parses a source string into an expression tree.
pub fn parse(source: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        source_len: source.len(),
    };
    let expr = parser.expression(0, 0)?;
    if let Some(token) = parser.peek() {
        return Err(EvalError::Parse {
            pos: token.pos,
            message: "unexpected trailing input".to_string(),
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    source_len: usize,
}

/// Binding power per operator; higher binds tighter.
fn binding_power(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    match kind {
        TokenKind::OrOr => Some((BinaryOp::Or, 1)),
        TokenKind::AndAnd => Some((BinaryOp::And, 2)),
        TokenKind::EqEq => Some((BinaryOp::Eq, 3)),
        TokenKind::NotEq => Some((BinaryOp::Ne, 3)),
        TokenKind::Lt => Some((BinaryOp::Lt, 4)),
        TokenKind::Le => Some((BinaryOp::Le, 4)),
        TokenKind::Gt => Some((BinaryOp::Gt, 4)),
        TokenKind::Ge => Some((BinaryOp::Ge, 4)),
        TokenKind::Plus => Some((BinaryOp::Add, 5)),
        TokenKind::Minus => Some((BinaryOp::Sub, 5)),
        TokenKind::Star => Some((BinaryOp::Mul, 6)),
        TokenKind::Slash => Some((BinaryOp::Div, 6)),
        TokenKind::Percent => Some((BinaryOp::Rem, 6)),
        _ => None,
    }
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expression(&mut self, min_bp: u8, depth: usize) -> Result<Expr, EvalError> {
        if depth > MAX_DEPTH {
            return Err(EvalError::DepthLimit { limit: MAX_DEPTH });
        }

        let mut lhs = self.prefix(depth)?;

        while let Some(token) = self.peek() {
            let Some((op, bp)) = binding_power(&token.kind) else {
                break;
            };
            if bp < min_bp {
                break;
            }
            self.advance();
            // Left-associative: the right side must bind strictly tighter.
            let rhs = self.expression(bp + 1, depth + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn prefix(&mut self, depth: usize) -> Result<Expr, EvalError> {
        if depth > MAX_DEPTH {
            return Err(EvalError::DepthLimit { limit: MAX_DEPTH });
        }

        let Some(token) = self.advance() else {
            return Err(EvalError::Parse {
                pos: self.source_len,
                message: "unexpected end of expression".to_string(),
            });
        };

        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Literal(Value::Number(n))),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::Str(s))),
            TokenKind::True => Ok(Expr::Literal(Value::Bool(true))),
            TokenKind::False => Ok(Expr::Literal(Value::Bool(false))),
            TokenKind::Null => Ok(Expr::Literal(Value::Null)),
            TokenKind::Bang => {
                let operand = self.prefix(depth + 1)?;
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                })
            }
            TokenKind::Minus => {
                let operand = self.prefix(depth + 1)?;
                Ok(Expr::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                })
            }
            TokenKind::LParen => {
                let inner = self.expression(0, depth + 1)?;
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(EvalError::Parse {
                        pos: other.pos,
                        message: "expected ')'".to_string(),
                    }),
                    None => Err(EvalError::Parse {
                        pos: self.source_len,
                        message: "unclosed '('".to_string(),
                    }),
                }
            }
            TokenKind::Ident(first) => {
                let mut path = vec![first];
                while matches!(
                    self.peek(),
                    Some(Token {
                        kind: TokenKind::Dot,
                        ..
                    })
                ) {
                    self.advance();
                    match self.advance() {
                        Some(Token {
                            kind: TokenKind::Ident(field),
                            ..
                        }) => path.push(field),
                        Some(other) => {
                            return Err(EvalError::Parse {
                                pos: other.pos,
                                message: "expected field name after '.'".to_string(),
                            });
                        }
                        None => {
                            return Err(EvalError::Parse {
                                pos: self.source_len,
                                message: "expected field name after '.'".to_string(),
                            });
                        }
                    }
                }
                Ok(Expr::Path(path))
            }
            other => Err(EvalError::Parse {
                pos: token.pos,
                message: format!("unexpected token {other:?}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = parse("1 + 2 * 3").unwrap();
        match expr {
            Expr::Binary {
                op: BinaryOp::Add,
                rhs,
                ..
            } => assert!(matches!(
                *rhs,
                Expr::Binary {
                    op: BinaryOp::Mul,
                    ..
                }
            )),
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn logic_binds_looser_than_comparison() {
        let expr = parse("a > 1 && b < 2").unwrap();
        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn parses_dot_paths() {
        let expr = parse("performance.duration_ms").unwrap();
        assert_eq!(
            expr,
            Expr::Path(vec!["performance".to_string(), "duration_ms".to_string()])
        );
    }

    #[test]
    fn rejects_trailing_input() {
        assert!(matches!(parse("1 2"), Err(EvalError::Parse { .. })));
    }

    #[test]
    fn rejects_call_syntax() {
        // `(` after an identifier is a trailing-parse error: the language
        // has no function calls.
        assert!(parse("exec('rm -rf /')").is_err());
    }

    #[test]
    fn depth_limit_trips_on_pathological_nesting() {
        let source = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert!(matches!(
            parse(&source),
            Err(EvalError::DepthLimit { .. })
        ));
    }
}
