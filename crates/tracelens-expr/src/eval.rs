//! Tree-walking evaluator with a node budget and wall-clock deadline.
//!
//! Both limits are checked on every node visit so a pathological expression
//! can neither spin on arithmetic nor stall the caller: exceeding either
//! yields a trap error, which the engine treats as "condition not met".

use std::time::{Duration, Instant};

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::context::EvalContext;
use crate::error::EvalError;
use crate::value::Value;

/// Execution limits for a single evaluation call.
#[derive(Debug, Clone, Copy)]
pub struct EvalLimits {
    /// Maximum AST nodes visited.
    pub max_nodes: u64,
    /// Wall-clock deadline for the whole evaluation.
    pub timeout: Duration,
}

impl Default for EvalLimits {
    fn default() -> Self {
        EvalLimits {
            max_nodes: 10_000,
            timeout: Duration::from_millis(50),
        }
    }
}

/// Evaluates an expression against a context under the given limits.
pub fn eval(expr: &Expr, ctx: &EvalContext, limits: &EvalLimits) -> Result<Value, EvalError> {
    let mut state = EvalState {
        deadline: Instant::now() + limits.timeout,
        nodes_left: limits.max_nodes,
        node_limit: limits.max_nodes,
    };
    state.eval(expr, ctx)
}

struct EvalState {
    deadline: Instant,
    nodes_left: u64,
    node_limit: u64,
}

impl EvalState {
    fn charge(&mut self) -> Result<(), EvalError> {
        if Instant::now() >= self.deadline {
            return Err(EvalError::Timeout);
        }
        if self.nodes_left == 0 {
            return Err(EvalError::Budget {
                limit: self.node_limit,
            });
        }
        self.nodes_left -= 1;
        Ok(())
    }

    fn eval(&mut self, expr: &Expr, ctx: &EvalContext) -> Result<Value, EvalError> {
        self.charge()?;
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Path(path) => ctx.resolve(path),
            Expr::Unary { op, operand } => {
                let value = self.eval(operand, ctx)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!value.truthy())),
                    UnaryOp::Neg => match value {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        other => Err(EvalError::TypeMismatch {
                            op: "-".to_string(),
                            lhs: other.type_name().to_string(),
                            rhs: "".to_string(),
                        }),
                    },
                }
            }
            Expr::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs, ctx),
        }
    }

    fn binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        ctx: &EvalContext,
    ) -> Result<Value, EvalError> {
        // Logic short-circuits before the right side is touched.
        if matches!(op, BinaryOp::And | BinaryOp::Or) {
            let left = self.eval(lhs, ctx)?;
            return match (op, left.truthy()) {
                (BinaryOp::And, false) => Ok(Value::Bool(false)),
                (BinaryOp::Or, true) => Ok(Value::Bool(true)),
                _ => {
                    let right = self.eval(rhs, ctx)?;
                    Ok(Value::Bool(right.truthy()))
                }
            };
        }

        let left = self.eval(lhs, ctx)?;
        let right = self.eval(rhs, ctx)?;

        let mismatch = |l: &Value, r: &Value| EvalError::TypeMismatch {
            op: op.symbol().to_string(),
            lhs: l.type_name().to_string(),
            rhs: r.type_name().to_string(),
        };

        match op {
            BinaryOp::Add => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
                _ => Err(mismatch(&left, &right)),
            },
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                match (&left, &right) {
                    (Value::Number(a), Value::Number(b)) => match op {
                        BinaryOp::Sub => Ok(Value::Number(a - b)),
                        BinaryOp::Mul => Ok(Value::Number(a * b)),
                        BinaryOp::Div => {
                            if *b == 0.0 {
                                Err(EvalError::DivideByZero)
                            } else {
                                Ok(Value::Number(a / b))
                            }
                        }
                        BinaryOp::Rem => {
                            if *b == 0.0 {
                                Err(EvalError::DivideByZero)
                            } else {
                                Ok(Value::Number(a % b))
                            }
                        }
                        _ => unreachable!(),
                    },
                    _ => Err(mismatch(&left, &right)),
                }
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let ordering = match (&left, &right) {
                    (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                    (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                    _ => return Err(mismatch(&left, &right)),
                };
                let Some(ordering) = ordering else {
                    // NaN comparison: never true.
                    return Ok(Value::Bool(false));
                };
                let result = match op {
                    BinaryOp::Lt => ordering.is_lt(),
                    BinaryOp::Le => ordering.is_le(),
                    BinaryOp::Gt => ordering.is_gt(),
                    BinaryOp::Ge => ordering.is_ge(),
                    _ => unreachable!(),
                };
                Ok(Value::Bool(result))
            }
            BinaryOp::Eq => Ok(Value::Bool(loose_eq(&left, &right))),
            BinaryOp::Ne => Ok(Value::Bool(!loose_eq(&left, &right))),
            BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
        }
    }
}

/// Equality across values: same-variant comparison; mixed types are unequal
/// rather than an error, so `status == 'failed'` style checks stay cheap to
/// write.
fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Json(a), Value::Json(b)) => a == b,
        _ => false,
    }
}
