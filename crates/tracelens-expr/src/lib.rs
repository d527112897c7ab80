//! Restricted expression mini-language for breakpoint conditions and watch
//! expressions.
//!
//! Expressions are short boolean/value computations over a context record
//! assembled from trace, step, performance, and token data plus user-defined
//! variables. The implementation is an explicitly-typed AST with a
//! tree-walking interpreter: there is no dynamic code compilation and no
//! namespace beyond the supplied [`EvalContext`], so evaluation cannot reach
//! process, global, or filesystem state.
//!
//! Every evaluation runs under an [`EvalLimits`] node budget and wall-clock
//! deadline; a pathological expression traps with [`EvalError::Budget`] or
//! [`EvalError::Timeout`] instead of stalling the engine.

pub mod ast;
pub mod context;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::Expr;
pub use context::EvalContext;
pub use error::EvalError;
pub use eval::{eval, EvalLimits};
pub use parser::parse;
pub use value::Value;

/// Parses and evaluates a source expression in one call.
pub fn eval_str(
    source: &str,
    ctx: &EvalContext,
    limits: &EvalLimits,
) -> Result<Value, EvalError> {
    let expr = parse(source)?;
    eval(&expr, ctx, limits)
}

/// Evaluates a condition, reducing the result to its truthiness.
pub fn eval_condition(
    source: &str,
    ctx: &EvalContext,
    limits: &EvalLimits,
) -> Result<bool, EvalError> {
    eval_str(source, ctx, limits).map(|v| v.truthy())
}
