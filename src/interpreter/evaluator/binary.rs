use std::cmp::Ordering;

use crate::{
    ast::{BinaryOperator, MutOp},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::Value,
    },
};

/// Evaluates a binary operation over two values.
///
/// Arithmetic keeps two integers integral (with overflow checked) and
/// promotes to a real as soon as either side is one; `/` always produces a
/// real. `+` additionally concatenates two texts or two lists. Comparisons
/// order numbers numerically and texts lexicographically; `==` and `!=` use
/// loose structural equality and never fail. The logical operators are not
/// handled here: they short-circuit in the expression walker.
///
/// # Example
/// ```
/// use plaintalk::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::eval_binary, value::Value},
/// };
///
/// let sum = eval_binary(BinaryOperator::Add, &Value::Integer(10), &Value::Integer(5), 1);
/// assert_eq!(sum.unwrap(), Value::Integer(15));
/// ```
pub fn eval_binary(op: BinaryOperator,
                   left: &Value,
                   right: &Value,
                   line: usize)
                   -> EvalResult<Value> {
    match op {
        BinaryOperator::Add => eval_add(left, right, line),
        BinaryOperator::Sub | BinaryOperator::Mul => eval_arithmetic(op, left, right, line),
        BinaryOperator::Div => eval_div(left, right, line),
        BinaryOperator::Mod => eval_mod(left, right, line),

        BinaryOperator::Less => Ok(Value::Bool(compare_order(left, right, line)?.is_lt())),
        BinaryOperator::Greater => Ok(Value::Bool(compare_order(left, right, line)?.is_gt())),
        BinaryOperator::LessEqual => Ok(Value::Bool(compare_order(left, right, line)?.is_le())),
        BinaryOperator::GreaterEqual => {
            Ok(Value::Bool(compare_order(left, right, line)?.is_ge()))
        },
        BinaryOperator::Equal => Ok(Value::Bool(left.loosely_equals(right))),
        BinaryOperator::NotEqual => Ok(Value::Bool(!left.loosely_equals(right))),

        BinaryOperator::And | BinaryOperator::Or => {
            unreachable!("logical operators short-circuit in the expression walker")
        },
    }
}

/// `+`: numeric addition, text concatenation, or list concatenation.
fn eval_add(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            a.checked_add(*b).map(Value::Integer).ok_or(RuntimeError::Overflow { line })
        },
        (Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{a}{b}"))),
        (Value::List(a), Value::List(b)) => {
            let mut joined = a.borrow().clone();
            joined.extend(b.borrow().iter().cloned());
            Ok(Value::from(joined))
        },
        _ if left.is_number() && right.is_number() => {
            Ok(Value::Real(left.as_real(line)? + right.as_real(line)?))
        },
        _ => Err(type_error("add", left, right, line)),
    }
}

/// `-` and `*` over numbers.
fn eval_arithmetic(op: BinaryOperator,
                   left: &Value,
                   right: &Value,
                   line: usize)
                   -> EvalResult<Value> {
    let verb = if op == BinaryOperator::Sub { "subtract" } else { "multiply" };

    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            let result = if op == BinaryOperator::Sub {
                a.checked_sub(*b)
            } else {
                a.checked_mul(*b)
            };
            result.map(Value::Integer).ok_or(RuntimeError::Overflow { line })
        },
        _ if left.is_number() && right.is_number() => {
            let (a, b) = (left.as_real(line)?, right.as_real(line)?);
            Ok(Value::Real(if op == BinaryOperator::Sub { a - b } else { a * b }))
        },
        _ => Err(type_error(verb, left, right, line)),
    }
}

/// `/`: always produces a real; a zero divisor fails.
fn eval_div(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
    if !(left.is_number() && right.is_number()) {
        return Err(type_error("divide", left, right, line));
    }

    let divisor = right.as_real(line)?;
    if divisor == 0.0 {
        return Err(RuntimeError::DivisionByZero { line });
    }
    Ok(Value::Real(left.as_real(line)? / divisor))
}

/// `%`: integral when both sides are integers, real otherwise.
fn eval_mod(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
    match (left, right) {
        (Value::Integer(_), Value::Integer(0)) => Err(RuntimeError::DivisionByZero { line }),
        (Value::Integer(a), Value::Integer(b)) => {
            a.checked_rem(*b).map(Value::Integer).ok_or(RuntimeError::Overflow { line })
        },
        _ if left.is_number() && right.is_number() => {
            let divisor = right.as_real(line)?;
            if divisor == 0.0 {
                return Err(RuntimeError::DivisionByZero { line });
            }
            Ok(Value::Real(left.as_real(line)? % divisor))
        },
        _ => Err(type_error("divide", left, right, line)),
    }
}

/// Orders two values for the relational operators.
///
/// Numbers order numerically across the integer/real split; texts order
/// lexicographically. Everything else (including a number against a text)
/// is a type error.
pub fn compare_order(left: &Value, right: &Value, line: usize) -> EvalResult<Ordering> {
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
        _ if left.is_number() && right.is_number() => {
            left.as_real(line)?
                .partial_cmp(&right.as_real(line)?)
                .ok_or(RuntimeError::TypeError { details: "I can't order these numbers".to_string(),
                                                 line })
        },
        _ => Err(RuntimeError::TypeError { details: format!("I can't compare {} with {}",
                                                            left.type_name(),
                                                            right.type_name()),
                                           line }),
    }
}

/// `contains`: membership in a list, or substring of a text.
pub fn value_contains(haystack: &Value, needle: &Value, line: usize) -> EvalResult<bool> {
    match haystack {
        Value::List(items) => {
            Ok(items.borrow().iter().any(|element| element.loosely_equals(needle)))
        },
        Value::Text(text) => Ok(text.contains(needle.as_text(line)?)),
        _ => Err(RuntimeError::TypeError { details: format!("I can only look inside a list or text, not {}",
                                                            haystack.type_name()),
                                           line }),
    }
}

/// Builds the uniform "can't <verb> X and Y" type error.
fn type_error(verb: &str, left: &Value, right: &Value, line: usize) -> RuntimeError {
    RuntimeError::TypeError { details: format!("I can't {verb} {} and {}. Use str(...) to join text and numbers",
                                               left.type_name(),
                                               right.type_name()),
                              line }
}

impl Context {
    /// Executes the in-place math family (`add`, `subtract`, `multiply`,
    /// `divide`).
    ///
    /// The target must already exist. `add` appends when the target holds a
    /// list; otherwise the target must be numeric, and the updated value is
    /// written back to the frame where the target lives.
    pub(crate) fn exec_math_mut(&mut self,
                                op: MutOp,
                                target: &str,
                                operand: &str,
                                line: usize)
                                -> EvalResult<()> {
        let operand = self.eval_expression(operand, line)?;

        let current = self.get_variable(target)
                          .cloned()
                          .ok_or_else(|| RuntimeError::UnknownVariable { name: target.to_string(),
                                                                         line })?;

        if op == MutOp::Add && let Value::List(items) = &current {
            items.borrow_mut().push(operand);
            return Ok(());
        }

        if !current.is_number() {
            return Err(RuntimeError::TypeError { details: format!("I can't do math on '{target}' because it is {}",
                                                                  current.type_name()),
                                                 line });
        }

        let operator = match op {
            MutOp::Add => crate::ast::BinaryOperator::Add,
            MutOp::Subtract => crate::ast::BinaryOperator::Sub,
            MutOp::Multiply => crate::ast::BinaryOperator::Mul,
            MutOp::Divide => crate::ast::BinaryOperator::Div,
        };
        let updated = eval_binary(operator, &current, &operand, line)?;
        self.assign_nearest(target, updated);

        Ok(())
    }

    /// Executes `remove E from X`.
    ///
    /// The first element loosely equal to the value is removed in place;
    /// a missing element is an error, matching the mutation-op rule that the
    /// target must actually change.
    pub(crate) fn exec_list_remove(&mut self,
                                   target: &str,
                                   value: &str,
                                   line: usize)
                                   -> EvalResult<()> {
        let current = self.get_variable(target)
                          .cloned()
                          .ok_or_else(|| RuntimeError::UnknownVariable { name: target.to_string(),
                                                                         line })?;

        let Value::List(items) = &current else {
            return Err(RuntimeError::TypeError { details: format!("'{target}' is not a list"),
                                                 line });
        };

        let needle = self.eval_expression(value, line)?;
        let mut items = items.borrow_mut();
        match items.iter().position(|element| element.loosely_equals(&needle)) {
            Some(position) => {
                items.remove(position);
                Ok(())
            },
            None => Err(RuntimeError::ItemNotFound { item: needle.to_string(),
                                                     list: target.to_string(),
                                                     line }),
        }
    }
}
