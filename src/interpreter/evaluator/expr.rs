use crate::{
    ast::{BinaryOperator, Expr, LiteralValue, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::eval_binary,
            core::{Context, EvalResult},
        },
        expression::parser::parse_expression_text,
        parser::utils::{is_identifier, scan_words, split_arguments},
        value::Value,
    },
    util::num::{resolve_index, resolve_slice_bound},
};

impl Context {
    /// Evaluates one raw expression string from a statement.
    ///
    /// Three surface forms are peeled off before the expression grammar
    /// runs, in order: the plain-English `random` phrasings, and the
    /// `call F [with args]` expression form (whose arguments are themselves
    /// raw expressions, split on top-level commas). Everything else is lexed
    /// and parsed into a tree and walked.
    ///
    /// # Errors
    /// Unreadable text maps to `RuntimeError::BadExpression` at the
    /// enclosing statement's line; evaluation failures keep their own kinds.
    pub fn eval_expression(&mut self, text: &str, line: usize) -> EvalResult<Value> {
        let trimmed = text.trim();

        if let Some(rewritten) = rewrite_random_phrase(trimmed) {
            return self.eval_expression(&rewritten, line);
        }

        if let Some((name, raw_arguments)) = parse_call_phrase(trimmed) {
            let mut args = Vec::new();
            for raw in split_arguments(raw_arguments) {
                args.push(self.eval_expression(&raw, line)?);
            }
            return self.call_callable(name, args, line);
        }

        let expr = parse_expression_text(trimmed).map_err(|_| RuntimeError::BadExpression {
            text: trimmed.to_string(),
            line,
        })?;

        self.eval_expr(&expr, line)
    }

    /// Walks an expression tree to a value.
    pub(crate) fn eval_expr(&mut self, expr: &Expr, line: usize) -> EvalResult<Value> {
        match expr {
            Expr::Literal(literal) => Ok(literal_value(literal)),

            Expr::Variable(name) => {
                self.get_variable(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UnknownVariable { name: name.clone(),
                                                                   line })
            },

            Expr::Unary { op: UnaryOperator::Not, expr } => {
                let value = self.eval_expr(expr, line)?;
                Ok(Value::Bool(!value.is_truthy()))
            },

            Expr::Unary { op: UnaryOperator::Negate, expr } => {
                match self.eval_expr(expr, line)? {
                    Value::Integer(n) => {
                        n.checked_neg().map(Value::Integer).ok_or(RuntimeError::Overflow { line })
                    },
                    Value::Real(r) => Ok(Value::Real(-r)),
                    other => Err(RuntimeError::TypeError { details: format!("I can't negate {}",
                                                                            other.type_name()),
                                                           line }),
                }
            },

            // `and` / `or` short-circuit: the right side only runs when the
            // left side has not already decided the answer.
            Expr::Binary { left, op: BinaryOperator::And, right } => {
                if !self.eval_expr(left, line)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval_expr(right, line)?.is_truthy()))
            },
            Expr::Binary { left, op: BinaryOperator::Or, right } => {
                if self.eval_expr(left, line)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval_expr(right, line)?.is_truthy()))
            },

            Expr::Binary { left, op, right } => {
                let left = self.eval_expr(left, line)?;
                let right = self.eval_expr(right, line)?;
                eval_binary(*op, &left, &right, line)
            },

            Expr::Call { name, arguments } => {
                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.eval_expr(argument, line)?);
                }
                self.call_callable(name, args, line)
            },

            Expr::ListLiteral(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_expr(element, line)?);
                }
                Ok(Value::from(values))
            },

            Expr::Index { target, index } => {
                let target = self.eval_expr(target, line)?;
                let index = self.eval_expr(index, line)?.as_integer(line)?;
                eval_index(&target, index, line)
            },

            Expr::Slice { target, start, end } => {
                let target = self.eval_expr(target, line)?;
                let start = match start {
                    Some(start) => Some(self.eval_expr(start, line)?.as_integer(line)?),
                    None => None,
                };
                let end = match end {
                    Some(end) => Some(self.eval_expr(end, line)?.as_integer(line)?),
                    None => None,
                };
                eval_slice(&target, start, end, line)
            },
        }
    }
}

/// Converts a parsed literal into a runtime value.
fn literal_value(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Integer(n) => Value::Integer(*n),
        LiteralValue::Real(r) => Value::Real(*r),
        LiteralValue::Text(s) => Value::Text(s.clone()),
        LiteralValue::Bool(b) => Value::Bool(*b),
        LiteralValue::Nothing => Value::Nothing,
    }
}

/// `a[i]` over a list or text, with negative indices counting from the end.
fn eval_index(target: &Value, index: i64, line: usize) -> EvalResult<Value> {
    match target {
        Value::List(items) => {
            let items = items.borrow();
            let position = resolve_index(index, items.len(), line)?;
            Ok(items[position].clone())
        },
        Value::Text(text) => {
            let chars: Vec<char> = text.chars().collect();
            let position = resolve_index(index, chars.len(), line)?;
            Ok(Value::Text(chars[position].to_string()))
        },
        other => Err(RuntimeError::TypeError { details: format!("I can't index into {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// `a[i:j]` over a list or text; bounds clamp instead of failing, and an
/// inverted range is empty.
fn eval_slice(target: &Value,
              start: Option<i64>,
              end: Option<i64>,
              line: usize)
              -> EvalResult<Value> {
    match target {
        Value::List(items) => {
            let items = items.borrow();
            let (from, to) = slice_range(start, end, items.len());
            Ok(Value::from(items[from..to].to_vec()))
        },
        Value::Text(text) => {
            let chars: Vec<char> = text.chars().collect();
            let (from, to) = slice_range(start, end, chars.len());
            Ok(Value::Text(chars[from..to].iter().collect()))
        },
        other => Err(RuntimeError::TypeError { details: format!("I can't slice {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// Resolves optional slice bounds into a valid `from..to` range.
fn slice_range(start: Option<i64>, end: Option<i64>, len: usize) -> (usize, usize) {
    let from = start.map_or(0, |bound| resolve_slice_bound(bound, len));
    let to = end.map_or(len, |bound| resolve_slice_bound(bound, len));
    (from, to.max(from))
}

/// Rewrites the plain-English `random` phrasings into ordinary calls.
///
/// Only whole-expression forms rewrite, matching how they read in source:
/// - `random` / `random number` become `random()`;
/// - `random [number] between A and B` becomes `random_int(A, B)`;
/// - `random choice from E` becomes `choice(E)`.
fn rewrite_random_phrase(text: &str) -> Option<String> {
    let words = scan_words(text);
    if words.is_empty() || !words[0].text.eq_ignore_ascii_case("random") {
        return None;
    }

    let is = |index: usize, keyword: &str| {
        words.get(index).is_some_and(|w| w.text.eq_ignore_ascii_case(keyword))
    };

    if words.len() == 1 || (words.len() == 2 && is(1, "number")) {
        return Some("random()".to_string());
    }

    if is(1, "choice") && is(2, "from") && words.len() > 3 {
        let pool = text[words[2].end..].trim();
        return Some(format!("choice({pool})"));
    }

    let between = if is(1, "between") {
        Some(1)
    } else if is(1, "number") && is(2, "between") {
        Some(2)
    } else {
        None
    };
    let between = between?;

    // The first standalone `and` separates the two bounds.
    let and = words.iter().skip(between + 1).find(|w| w.text.eq_ignore_ascii_case("and"))?;
    let low = text[words[between].end..and.start].trim();
    let high = text[and.end..].trim();
    if low.is_empty() || high.is_empty() {
        return None;
    }

    Some(format!("random_int({low}, {high})"))
}

/// Recognizes the `call F [with args]` expression form.
///
/// Returns the function name and the raw argument text (empty when there is
/// no `with` clause). Anything after the name other than `with` is not a
/// call phrase and falls through to the expression grammar.
fn parse_call_phrase(text: &str) -> Option<(&str, &str)> {
    let words = scan_words(text);
    let first = words.first()?;
    if !(first.text.eq_ignore_ascii_case("call") || first.text.eq_ignore_ascii_case("run")) {
        return None;
    }

    let name = words.get(1)?;
    if !is_identifier(name.text) {
        return None;
    }

    match words.get(2) {
        None => Some((name.text, "")),
        Some(with) if with.text.eq_ignore_ascii_case("with") => {
            Some((name.text, text[with.end..].trim()))
        },
        Some(_) => None,
    }
}
