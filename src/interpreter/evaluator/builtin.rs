use std::{collections::HashMap, rc::Rc, thread, time::Duration};

use rand::Rng;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{binary::compare_order, core::EvalResult},
        value::{Arity, Builtin, Value},
    },
    util::num::{f64_to_i64_trunc, i64_to_f64_lossy},
};

/// Type alias for builtin function handlers.
///
/// A builtin receives a slice of evaluated argument values and the line
/// number of the enclosing statement, and returns a value.
type RawBuiltin = fn(&[Value], usize) -> EvalResult<Value>;

/// Hard cap on how many elements `range(...)` will materialize.
const MAX_RANGE_LEN: u64 = 10_000_000;

/// Defines the builtin functions by generating a lookup table.
///
/// Each entry provides a name, an arity specification, and a function
/// pointer. The macro produces `BuiltinDef` (internal metadata),
/// `BUILTIN_TABLE` (the static table), and `BUILTIN_NAMES` (the public name
/// list, used by the REPL to keep `:vars` output readable).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  RawBuiltin,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of every fixed builtin.
        pub const BUILTIN_NAMES: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "len"          => { arity: Arity::Exact(1), func: len },
    "str"          => { arity: Arity::Exact(1), func: str_of },
    "int"          => { arity: Arity::Exact(1), func: int_of },
    "float"        => { arity: Arity::Exact(1), func: float_of },
    "bool"         => { arity: Arity::Exact(1), func: bool_of },
    "range"        => { arity: Arity::OneOf(&[1, 2, 3]), func: range },
    "list"         => { arity: Arity::OneOf(&[0, 1]), func: list_of },
    "abs"          => { arity: Arity::Exact(1), func: abs },
    "min"          => { arity: Arity::AtLeast(1), func: |args, line| min_max("min", args, line) },
    "max"          => { arity: Arity::AtLeast(1), func: |args, line| min_max("max", args, line) },
    "sum"          => { arity: Arity::Exact(1), func: sum },
    "round"        => { arity: Arity::OneOf(&[1, 2]), func: round },
    "sorted"       => { arity: Arity::Exact(1), func: sorted },
    "random"       => { arity: Arity::OneOf(&[0, 2]), func: random },
    "random_int"   => { arity: Arity::Exact(2), func: random_int },
    "random_float" => { arity: Arity::Exact(2), func: random_float },
    "choice"       => { arity: Arity::Exact(1), func: choice },
    "sleep"        => { arity: Arity::Exact(1), func: sleep },
}

/// Seeds the global frame with the fixed builtin table.
///
/// Builtins are ordinary values in the global frame, so user definitions can
/// shadow them and they travel through the same call path as everything
/// else.
pub fn install(globals: &mut HashMap<String, Value>) {
    for def in BUILTIN_TABLE {
        let value = Value::Builtin(Builtin { name:  def.name.to_string(),
                                             arity: def.arity,
                                             func:  Rc::new(def.func), });
        globals.insert(def.name.to_string(), value);
    }
}

/// `len(x)`: elements of a list, or characters of a text.
fn len(args: &[Value], line: usize) -> EvalResult<Value> {
    let length = match &args[0] {
        Value::Text(s) => s.chars().count(),
        Value::List(items) => items.borrow().len(),
        other => {
            return Err(RuntimeError::TypeError { details: format!("len(...) needs a list or text, not {}",
                                                                  other.type_name()),
                                                 line });
        },
    };
    Ok(Value::Integer(i64::try_from(length).unwrap_or(i64::MAX)))
}

/// `str(x)`: the display form of any value.
fn str_of(args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::Text(args[0].to_string()))
}

/// `int(x)`: whole number from a number, text, or boolean. Decimals truncate
/// toward zero.
fn int_of(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(*n)),
        Value::Real(r) => Ok(Value::Integer(f64_to_i64_trunc(*r, line)?)),
        Value::Bool(b) => Ok(Value::Integer(i64::from(*b))),
        Value::Text(s) => {
            s.trim().parse().map(Value::Integer).map_err(|_| RuntimeError::InvalidArgument {
                details: format!("I can't turn '{s}' into a whole number"),
                line,
            })
        },
        other => Err(RuntimeError::TypeError { details: format!("int(...) can't convert {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// `float(x)`: decimal number from a number, text, or boolean.
fn float_of(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Integer(n) => Ok(Value::Real(i64_to_f64_lossy(*n))),
        Value::Real(r) => Ok(Value::Real(*r)),
        Value::Bool(b) => Ok(Value::Real(f64::from(u8::from(*b)))),
        Value::Text(s) => {
            s.trim().parse().map(Value::Real).map_err(|_| RuntimeError::InvalidArgument {
                details: format!("I can't turn '{s}' into a number"),
                line,
            })
        },
        other => Err(RuntimeError::TypeError { details: format!("float(...) can't convert {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// `bool(x)`: the truthiness of any value.
fn bool_of(args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::Bool(args[0].is_truthy()))
}

/// `range(stop)`, `range(start, stop)`, `range(start, stop, step)`: a list
/// of whole numbers.
fn range(args: &[Value], line: usize) -> EvalResult<Value> {
    let (start, stop, step) = match args {
        [stop] => (0, stop.as_integer(line)?, 1),
        [start, stop] => (start.as_integer(line)?, stop.as_integer(line)?, 1),
        [start, stop, step] => {
            (start.as_integer(line)?, stop.as_integer(line)?, step.as_integer(line)?)
        },
        _ => unreachable!("arity checked by the call path"),
    };

    if step == 0 {
        return Err(RuntimeError::InvalidArgument { details: "range(...) needs a nonzero step".to_string(),
                                                   line });
    }

    let span = if step > 0 { stop.saturating_sub(start) } else { start.saturating_sub(stop) };
    if span > 0 && span.unsigned_abs() / step.unsigned_abs() >= MAX_RANGE_LEN {
        return Err(RuntimeError::InvalidArgument { details: "that range is too large to build as a list".to_string(),
                                                   line });
    }

    let mut values = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        values.push(Value::Integer(current));
        current = match current.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }

    Ok(Value::from(values))
}

/// `list()`, `list(x)`: an empty list, a shallow copy of a list, or the
/// characters of a text.
fn list_of(args: &[Value], line: usize) -> EvalResult<Value> {
    match args {
        [] => Ok(Value::from(Vec::<Value>::new())),
        [Value::List(items)] => Ok(Value::from(items.borrow().clone())),
        [Value::Text(s)] => {
            Ok(Value::from(s.chars().map(|ch| Value::Text(ch.to_string())).collect::<Vec<_>>()))
        },
        [other] => Err(RuntimeError::TypeError { details: format!("list(...) can't convert {}",
                                                                  other.type_name()),
                                                 line }),
        _ => unreachable!("arity checked by the call path"),
    }
}

/// `abs(x)`: the absolute value of a number.
fn abs(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Integer(n) => {
            n.checked_abs().map(Value::Integer).ok_or(RuntimeError::Overflow { line })
        },
        Value::Real(r) => Ok(Value::Real(r.abs())),
        other => Err(RuntimeError::TypeError { details: format!("abs(...) needs a number, not {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// `min(...)` / `max(...)`: over a single list argument, or over the
/// arguments themselves.
fn min_max(name: &str, args: &[Value], line: usize) -> EvalResult<Value> {
    let pool: Vec<Value> = match args {
        [Value::List(items)] => items.borrow().clone(),
        _ => args.to_vec(),
    };

    if pool.is_empty() {
        return Err(RuntimeError::InvalidArgument { details: format!("{name}(...) needs at least one value"),
                                                   line });
    }

    let mut best = pool[0].clone();
    for candidate in &pool[1..] {
        let ordering = compare_order(candidate, &best, line)?;
        let better = if name == "min" { ordering.is_lt() } else { ordering.is_gt() };
        if better {
            best = candidate.clone();
        }
    }

    Ok(best)
}

/// `sum(list)`: integral while every element is whole, decimal otherwise.
fn sum(args: &[Value], line: usize) -> EvalResult<Value> {
    let items = args[0].as_list(line)?.borrow();

    let mut int_total = 0_i64;
    let mut real_total = 0.0_f64;
    let mut all_integers = true;

    for item in items.iter() {
        match item {
            Value::Integer(n) => {
                int_total = int_total.checked_add(*n).ok_or(RuntimeError::Overflow { line })?;
                real_total += i64_to_f64_lossy(*n);
            },
            Value::Real(r) => {
                all_integers = false;
                real_total += r;
            },
            other => {
                return Err(RuntimeError::TypeError { details: format!("sum(...) needs numbers, but the list has {}",
                                                                      other.type_name()),
                                                     line });
            },
        }
    }

    if all_integers {
        Ok(Value::Integer(int_total))
    } else {
        Ok(Value::Real(real_total))
    }
}

/// `round(x)` to a whole number, or `round(x, digits)` to a decimal.
fn round(args: &[Value], line: usize) -> EvalResult<Value> {
    match args {
        [Value::Integer(n)] => Ok(Value::Integer(*n)),
        [Value::Real(r)] => Ok(Value::Integer(f64_to_i64_trunc(r.round(), line)?)),
        [value, digits] => {
            let digits = i32::try_from(digits.as_integer(line)?).map_err(|_| {
                             RuntimeError::InvalidArgument { details: "that digit count is out of range".to_string(),
                                                             line }
                         })?;
            let factor = 10_f64.powi(digits);
            Ok(Value::Real((value.as_real(line)? * factor).round() / factor))
        },
        [other] => Err(RuntimeError::TypeError { details: format!("round(...) needs a number, not {}",
                                                                  other.type_name()),
                                                 line }),
        _ => unreachable!("arity checked by the call path"),
    }
}

/// `sorted(list)`: a new list in ascending order.
///
/// The elements must be mutually orderable (all numbers, or all texts).
fn sorted(args: &[Value], line: usize) -> EvalResult<Value> {
    let mut items = args[0].as_list(line)?.borrow().clone();

    // Surface the first incomparable pair as an error instead of panicking
    // inside the sort comparator.
    let mut failure = None;
    items.sort_by(|a, b| match compare_order(a, b, line) {
             Ok(ordering) => ordering,
             Err(error) => {
                 failure.get_or_insert(error);
                 std::cmp::Ordering::Equal
             },
         });

    match failure {
        Some(error) => Err(error),
        None => Ok(Value::from(items)),
    }
}

/// `random()`: a decimal in `[0, 1)`. `random(a, b)`: a whole number when
/// both bounds are whole, a decimal otherwise; bounds may arrive in either
/// order.
fn random(args: &[Value], line: usize) -> EvalResult<Value> {
    match args {
        [] => Ok(Value::Real(rand::thread_rng().gen_range(0.0..1.0))),
        [Value::Integer(a), Value::Integer(b)] => {
            let (low, high) = (*a.min(b), *a.max(b));
            Ok(Value::Integer(rand::thread_rng().gen_range(low..=high)))
        },
        [a, b] => {
            let (a, b) = (a.as_real(line)?, b.as_real(line)?);
            let (low, high) = (a.min(b), a.max(b));
            Ok(Value::Real(rand::thread_rng().gen_range(low..=high)))
        },
        _ => unreachable!("arity checked by the call path"),
    }
}

/// `random_int(a, b)`: a whole number between the bounds, inclusive.
fn random_int(args: &[Value], line: usize) -> EvalResult<Value> {
    let a = args[0].as_integer(line)?;
    let b = args[1].as_integer(line)?;
    let (low, high) = (a.min(b), a.max(b));
    Ok(Value::Integer(rand::thread_rng().gen_range(low..=high)))
}

/// `random_float(a, b)`: a decimal between the bounds.
fn random_float(args: &[Value], line: usize) -> EvalResult<Value> {
    let a = args[0].as_real(line)?;
    let b = args[1].as_real(line)?;
    let (low, high) = (a.min(b), a.max(b));
    Ok(Value::Real(rand::thread_rng().gen_range(low..=high)))
}

/// `choice(x)`: a random element of a list, or a random character of a text.
fn choice(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::List(items) => {
            let items = items.borrow();
            if items.is_empty() {
                return Err(RuntimeError::InvalidArgument { details: "choice(...) needs a non-empty list".to_string(),
                                                           line });
            }
            let index = rand::thread_rng().gen_range(0..items.len());
            Ok(items[index].clone())
        },
        Value::Text(s) => {
            let chars: Vec<char> = s.chars().collect();
            if chars.is_empty() {
                return Err(RuntimeError::InvalidArgument { details: "choice(...) needs non-empty text".to_string(),
                                                           line });
            }
            let index = rand::thread_rng().gen_range(0..chars.len());
            Ok(Value::Text(chars[index].to_string()))
        },
        other => Err(RuntimeError::TypeError { details: format!("choice(...) needs a list or text, not {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// `sleep(seconds)`: blocks the interpreter for the given duration.
fn sleep(args: &[Value], line: usize) -> EvalResult<Value> {
    let seconds = args[0].as_real(line)?;
    if seconds < 0.0 {
        return Err(RuntimeError::InvalidArgument { details: "sleep(...) needs a non-negative duration".to_string(),
                                                   line });
    }

    thread::sleep(Duration::from_secs_f64(seconds));
    Ok(Value::Nothing)
}
