use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::FunctionDef,
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
    util::num::i64_to_f64_lossy,
};

/// Signature shared by fixed builtins and host-registered callables.
///
/// A builtin receives the evaluated argument values and the line number of the
/// enclosing statement, and returns a value or a runtime error.
pub type BuiltinFn = Rc<dyn Fn(&[Value], usize) -> EvalResult<Value>>;

/// Specifies the allowed number of arguments for a callable builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `AtLeast(n)` means the builtin accepts `n` or more arguments.
#[derive(Clone, Copy, Debug)]
pub enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    AtLeast(usize),
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(arr) => arr.contains(&n),
            Self::AtLeast(m) => n >= *m,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::OneOf(arr) => {
                let parts: Vec<String> = arr.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(" or "))
            },
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// A named callable provided by the interpreter or the embedding host.
///
/// The fixed builtin table (`len`, `str`, `random`, ...) and any callables
/// registered by a driver (the pixel-window and web hosts) both use this
/// shape, so every call goes through one dispatch path.
#[derive(Clone)]
pub struct Builtin {
    /// Name the callable is bound to in the global frame.
    pub name:  String,
    /// Allowed argument counts, checked before the function runs.
    pub arity: Arity,
    /// The host function itself.
    pub func:  BuiltinFn,
}

/// Represents a runtime value in the interpreter.
///
/// This enum models every type a plaintalk program can produce: numbers,
/// text, booleans, the absent value `nothing`, lists, and callables.
#[derive(Clone)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A double-precision floating-point number.
    Real(f64),
    /// A piece of text.
    Text(String),
    /// A boolean, produced by comparisons and the `true`/`false` literals.
    Bool(bool),
    /// The absent value, written `nothing` in source code.
    Nothing,
    /// An ordered sequence of values.
    ///
    /// A list is a single shared container: copies of this value alias the
    /// same storage, and mutations are visible through every alias.
    List(Rc<RefCell<Vec<Value>>>),
    /// A user-defined function created by a `define` block.
    Function(Rc<FunctionDef>),
    /// A builtin or host-provided callable.
    Builtin(Builtin),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(Rc::new(RefCell::new(v)))
    }
}

impl Value {
    /// Returns the name of this value's type for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "a number",
            Self::Real(_) => "a decimal number",
            Self::Text(_) => "text",
            Self::Bool(_) => "a boolean",
            Self::Nothing => "nothing",
            Self::List(_) => "a list",
            Self::Function(_) => "a function",
            Self::Builtin(_) => "a built-in function",
        }
    }

    /// Reports whether the value counts as true in a condition.
    ///
    /// Nonzero numbers, non-empty text, non-empty lists, `true`, and every
    /// callable are truthy. Zero, empty text, empty lists, `false`, and
    /// `nothing` are not.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Integer(n) => *n != 0,
            Self::Real(r) => *r != 0.0,
            Self::Text(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::Nothing => false,
            Self::List(items) => !items.borrow().is_empty(),
            Self::Function(_) | Self::Builtin(_) => true,
        }
    }

    /// Converts the value to an `f64`, or returns an error if not numeric.
    ///
    /// # Example
    /// ```
    /// use plaintalk::interpreter::value::Value;
    ///
    /// let x = Value::Integer(10);
    /// assert_eq!(x.as_real(1).unwrap(), 10.0);
    /// ```
    pub fn as_real(&self, line: usize) -> EvalResult<f64> {
        match self {
            Self::Real(r) => Ok(*r),
            Self::Integer(n) => Ok(i64_to_f64_lossy(*n)),
            _ => Err(RuntimeError::TypeError { details: format!("I expected a number, but found {}",
                                                                self.type_name()),
                                               line }),
        }
    }

    /// Converts the value to an `i64`, or returns an error if it is not an
    /// integer.
    pub fn as_integer(&self, line: usize) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            _ => Err(RuntimeError::TypeError { details: format!("I expected a whole number, but found {}",
                                                                self.type_name()),
                                               line }),
        }
    }

    /// Borrows the value as a list, or returns an error if it is not one.
    pub fn as_list(&self, line: usize) -> EvalResult<&Rc<RefCell<Vec<Self>>>> {
        match self {
            Self::List(items) => Ok(items),
            _ => Err(RuntimeError::TypeError { details: format!("I expected a list, but found {}",
                                                                self.type_name()),
                                               line }),
        }
    }

    /// Borrows the value as text, or returns an error if it is not text.
    pub fn as_text(&self, line: usize) -> EvalResult<&str> {
        match self {
            Self::Text(s) => Ok(s),
            _ => Err(RuntimeError::TypeError { details: format!("I expected text, but found {}",
                                                                self.type_name()),
                                               line }),
        }
    }

    /// Returns `true` if the value is numeric (integer or real).
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Real(_))
    }

    /// Structural equality as seen by the `==` operator and `equals`.
    ///
    /// Integers and reals compare numerically across the two variants; other
    /// types compare only against the same type. Lists compare element-wise.
    /// Mismatched types are unequal rather than an error.
    #[must_use]
    pub fn loosely_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a == b,
            (Self::Integer(a), Self::Real(b)) | (Self::Real(b), Self::Integer(a)) => {
                i64_to_f64_lossy(*a) == *b
            },
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Nothing, Self::Nothing) => true,
            (Self::List(a), Self::List(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.loosely_equals(y))
            },
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }

    /// Formats the value the way it appears inside a printed list.
    ///
    /// Text is quoted so that `["a", 1]` reads unambiguously; every other
    /// type uses its plain display form.
    fn fmt_element(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "\"{s}\""),
            other => write!(f, "{other}"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.loosely_equals(other)
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "Integer({n})"),
            Self::Real(r) => write!(f, "Real({r})"),
            Self::Text(s) => write!(f, "Text({s:?})"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Nothing => write!(f, "Nothing"),
            Self::List(items) => write!(f, "List({:?})", items.borrow()),
            Self::Function(def) => write!(f, "Function({})", def.name),
            Self::Builtin(builtin) => write!(f, "Builtin({})", builtin.name),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Nothing => write!(f, "nothing"),
            Self::List(items) => {
                write!(f, "[")?;
                for (index, value) in items.borrow().iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    value.fmt_element(f)?;
                }
                write!(f, "]")
            },
            Self::Function(def) => {
                write!(f, "<function {}({})>", def.name, def.params.join(", "))
            },
            Self::Builtin(builtin) => write!(f, "<built-in {}>", builtin.name),
        }
    }
}
