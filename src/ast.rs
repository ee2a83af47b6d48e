/// A complete parsed program: an ordered sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements in source order.
    pub statements: Vec<Statement>,
}

/// The arithmetic mutation applied by an in-place math statement.
///
/// `Add` doubles as list append when the target holds a list.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MutOp {
    /// `add E to X` / `increase X by E`
    Add,
    /// `subtract E from X` / `decrease X by E`
    Subtract,
    /// `multiply X by E`
    Multiply,
    /// `divide X by E`
    Divide,
}

/// The direction of a loop-control statement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopCtrl {
    /// `stop` / `break`: leave the nearest enclosing loop.
    Stop,
    /// `skip` / `next`: jump to the next iteration of the nearest loop.
    Skip,
}

/// The comparison a condition phrase folds into.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `is greater than`, `is bigger than`
    Greater,
    /// `is less than`, `is smaller than`
    Less,
    /// `is greater than or equal to`, `is at least`
    GreaterEqual,
    /// `is less than or equal to`, `is at most`
    LessEqual,
    /// `equals`, `is equal to`
    Equal,
    /// `is not`, `is not equal to`
    NotEqual,
    /// `contains`
    Contains,
    /// `does not contain`
    NotContains,
    /// A bare expression evaluated for truthiness.
    Truthy,
}

/// A parsed condition: two expression sides joined by a comparison.
///
/// The sides are kept as raw expression text; the evaluator reads them when
/// the condition is checked. `Truthy` conditions have no right side.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Left-hand expression text.
    pub left:  String,
    /// The folded comparison operator.
    pub op:    ComparisonOp,
    /// Right-hand expression text, absent for bare truthiness checks.
    pub right: Option<String>,
    /// Line number in the source code.
    pub line:  usize,
}

/// One `if` or `otherwise if` arm: a condition and the statements it guards.
#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    /// The branch condition.
    pub condition: Condition,
    /// Statements executed when the condition holds.
    pub body:      Vec<Statement>,
    /// Line number of the branch header.
    pub line:      usize,
}

/// A user-defined function created by a `define` block.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The function name.
    pub name:   String,
    /// Parameter names in declaration order.
    pub params: Vec<String>,
    /// The function body.
    pub body:   Vec<Statement>,
    /// Line number of the `define` header.
    pub line:   usize,
}

/// An abstract syntax tree node for one statement.
///
/// Every variant carries the 1-based line of its opening keyword. Fields that
/// hold expressions store the raw expression text; the statement parser only
/// checks bracket/quote balance, and the evaluator reads the text when the
/// statement runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `set X to E` and its aliases.
    Assign {
        /// The target variable name.
        name:       String,
        /// The right-hand expression text.
        expression: String,
        /// Line number in the source code.
        line:       usize,
    },
    /// `say E` and its aliases.
    Say {
        /// The expression to print.
        expression: String,
        /// Line number in the source code.
        line:       usize,
    },
    /// `ask E and store in X`.
    Ask {
        /// The prompt expression.
        prompt: String,
        /// The variable that receives the answer.
        target: String,
        /// Line number in the source code.
        line:   usize,
    },
    /// In-place arithmetic (`add`/`subtract`/`multiply`/`divide` family).
    MathMut {
        /// Which mutation to apply.
        op:      MutOp,
        /// The variable being mutated.
        target:  String,
        /// The operand expression text.
        operand: String,
        /// Line number in the source code.
        line:    usize,
    },
    /// `create list X`.
    ListCreate {
        /// The new list's name.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// `remove E from X`.
    ListRemove {
        /// The list variable name.
        target: String,
        /// The expression of the value to remove.
        value:  String,
        /// Line number in the source code.
        line:   usize,
    },
    /// A full `if` / `otherwise if` / `otherwise` chain.
    If {
        /// The `if` arm followed by any `otherwise if` arms, in source order.
        branches:  Vec<IfBranch>,
        /// The optional `otherwise` body.
        else_body: Option<Vec<Statement>>,
        /// Line number of the `if` header.
        line:      usize,
    },
    /// `repeat N times`.
    RepeatCount {
        /// The count expression, evaluated once.
        count: String,
        /// The loop body.
        body:  Vec<Statement>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `repeat while C`.
    RepeatWhile {
        /// The loop condition, re-checked before every iteration.
        condition: Condition,
        /// The loop body.
        body:      Vec<Statement>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `for each X in E`.
    ForEach {
        /// The loop variable name.
        item:     String,
        /// The iterable expression, evaluated once.
        iterable: String,
        /// The loop body.
        body:     Vec<Statement>,
        /// Line number in the source code.
        line:     usize,
    },
    /// `define F [with params]`.
    DefineFn(FunctionDef),
    /// `call F [with args]` in statement position; the result is discarded.
    CallStmt {
        /// The function name.
        name:      String,
        /// Raw argument expression texts.
        arguments: Vec<String>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `return [E]`.
    Return {
        /// The optional result expression.
        expression: Option<String>,
        /// Line number in the source code.
        line:       usize,
    },
    /// `stop` / `skip` and their aliases.
    Loop {
        /// Whether this stops or skips.
        ctrl: LoopCtrl,
        /// Line number in the source code.
        line: usize,
    },
    /// A bare expression evaluated for its side effects, such as `sleep(1)`.
    ExprStmt {
        /// The expression text.
        expression: String,
        /// Line number in the source code.
        line:       usize,
    },
}

impl Statement {
    /// Gets the line number of the statement's opening keyword.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Assign { line, .. }
            | Self::Say { line, .. }
            | Self::Ask { line, .. }
            | Self::MathMut { line, .. }
            | Self::ListCreate { line, .. }
            | Self::ListRemove { line, .. }
            | Self::If { line, .. }
            | Self::RepeatCount { line, .. }
            | Self::RepeatWhile { line, .. }
            | Self::ForEach { line, .. }
            | Self::CallStmt { line, .. }
            | Self::Return { line, .. }
            | Self::Loop { line, .. }
            | Self::ExprStmt { line, .. } => *line,
            Self::DefineFn(def) => def.line,
        }
    }
}

/// A literal value inside the expression sub-language.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A floating-point literal.
    Real(f64),
    /// A quoted text literal with escapes already resolved.
    Text(String),
    /// `true` or `false`.
    Bool(bool),
    /// The `nothing` literal.
    Nothing,
}

/// Represents a binary operator of the expression sub-language.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`); also text concatenation and list concatenation.
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`); always produces a decimal.
    Div,
    /// Remainder (`%`)
    Mod,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`and`), short-circuiting.
    And,
    /// Logical or (`or`), short-circuiting.
    Or,
}

/// Represents a unary operator of the expression sub-language.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical negation (`not x`).
    Not,
}

/// An expression tree node.
///
/// Expressions live inside statements as raw text and are parsed into this
/// tree when the enclosing statement runs; the statement's line number is
/// attached to any error, so the nodes themselves carry no location.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(LiteralValue),
    /// Reference to a variable by name.
    Variable(String),
    /// A unary operation.
    Unary {
        /// The operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Expr>,
    },
    /// A binary operation.
    Binary {
        /// Left operand.
        left:  Box<Expr>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A call written `f(args)`.
    Call {
        /// Name of the callable.
        name:      String,
        /// Argument expressions.
        arguments: Vec<Expr>,
    },
    /// A list literal `[a, b, c]`.
    ListLiteral(Vec<Expr>),
    /// Indexing `a[i]`.
    Index {
        /// The list or text being indexed.
        target: Box<Expr>,
        /// The index expression.
        index:  Box<Expr>,
    },
    /// Slicing `a[i:j]`; either bound may be omitted.
    Slice {
        /// The list or text being sliced.
        target: Box<Expr>,
        /// Optional start bound.
        start:  Option<Box<Expr>>,
        /// Optional end bound.
        end:    Option<Box<Expr>>,
    },
}
