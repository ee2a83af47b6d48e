use std::{
    collections::HashMap,
    io::{BufRead, Write},
    rc::Rc,
};

use crate::{
    ast::{LoopCtrl, Program, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::builtin,
        value::{Arity, Builtin, BuiltinFn, Value},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Default safety cap on loop iterations.
pub const MAX_LOOP_ITERATIONS: u64 = 100_000;

/// The control signal a statement hands back to its enclosing block.
///
/// `return`, `stop`, and `skip` do not surface to user code; they travel up
/// the walker as these variants and are intercepted by the nearest function
/// call or loop. A signal that reaches the top of [`Context::execute`]
/// becomes a runtime error at the line it was raised.
#[derive(Debug)]
pub enum Flow {
    /// Execution continues with the next statement.
    Normal,
    /// A `return` is unwinding toward the nearest function call.
    Return(Value, usize),
    /// A `stop` is unwinding toward the nearest loop.
    Break(usize),
    /// A `skip` is unwinding toward the nearest loop iteration.
    Continue(usize),
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the scope stack (bottom frame
/// global, topmost frame current), the loop safety cap, and the I/O hooks
/// used by `say` and `ask`. It lives for a whole program run, or for a whole
/// session in the REPL.
pub struct Context {
    /// The scope stack. The bottom frame is the global frame and is never
    /// popped; function calls push and pop frames above it.
    pub(crate) scope_stack: Vec<HashMap<String, Value>>,
    /// Loop iterations allowed per loop before `RunawayLoop` is raised.
    pub(crate) max_loop_iterations: u64,
    output_fn: Box<dyn FnMut(&str)>,
    input_fn:  Box<dyn FnMut(&str) -> String>,
}

impl Context {
    /// Creates a context speaking to standard input and output.
    ///
    /// The global frame is pre-populated with the builtin table.
    #[must_use]
    pub fn new(max_loop_iterations: u64) -> Self {
        Self::with_io(max_loop_iterations,
                      Box::new(|text| println!("{text}")),
                      Box::new(read_from_stdin))
    }

    /// Creates a context with custom output and input hooks.
    ///
    /// `output_fn` receives one already-formatted line per `say`;
    /// `input_fn` receives the prompt of an `ask` and returns the answer.
    /// Tests use this to capture output deterministically.
    #[must_use]
    pub fn with_io(max_loop_iterations: u64,
                   output_fn: Box<dyn FnMut(&str)>,
                   input_fn: Box<dyn FnMut(&str) -> String>)
                   -> Self {
        let mut globals = HashMap::new();
        builtin::install(&mut globals);

        Self { scope_stack: vec![globals],
               max_loop_iterations,
               output_fn,
               input_fn }
    }

    /// Registers a host-provided callable in the global frame.
    ///
    /// This is the seam drivers use to plug in the pixel-window and web
    /// builtins; the core treats the callable as opaque and dispatches it
    /// through the same path as every other function.
    pub fn register_host(&mut self, name: &str, arity: Arity, func: BuiltinFn) {
        let value = Value::Builtin(Builtin { name: name.to_string(),
                                             arity,
                                             func });
        self.scope_stack[0].insert(name.to_string(), value);
    }

    /// Read-only view of the global frame, used by the REPL's `:vars`.
    #[must_use]
    pub fn globals(&self) -> &HashMap<String, Value> {
        &self.scope_stack[0]
    }

    /// Executes a whole program against this context.
    ///
    /// # Errors
    /// Returns the first `RuntimeError`, including stray control signals:
    /// a `return` with no enclosing function, or `stop`/`skip` with no
    /// enclosing loop.
    ///
    /// # Example
    /// ```
    /// use plaintalk::{
    ///     interpreter::{
    ///         evaluator::core::{Context, MAX_LOOP_ITERATIONS},
    ///         lexer::tokenize,
    ///         parser::core::Parser,
    ///     },
    /// };
    ///
    /// let tokens = tokenize("set x to 2 + 3").unwrap();
    /// let program = Parser::new(tokens).parse().unwrap();
    ///
    /// let mut context = Context::new(MAX_LOOP_ITERATIONS);
    /// context.execute(&program).unwrap();
    /// ```
    pub fn execute(&mut self, program: &Program) -> EvalResult<()> {
        match self.exec_block(&program.statements)? {
            Flow::Normal => Ok(()),
            Flow::Return(_, line) => Err(RuntimeError::ReturnOutsideFunction { line }),
            Flow::Break(line) => Err(RuntimeError::StopOutsideLoop { line }),
            Flow::Continue(line) => Err(RuntimeError::SkipOutsideLoop { line }),
        }
    }

    /// Executes statements in order until one raises a control signal.
    pub(crate) fn exec_block(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        for statement in statements {
            let flow = self.exec_statement(statement)?;
            if !matches!(flow, Flow::Normal) {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a single statement.
    fn exec_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        match statement {
            Statement::Assign { name, expression, line } => {
                let value = self.eval_expression(expression, *line)?;
                self.assign_nearest(name, value);
                Ok(Flow::Normal)
            },

            Statement::Say { expression, line } => {
                let value = self.eval_expression(expression, *line)?;
                self.say(&value.to_string());
                Ok(Flow::Normal)
            },

            Statement::Ask { prompt, target, line } => {
                let prompt = self.eval_expression(prompt, *line)?;
                let answer = self.ask(&prompt.to_string());
                self.assign_nearest(target, Value::Text(answer));
                Ok(Flow::Normal)
            },

            Statement::MathMut { op, target, operand, line } => {
                self.exec_math_mut(*op, target, operand, *line)?;
                Ok(Flow::Normal)
            },

            Statement::ListCreate { name, line: _ } => {
                self.assign_nearest(name, Value::from(Vec::<Value>::new()));
                Ok(Flow::Normal)
            },

            Statement::ListRemove { target, value, line } => {
                self.exec_list_remove(target, value, *line)?;
                Ok(Flow::Normal)
            },

            Statement::If { branches, else_body, line: _ } => {
                self.exec_if(branches, else_body.as_deref())
            },

            Statement::RepeatCount { count, body, line } => {
                self.exec_repeat_count(count, body, *line)
            },

            Statement::RepeatWhile { condition, body, line } => {
                self.exec_repeat_while(condition, body, *line)
            },

            Statement::ForEach { item, iterable, body, line } => {
                self.exec_for_each(item, iterable, body, *line)
            },

            Statement::DefineFn(def) => {
                let value = Value::Function(Rc::new(def.clone()));
                self.define_local(&def.name, value);
                Ok(Flow::Normal)
            },

            Statement::CallStmt { name, arguments, line } => {
                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.eval_expression(argument, *line)?);
                }
                self.call_callable(name, args, *line)?;
                Ok(Flow::Normal)
            },

            Statement::Return { expression, line } => {
                let value = match expression {
                    Some(expression) => self.eval_expression(expression, *line)?,
                    None => Value::Nothing,
                };
                Ok(Flow::Return(value, *line))
            },

            Statement::Loop { ctrl: LoopCtrl::Stop, line } => Ok(Flow::Break(*line)),
            Statement::Loop { ctrl: LoopCtrl::Skip, line } => Ok(Flow::Continue(*line)),

            Statement::ExprStmt { expression, line } => {
                self.eval_expression(expression, *line)?;
                Ok(Flow::Normal)
            },
        }
    }

    /// Looks up a variable, innermost scope first.
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.scope_stack.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Binds a variable in the topmost frame, shadowing any outer binding.
    pub(crate) fn define_local(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Assigns at the innermost frame that already holds the name, or binds
    /// in the topmost frame when the name is new.
    ///
    /// This is the write rule of `set`: a function that sets a global
    /// updates the global, while a brand-new name stays local to the
    /// function.
    pub(crate) fn assign_nearest(&mut self, name: &str, value: Value) {
        for scope in self.scope_stack.iter_mut().rev() {
            if scope.contains_key(name) {
                scope.insert(name.to_string(), value);
                return;
            }
        }
        self.define_local(name, value);
    }

    /// Emits one line of program output.
    pub(crate) fn say(&mut self, text: &str) {
        (self.output_fn)(text);
    }

    /// Shows a prompt and reads one line of user input.
    pub(crate) fn ask(&mut self, prompt: &str) -> String {
        (self.input_fn)(prompt)
    }
}

/// The default `ask` hook: prompt on stdout, answer from stdin.
fn read_from_stdin(prompt: &str) -> String {
    print!("{prompt}");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    let _ = std::io::stdin().lock().read_line(&mut answer);
    answer.trim_end_matches(['\n', '\r']).to_string()
}
