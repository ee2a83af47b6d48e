use std::rc::Rc;

use crate::{
    ast::FunctionDef,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        value::Value,
    },
};

impl Context {
    /// Calls whatever `name` resolves to with already-evaluated arguments.
    ///
    /// Resolution searches the scope stack innermost-first, which is also
    /// where the builtin table lives (in the global frame), so user
    /// definitions shadow builtins naturally. Builtin and host callables
    /// have their arity checked here; user functions check their own inside
    /// [`Context::call_user_function`].
    pub(crate) fn call_callable(&mut self,
                                name: &str,
                                args: Vec<Value>,
                                line: usize)
                                -> EvalResult<Value> {
        let callee = self.get_variable(name)
                         .cloned()
                         .ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string(),
                                                                        line })?;

        match callee {
            Value::Function(def) => self.call_user_function(&def, args, line),
            Value::Builtin(builtin) => {
                if !builtin.arity.check(args.len()) {
                    return Err(RuntimeError::ArgumentCountMismatch { name:     name.to_string(),
                                                                     expected: builtin.arity
                                                                                      .to_string(),
                                                                     found:    args.len(),
                                                                     line, });
                }
                (builtin.func)(&args, line)
            },
            _ => Err(RuntimeError::NotCallable { name: name.to_string(),
                                                 line }),
        }
    }

    /// Calls a user-defined function.
    ///
    /// The argument count must match the parameter list exactly. The
    /// caller's local frames are set aside so the body sees only the globals
    /// plus its own parameter frame, and they are put back on every path,
    /// error or not. A `return` signal provides the result; falling off the
    /// end returns `nothing`. A `stop` or `skip` escaping the body is the
    /// out-of-loop error, since loop signals never cross a function
    /// boundary.
    pub(crate) fn call_user_function(&mut self,
                                     def: &Rc<FunctionDef>,
                                     args: Vec<Value>,
                                     line: usize)
                                     -> EvalResult<Value> {
        if args.len() != def.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name:     def.name.clone(),
                                                             expected: def.params.len().to_string(),
                                                             found:    args.len(),
                                                             line, });
        }

        let frame = def.params.iter().cloned().zip(args).collect();

        let saved: Vec<_> = self.scope_stack.drain(1..).collect();
        self.scope_stack.push(frame);
        let outcome = self.exec_block(&def.body);
        self.scope_stack.truncate(1);
        self.scope_stack.extend(saved);

        match outcome? {
            Flow::Return(value, _) => Ok(value),
            Flow::Normal => Ok(Value::Nothing),
            Flow::Break(line) => Err(RuntimeError::StopOutsideLoop { line }),
            Flow::Continue(line) => Err(RuntimeError::SkipOutsideLoop { line }),
        }
    }
}
