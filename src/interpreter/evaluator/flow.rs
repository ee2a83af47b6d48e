use crate::{
    ast::{Condition, ComparisonOp, IfBranch, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::{compare_order, value_contains},
            core::{Context, EvalResult, Flow},
        },
        value::Value,
    },
};

impl Context {
    /// Executes an `if` / `otherwise if` / `otherwise` chain.
    ///
    /// Branches are checked in source order and exactly one body runs: the
    /// first branch whose condition holds, or the `otherwise` body when none
    /// does and one exists.
    pub(crate) fn exec_if(&mut self,
                          branches: &[IfBranch],
                          else_body: Option<&[Statement]>)
                          -> EvalResult<Flow> {
        for branch in branches {
            if self.eval_condition(&branch.condition)? {
                return self.exec_block(&branch.body);
            }
        }

        match else_body {
            Some(body) => self.exec_block(body),
            None => Ok(Flow::Normal),
        }
    }

    /// Executes `repeat N times`.
    ///
    /// The count is evaluated once and must be a non-negative whole number.
    pub(crate) fn exec_repeat_count(&mut self,
                                    count: &str,
                                    body: &[Statement],
                                    line: usize)
                                    -> EvalResult<Flow> {
        let count_value = self.eval_expression(count, line)?;
        let count = count_value.as_integer(line).map_err(|_| RuntimeError::TypeError {
            details: "The 'repeat ... times' value must be a whole number".to_string(),
            line,
        })?;
        if count < 0 {
            return Err(RuntimeError::TypeError { details: "The repeat count must be zero or greater".to_string(),
                                                 line });
        }

        let mut iterations = 0_u64;
        for _ in 0..count {
            self.bump_loop_counter(&mut iterations, line)?;
            match self.exec_block(body)? {
                Flow::Normal | Flow::Continue(_) => {},
                Flow::Break(_) => break,
                flow @ Flow::Return(..) => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    /// Executes `repeat while C`, re-checking the condition before every
    /// iteration.
    pub(crate) fn exec_repeat_while(&mut self,
                                    condition: &Condition,
                                    body: &[Statement],
                                    line: usize)
                                    -> EvalResult<Flow> {
        let mut iterations = 0_u64;
        while self.eval_condition(condition)? {
            self.bump_loop_counter(&mut iterations, line)?;
            match self.exec_block(body)? {
                Flow::Normal | Flow::Continue(_) => {},
                Flow::Break(_) => break,
                flow @ Flow::Return(..) => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    /// Executes `for each X in E` over a list's elements or a text's
    /// characters.
    ///
    /// List iteration is by index against the live list, so elements
    /// appended during the loop are visited too; the runaway-loop cap keeps
    /// self-feeding loops from running forever.
    pub(crate) fn exec_for_each(&mut self,
                                item: &str,
                                iterable: &str,
                                body: &[Statement],
                                line: usize)
                                -> EvalResult<Flow> {
        let iterable = self.eval_expression(iterable, line)?;
        let mut iterations = 0_u64;

        match iterable {
            Value::List(items) => {
                let mut index = 0;
                loop {
                    let element = {
                        let items = items.borrow();
                        match items.get(index) {
                            Some(element) => element.clone(),
                            None => break,
                        }
                    };
                    index += 1;

                    self.bump_loop_counter(&mut iterations, line)?;
                    self.define_local(item, element);
                    match self.exec_block(body)? {
                        Flow::Normal | Flow::Continue(_) => {},
                        Flow::Break(_) => break,
                        flow @ Flow::Return(..) => return Ok(flow),
                    }
                }
            },

            Value::Text(text) => {
                for ch in text.chars() {
                    self.bump_loop_counter(&mut iterations, line)?;
                    self.define_local(item, Value::Text(ch.to_string()));
                    match self.exec_block(body)? {
                        Flow::Normal | Flow::Continue(_) => {},
                        Flow::Break(_) => break,
                        flow @ Flow::Return(..) => return Ok(flow),
                    }
                }
            },

            other => {
                return Err(RuntimeError::TypeError { details: format!("I can only loop over a list or text, not {}",
                                                                      other.type_name()),
                                                     line });
            },
        }

        Ok(Flow::Normal)
    }

    /// Evaluates a folded condition to a boolean.
    pub(crate) fn eval_condition(&mut self, condition: &Condition) -> EvalResult<bool> {
        let line = condition.line;
        let left = self.eval_expression(&condition.left, line)?;

        if condition.op == ComparisonOp::Truthy {
            return Ok(left.is_truthy());
        }

        let right = match &condition.right {
            Some(right) => self.eval_expression(right, line)?,
            None => Value::Nothing,
        };

        Ok(match condition.op {
            ComparisonOp::Greater => compare_order(&left, &right, line)?.is_gt(),
            ComparisonOp::Less => compare_order(&left, &right, line)?.is_lt(),
            ComparisonOp::GreaterEqual => compare_order(&left, &right, line)?.is_ge(),
            ComparisonOp::LessEqual => compare_order(&left, &right, line)?.is_le(),
            ComparisonOp::Equal => left.loosely_equals(&right),
            ComparisonOp::NotEqual => !left.loosely_equals(&right),
            ComparisonOp::Contains => value_contains(&left, &right, line)?,
            ComparisonOp::NotContains => !value_contains(&left, &right, line)?,
            ComparisonOp::Truthy => unreachable!("handled above"),
        })
    }

    /// Counts one more iteration of the current loop, failing once the
    /// configured cap is exceeded.
    ///
    /// The check happens before the body entry that would overrun the cap,
    /// so the body never runs a capped iteration.
    fn bump_loop_counter(&self, iterations: &mut u64, line: usize) -> EvalResult<()> {
        *iterations += 1;
        if *iterations > self.max_loop_iterations {
            return Err(RuntimeError::RunawayLoop { line });
        }
        Ok(())
    }
}
