use crate::{
    ast::{Condition, FunctionDef, IfBranch, LoopCtrl, MutOp, Statement},
    error::ParseError,
    interpreter::{
        lexer::LineToken,
        parser::{
            condition::parse_condition,
            core::{BlockEnd, ParseResult, Parser},
            suggest::suggest,
            utils::{
                Word, is_identifier, scan_words, split_arguments, split_parameters,
                validate_expression_text,
            },
        },
    },
};

/// The canonical statement form an opener phrase folds into.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Opener {
    Assign,
    Say,
    Ask,
    CreateList,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remove,
    If,
    RepeatWhile,
    RepeatCount,
    ForEach,
    Define,
    Stop,
    Skip,
    Return,
    Call,
}

/// Every opener phrasing the language accepts, folded onto its canonical
/// form.
///
/// Multi-word phrases come before any one-word phrase they start with, so
/// `repeat while` wins over `repeat`. All synonym knowledge lives in this one
/// table; the per-form parsers below only deal in canonical forms plus the
/// word shape the matched alias implies (`set ... to` vs `let ... be`).
const OPENERS: &[(&[&str], Opener)] = &[
    (&["create", "list"], Opener::CreateList),
    (&["make", "list"], Opener::CreateList),
    (&["repeat", "while"], Opener::RepeatWhile),
    (&["for", "each"], Opener::ForEach),
    (&["for", "every"], Opener::ForEach),
    (&["give", "back"], Opener::Return),
    (&["set"], Opener::Assign),
    (&["let"], Opener::Assign),
    (&["put"], Opener::Assign),
    (&["say"], Opener::Say),
    (&["print"], Opener::Say),
    (&["show"], Opener::Say),
    (&["ask"], Opener::Ask),
    (&["add"], Opener::Add),
    (&["increase"], Opener::Add),
    (&["subtract"], Opener::Subtract),
    (&["decrease"], Opener::Subtract),
    (&["multiply"], Opener::Multiply),
    (&["divide"], Opener::Divide),
    (&["remove"], Opener::Remove),
    (&["take"], Opener::Remove),
    (&["if"], Opener::If),
    (&["when"], Opener::If),
    (&["while"], Opener::RepeatWhile),
    (&["repeat"], Opener::RepeatCount),
    (&["do"], Opener::RepeatCount),
    (&["define"], Opener::Define),
    (&["function"], Opener::Define),
    (&["stop"], Opener::Stop),
    (&["break"], Opener::Stop),
    (&["skip"], Opener::Skip),
    (&["next"], Opener::Skip),
    (&["return"], Opener::Return),
    (&["call"], Opener::Call),
    (&["run"], Opener::Call),
];

/// Terminators accepted while parsing an `if` or `otherwise if` body.
const IF_TERMINATORS: &[&str] = &["end if", "otherwise", "otherwise if"];

impl Parser {
    /// Parses one statement, recursing into [`Parser::parse_block`] for
    /// block openers.
    ///
    /// The leading words select a canonical form through the opener table;
    /// the matched sub-parser then takes the whole line apart. A line that
    /// matches no opener but looks like `name(...)` becomes a bare
    /// expression statement; anything else is an unknown statement with a
    /// typo suggestion when one is close enough.
    pub(crate) fn parse_statement(&mut self, token: &LineToken) -> ParseResult<Statement> {
        let text = token.text.as_str();
        let line = token.line;
        let words = scan_words(text);

        for (phrase, opener) in OPENERS {
            if !phrase_matches(&words, phrase) {
                continue;
            }
            let first = words[0].text.to_lowercase();
            return self.parse_opener(*opener, &first, text, &words, line);
        }

        if looks_like_bare_call(text) {
            validate_expression_text(text, line)?;
            return Ok(Statement::ExprStmt { expression: text.to_string(),
                                            line });
        }

        Err(unknown(text, line))
    }

    /// Routes a matched opener to its sub-parser.
    fn parse_opener(&mut self,
                    opener: Opener,
                    first: &str,
                    text: &str,
                    words: &[Word<'_>],
                    line: usize)
                    -> ParseResult<Statement> {
        match opener {
            Opener::Assign => parse_assign(first, text, words, line),
            Opener::Say => parse_say(text, words, line),
            Opener::Ask => parse_ask(text, words, line),
            Opener::CreateList => parse_create_list(text, words, line),
            Opener::Add => parse_math(MutOp::Add, first == "add", text, words, line),
            Opener::Subtract => parse_math(MutOp::Subtract, first == "subtract", text, words, line),
            Opener::Multiply => parse_math(MutOp::Multiply, false, text, words, line),
            Opener::Divide => parse_math(MutOp::Divide, false, text, words, line),
            Opener::Remove => parse_remove(text, words, line),
            Opener::If => self.parse_if(text, words, line),
            Opener::RepeatWhile => self.parse_repeat_while(first, text, words, line),
            Opener::RepeatCount => self.parse_repeat_count(text, words, line),
            Opener::ForEach => self.parse_for_each(text, words, line),
            Opener::Define => self.parse_define(text, words, line),
            Opener::Stop => parse_loop_ctrl(LoopCtrl::Stop, first, text, words, line),
            Opener::Skip => parse_loop_ctrl(LoopCtrl::Skip, first, text, words, line),
            Opener::Return => parse_return(first, text, words, line),
            Opener::Call => parse_call(text, words, line),
        }
    }

    /// Parses a full `if` / `otherwise if` / `otherwise` / `end if` chain.
    ///
    /// Branch accumulation follows the closer returned by each body:
    /// `otherwise if` opens another arm, `otherwise` opens the final else
    /// body (after which only `end if` is legal), and `end if` closes the
    /// chain.
    fn parse_if(&mut self, text: &str, words: &[Word<'_>], line: usize) -> ParseResult<Statement> {
        if words.len() < 3 || !last_word_is(words, "then") {
            return Err(unknown(text, line));
        }

        let condition_text = &text[words[0].end..words[words.len() - 1].start];
        let condition = parse_condition(condition_text, line)?;

        let (body, end) = self.parse_block(IF_TERMINATORS)?;
        let mut branches = vec![IfBranch { condition,
                                           body,
                                           line }];
        let mut end = require_end(end);

        while end.canonical.starts_with("otherwise if ") {
            let (condition, branch_line) = parse_branch_header(&end)?;
            let (body, next_end) = self.parse_block(IF_TERMINATORS)?;
            branches.push(IfBranch { condition,
                                     body,
                                     line: branch_line });
            end = require_end(next_end);
        }

        let else_body = if end.canonical == "otherwise" {
            let (body, _) = self.parse_block(&["end if"])?;
            Some(body)
        } else {
            None
        };

        Ok(Statement::If { branches,
                           else_body,
                           line })
    }

    /// Parses `repeat while C` or `while C do`.
    fn parse_repeat_while(&mut self,
                          first: &str,
                          text: &str,
                          words: &[Word<'_>],
                          line: usize)
                          -> ParseResult<Statement> {
        let condition_text = if first == "repeat" {
            if words.len() < 3 {
                return Err(ParseError::MalformedCondition { detail: "I expected a condition after 'repeat while'."
                                                                        .to_string(),
                                                            line });
            }
            &text[words[1].end..]
        } else {
            // `while C do`
            if words.len() < 3 || !last_word_is(words, "do") {
                return Err(unknown(text, line));
            }
            &text[words[0].end..words[words.len() - 1].start]
        };

        let condition = parse_condition(condition_text, line)?;
        let (body, _) = self.parse_block(&["end repeat"])?;
        Ok(Statement::RepeatWhile { condition,
                                    body,
                                    line })
    }

    /// Parses `repeat N times` or `do N times`.
    fn parse_repeat_count(&mut self,
                          text: &str,
                          words: &[Word<'_>],
                          line: usize)
                          -> ParseResult<Statement> {
        if words.len() < 3 || !last_word_is(words, "times") {
            return Err(unknown(text, line));
        }

        let count = text[words[0].end..words[words.len() - 1].start].trim();
        validate_expression_text(count, line)?;

        let (body, _) = self.parse_block(&["end repeat"])?;
        Ok(Statement::RepeatCount { count: count.to_string(),
                                    body,
                                    line })
    }

    /// Parses `for each X in E` or `for every X in E`.
    fn parse_for_each(&mut self,
                      text: &str,
                      words: &[Word<'_>],
                      line: usize)
                      -> ParseResult<Statement> {
        if words.len() < 5
           || !is_identifier(words[2].text)
           || !words[3].text.eq_ignore_ascii_case("in")
        {
            return Err(unknown(text, line));
        }

        let iterable = text[words[3].end..].trim();
        validate_expression_text(iterable, line)?;

        let (body, _) = self.parse_block(&["end for"])?;
        Ok(Statement::ForEach { item: words[2].text.to_string(),
                                iterable: iterable.to_string(),
                                body,
                                line })
    }

    /// Parses `define F [with params]` or `function F [with params]`.
    fn parse_define(&mut self,
                    text: &str,
                    words: &[Word<'_>],
                    line: usize)
                    -> ParseResult<Statement> {
        if words.len() < 2 || !is_identifier(words[1].text) {
            return Err(unknown(text, line));
        }

        let params = if words.len() == 2 {
            Vec::new()
        } else if words[2].text.eq_ignore_ascii_case("with") {
            split_parameters(&text[words[2].end..], line)?
        } else {
            return Err(unknown(text, line));
        };

        let (body, _) = self.parse_block(&["end define"])?;
        Ok(Statement::DefineFn(FunctionDef { name: words[1].text.to_string(),
                                             params,
                                             body,
                                             line }))
    }
}

/// Builds the standard unknown-statement error, with a typo suggestion when
/// the first word or two is close to a known opener.
fn unknown(text: &str, line: usize) -> ParseError {
    ParseError::UnknownStatement { text:       text.to_string(),
                                   suggestion: suggest(text),
                                   line }
}

/// Unwraps the closer of a block parsed with a non-empty terminator set.
fn require_end(end: Option<BlockEnd>) -> BlockEnd {
    match end {
        Some(end) => end,
        // parse_block only returns None for the top-level (terminator-free)
        // block; every `if` body is parsed with terminators.
        None => unreachable!("block with terminators ended without a closer"),
    }
}

/// Tests whether the line's leading words match an opener phrase.
fn phrase_matches(words: &[Word<'_>], phrase: &[&str]) -> bool {
    words.len() >= phrase.len()
    && phrase.iter().zip(words).all(|(p, w)| w.text.eq_ignore_ascii_case(p))
}

/// Tests whether the line's final word equals `keyword`.
fn last_word_is(words: &[Word<'_>], keyword: &str) -> bool {
    words.last().is_some_and(|w| w.text.eq_ignore_ascii_case(keyword))
}

/// Extracts the condition from an `otherwise if C then` (or `or if C then`)
/// closer, preserving the condition's original casing.
fn parse_branch_header(end: &BlockEnd) -> ParseResult<(Condition, usize)> {
    let words = scan_words(&end.raw);
    if words.len() < 4 || !last_word_is(&words, "then") {
        return Err(ParseError::MalformedCondition { detail: "I expected 'otherwise if ... then' or 'or if ... then'."
                                                                .to_string(),
                                                    line:   end.line, });
    }

    let condition_text = &end.raw[words[1].end..words[words.len() - 1].start];
    let condition = parse_condition(condition_text, end.line)?;
    Ok((condition, end.line))
}

/// Parses the three assignment phrasings: `set X to E`, `let X be E`, and
/// `put E into X`.
fn parse_assign(first: &str,
                text: &str,
                words: &[Word<'_>],
                line: usize)
                -> ParseResult<Statement> {
    if words.len() < 4 {
        return Err(unknown(text, line));
    }

    let (name, expression) = if first == "put" {
        let last = words[words.len() - 1];
        if !words[words.len() - 2].text.eq_ignore_ascii_case("into") || !is_identifier(last.text) {
            return Err(unknown(text, line));
        }
        (last.text, text[words[0].end..words[words.len() - 2].start].trim())
    } else {
        let joiner = if first == "set" { "to" } else { "be" };
        if !is_identifier(words[1].text) || !words[2].text.eq_ignore_ascii_case(joiner) {
            return Err(unknown(text, line));
        }
        (words[1].text, text[words[2].end..].trim())
    };

    validate_expression_text(expression, line)?;
    Ok(Statement::Assign { name: name.to_string(),
                           expression: expression.to_string(),
                           line })
}

/// Parses `say E` and its aliases.
fn parse_say(text: &str, words: &[Word<'_>], line: usize) -> ParseResult<Statement> {
    if words.len() < 2 {
        return Err(unknown(text, line));
    }

    let expression = text[words[0].end..].trim();
    validate_expression_text(expression, line)?;
    Ok(Statement::Say { expression: expression.to_string(),
                        line })
}

/// Parses `ask E and store in X`, accepting `save` for `store` and `as` for
/// `in`.
fn parse_ask(text: &str, words: &[Word<'_>], line: usize) -> ParseResult<Statement> {
    let n = words.len();
    if n < 5 {
        return Err(unknown(text, line));
    }

    let shape_ok = words[n - 4].text.eq_ignore_ascii_case("and")
                   && (words[n - 3].text.eq_ignore_ascii_case("store")
                       || words[n - 3].text.eq_ignore_ascii_case("save"))
                   && (words[n - 2].text.eq_ignore_ascii_case("in")
                       || words[n - 2].text.eq_ignore_ascii_case("as"))
                   && is_identifier(words[n - 1].text);
    if !shape_ok {
        return Err(unknown(text, line));
    }

    let prompt = text[words[0].end..words[n - 4].start].trim();
    if prompt.is_empty() {
        return Err(unknown(text, line));
    }

    validate_expression_text(prompt, line)?;
    Ok(Statement::Ask { prompt: prompt.to_string(),
                        target: words[n - 1].text.to_string(),
                        line })
}

/// Parses `create list X` / `make list X`.
fn parse_create_list(text: &str, words: &[Word<'_>], line: usize) -> ParseResult<Statement> {
    if words.len() != 3 || !is_identifier(words[2].text) {
        return Err(unknown(text, line));
    }
    Ok(Statement::ListCreate { name: words[2].text.to_string(),
                               line })
}

/// Parses the in-place math family.
///
/// `tail_target` selects the shape: `add E to X` / `subtract E from X` put
/// the target last, while `increase X by E` / `multiply X by E` put it
/// second.
fn parse_math(op: MutOp,
              tail_target: bool,
              text: &str,
              words: &[Word<'_>],
              line: usize)
              -> ParseResult<Statement> {
    if words.len() < 4 {
        return Err(unknown(text, line));
    }

    let (target, operand) = if tail_target {
        let joiner = if op == MutOp::Add { "to" } else { "from" };
        let last = words[words.len() - 1];
        if !words[words.len() - 2].text.eq_ignore_ascii_case(joiner) || !is_identifier(last.text) {
            return Err(unknown(text, line));
        }
        (last.text, text[words[0].end..words[words.len() - 2].start].trim())
    } else {
        if !is_identifier(words[1].text) || !words[2].text.eq_ignore_ascii_case("by") {
            return Err(unknown(text, line));
        }
        (words[1].text, text[words[2].end..].trim())
    };

    validate_expression_text(operand, line)?;
    Ok(Statement::MathMut { op,
                            target: target.to_string(),
                            operand: operand.to_string(),
                            line })
}

/// Parses `remove E from X` / `take E from X`.
fn parse_remove(text: &str, words: &[Word<'_>], line: usize) -> ParseResult<Statement> {
    let n = words.len();
    if n < 4 || !words[n - 2].text.eq_ignore_ascii_case("from") || !is_identifier(words[n - 1].text)
    {
        return Err(unknown(text, line));
    }

    let value = text[words[0].end..words[n - 2].start].trim();
    validate_expression_text(value, line)?;
    Ok(Statement::ListRemove { target: words[n - 1].text.to_string(),
                               value: value.to_string(),
                               line })
}

/// Parses `stop` / `skip` and their aliases, with an optional trailing
/// `loop`, `repeat`, or `for`.
fn parse_loop_ctrl(ctrl: LoopCtrl,
                   first: &str,
                   text: &str,
                   words: &[Word<'_>],
                   line: usize)
                   -> ParseResult<Statement> {
    let tail_ok = match words.len() {
        1 => true,
        2 => {
            let tail = words[1].text;
            if first == "break" || first == "next" {
                tail.eq_ignore_ascii_case("loop")
            } else {
                tail.eq_ignore_ascii_case("loop")
                || tail.eq_ignore_ascii_case("repeat")
                || tail.eq_ignore_ascii_case("for")
            }
        },
        _ => false,
    };

    if !tail_ok {
        return Err(unknown(text, line));
    }
    Ok(Statement::Loop { ctrl, line })
}

/// Parses `return [E]` / `give back [E]`.
fn parse_return(first: &str,
                text: &str,
                words: &[Word<'_>],
                line: usize)
                -> ParseResult<Statement> {
    let keyword_words = if first == "give" { 2 } else { 1 };
    let expression = if words.len() > keyword_words {
        let expression = text[words[keyword_words - 1].end..].trim();
        validate_expression_text(expression, line)?;
        Some(expression.to_string())
    } else {
        None
    };

    Ok(Statement::Return { expression, line })
}

/// Parses `call F [with args]` / `run F [with args]` in statement position.
fn parse_call(text: &str, words: &[Word<'_>], line: usize) -> ParseResult<Statement> {
    if words.len() < 2 || !is_identifier(words[1].text) {
        return Err(unknown(text, line));
    }

    let arguments = if words.len() == 2 {
        Vec::new()
    } else if words[2].text.eq_ignore_ascii_case("with") {
        let arguments = split_arguments(&text[words[2].end..]);
        for argument in &arguments {
            validate_expression_text(argument, line)?;
        }
        arguments
    } else {
        return Err(unknown(text, line));
    };

    Ok(Statement::CallStmt { name: words[1].text.to_string(),
                             arguments,
                             line })
}

/// Tests whether an unmatched line has the `name(...)` shape of a bare call.
fn looks_like_bare_call(text: &str) -> bool {
    let Some(open) = text.find('(') else {
        return false;
    };
    text.ends_with(')') && is_identifier(text[..open].trim_end())
}
