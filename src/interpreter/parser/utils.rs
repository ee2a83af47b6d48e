use crate::error::ParseError;

/// One whitespace-separated word of a statement line, with its byte span.
///
/// Quoted text counts as part of the word that contains it, spaces and all,
/// so keyword matching never looks inside a text literal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Word<'a> {
    /// Byte offset of the word's first character.
    pub start: usize,
    /// Byte offset one past the word's last character.
    pub end:   usize,
    /// The word itself.
    pub text:  &'a str,
}

/// Splits a line into words, treating quoted regions as opaque.
///
/// An unterminated quote swallows the rest of the line into one word; the
/// expression validator reports that case with a proper error message.
pub(crate) fn scan_words(text: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (index, ch) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        if ch == '"' || ch == '\'' {
            quote = Some(ch);
            if start.is_none() {
                start = Some(index);
            }
            continue;
        }

        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                words.push(Word { start: s,
                                  end:   index,
                                  text:  &text[s..index], });
            }
        } else if start.is_none() {
            start = Some(index);
        }
    }

    if let Some(s) = start {
        words.push(Word { start: s,
                          end:   text.len(),
                          text:  &text[s..], });
    }

    words
}

/// Lowercases and whitespace-normalizes a phrase for keyword comparison.
pub(crate) fn canonical(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Reports whether `text` is a valid variable or function name.
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits a `with ...` parameter list into names.
///
/// Parameters are separated by commas, or by the word `and` when no comma is
/// present; one header may not mix the two styles.
///
/// # Errors
/// - `ParseError::MixedParameterStyles` when both separators appear.
/// - `ParseError::BadParameterList` when a piece is not a valid name.
pub(crate) fn split_parameters(raw: &str, line: usize) -> Result<Vec<String>, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let has_comma = raw.contains(',');
    let has_and = raw.split_whitespace().any(|word| word.eq_ignore_ascii_case("and"));
    if has_comma && has_and {
        return Err(ParseError::MixedParameterStyles { line });
    }

    let parts: Vec<&str> = if has_comma {
        raw.split(',').map(str::trim).collect()
    } else {
        split_on_word(raw, "and")
    };

    let mut params = Vec::new();
    for part in parts {
        if part.is_empty() {
            continue;
        }
        if !is_identifier(part) {
            return Err(ParseError::BadParameterList { detail: format!("'{part}' is not a valid parameter name."),
                                                      line });
        }
        params.push(part.to_string());
    }

    Ok(params)
}

/// Splits text on every standalone occurrence of a separator word.
fn split_on_word<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let words = scan_words(text);
    let mut parts = Vec::new();
    let mut piece_start = 0;

    for word in &words {
        if word.text.eq_ignore_ascii_case(separator) {
            parts.push(text[piece_start..word.start].trim());
            piece_start = word.end;
        }
    }
    parts.push(text[piece_start..].trim());

    parts
}

/// Splits a `with ...` argument list on top-level commas.
///
/// Commas inside quotes, parentheses, or brackets do not split; each returned
/// piece is a complete expression text.
pub(crate) fn split_arguments(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let mut arguments = Vec::new();
    let mut chunk = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth = 0_usize;

    for ch in raw.chars() {
        if let Some(q) = quote {
            chunk.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                chunk.push(ch);
            },
            '(' | '[' => {
                depth += 1;
                chunk.push(ch);
            },
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                chunk.push(ch);
            },
            ',' if depth == 0 => {
                let candidate = chunk.trim();
                if !candidate.is_empty() {
                    arguments.push(candidate.to_string());
                }
                chunk.clear();
            },
            _ => chunk.push(ch),
        }
    }

    let candidate = chunk.trim();
    if !candidate.is_empty() {
        arguments.push(candidate.to_string());
    }

    arguments
}

/// Checks an embedded expression for balanced brackets and closed quotes.
///
/// The statement parser stores expressions as raw text for the evaluator, but
/// bracket and quote mistakes should still be reported at parse time with the
/// right line number.
///
/// # Errors
/// Returns `ParseError::MalformedExpression` describing the imbalance.
pub(crate) fn validate_expression_text(text: &str, line: usize) -> Result<(), ParseError> {
    let mut stack = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in text.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' | '[' => stack.push(ch),
            ')' => {
                if stack.pop() != Some('(') {
                    return Err(ParseError::MalformedExpression { detail: "There is a ')' with no matching '('.".to_string(),
                                                                 line });
                }
            },
            ']' => {
                if stack.pop() != Some('[') {
                    return Err(ParseError::MalformedExpression { detail: "There is a ']' with no matching '['.".to_string(),
                                                                 line });
                }
            },
            _ => {},
        }
    }

    if let Some(q) = quote {
        return Err(ParseError::MalformedExpression { detail: format!("A text literal is missing its closing {q}."),
                                                     line });
    }
    if let Some(open) = stack.pop() {
        return Err(ParseError::MalformedExpression { detail: format!("There is a '{open}' that is never closed."),
                                                     line });
    }

    Ok(())
}
