use crate::{
    ast::{ComparisonOp, Condition},
    error::ParseError,
    interpreter::parser::utils::{Word, scan_words, validate_expression_text},
};

/// Condition phrasings in matching priority order.
///
/// Longer phrases come first so that `is greater than or equal to` wins over
/// `is greater than`, and `is not equal to` over `is not`.
const CONDITION_PHRASES: &[(&[&str], ComparisonOp)] = &[
    (&["is", "greater", "than", "or", "equal", "to"], ComparisonOp::GreaterEqual),
    (&["is", "less", "than", "or", "equal", "to"], ComparisonOp::LessEqual),
    (&["is", "not", "equal", "to"], ComparisonOp::NotEqual),
    (&["is", "equal", "to"], ComparisonOp::Equal),
    (&["is", "at", "least"], ComparisonOp::GreaterEqual),
    (&["is", "at", "most"], ComparisonOp::LessEqual),
    (&["does", "not", "contain"], ComparisonOp::NotContains),
    (&["contains"], ComparisonOp::Contains),
    (&["is", "greater", "than"], ComparisonOp::Greater),
    (&["is", "bigger", "than"], ComparisonOp::Greater),
    (&["is", "less", "than"], ComparisonOp::Less),
    (&["is", "smaller", "than"], ComparisonOp::Less),
    (&["equals"], ComparisonOp::Equal),
    (&["is", "not"], ComparisonOp::NotEqual),
];

/// Folds an English condition into a [`Condition`].
///
/// Phrases are matched quote-aware (a keyword inside a text literal never
/// splits the condition) and at their leftmost occurrence. A condition with
/// no comparison phrase is kept whole and evaluated for truthiness.
///
/// # Errors
/// - `ParseError::MalformedCondition` when a side of a comparison is empty.
/// - `ParseError::MalformedExpression` when a side has unbalanced brackets or
///   an unclosed quote.
pub(crate) fn parse_condition(text: &str, line: usize) -> Result<Condition, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::MalformedCondition { detail: "I expected a condition here.".to_string(),
                                                    line });
    }

    let words = scan_words(text);
    for (phrase, op) in CONDITION_PHRASES {
        let Some(index) = find_phrase(&words, phrase) else {
            continue;
        };

        let left = text[..words[index].start].trim();
        let right = text[words[index + phrase.len() - 1].end..].trim();
        if left.is_empty() || right.is_empty() {
            return Err(ParseError::MalformedCondition { detail: format!("I expected something on both sides of '{}'.",
                                                                        phrase.join(" ")),
                                                        line });
        }

        validate_expression_text(left, line)?;
        validate_expression_text(right, line)?;
        return Ok(Condition { left: left.to_string(),
                              op: *op,
                              right: Some(right.to_string()),
                              line });
    }

    validate_expression_text(text, line)?;
    Ok(Condition { left: text.to_string(),
                   op: ComparisonOp::Truthy,
                   right: None,
                   line })
}

/// Finds the leftmost run of words matching `phrase`, case-insensitively.
///
/// The phrase may not start at the first word (a comparison always has a left
/// side) and may not run past the last word.
fn find_phrase(words: &[Word<'_>], phrase: &[&str]) -> Option<usize> {
    if words.len() < phrase.len() + 1 {
        return None;
    }
    (1..=words.len() - phrase.len()).find(|&start| {
                                        phrase.iter()
                                              .zip(&words[start..])
                                              .all(|(p, w)| w.text.eq_ignore_ascii_case(p))
                                    })
}
