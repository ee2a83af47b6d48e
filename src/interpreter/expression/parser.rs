use std::iter::Peekable;

use logos::Logos;

use crate::{
    ast::{BinaryOperator, Expr, LiteralValue, UnaryOperator},
    interpreter::expression::lexer::Token,
};

/// Errors produced while reading an expression's token stream.
///
/// These stay internal to expression parsing: the evaluator converts them
/// into a `RuntimeError` carrying the enclosing statement's line and the
/// original expression text.
#[derive(Debug)]
pub enum ExprError {
    /// A token appeared somewhere it cannot.
    UnexpectedToken(String),
    /// The expression stopped in the middle of a construct.
    UnexpectedEnd,
    /// Extra tokens followed a complete expression.
    TrailingTokens(String),
    /// A character the expression language does not use at all.
    UnknownCharacter(String),
}

type TokenStream = Peekable<std::vec::IntoIter<Token>>;
type ExprResult<T> = Result<T, ExprError>;

/// Lexes and parses one expression string into an expression tree.
///
/// The whole input must be a single expression; anything left over after
/// parsing is an error.
///
/// # Errors
/// Returns an [`ExprError`] when the text cannot be tokenized or does not
/// form exactly one expression.
///
/// # Example
/// ```
/// use plaintalk::{ast::Expr, interpreter::expression::parser::parse_expression_text};
///
/// let expr = parse_expression_text("x + 5").unwrap();
/// assert!(matches!(expr, Expr::Binary { .. }));
/// ```
pub fn parse_expression_text(text: &str) -> ExprResult<Expr> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(text);
    while let Some(token) = lexer.next() {
        match token {
            Ok(tok) => tokens.push(tok),
            Err(()) => return Err(ExprError::UnknownCharacter(lexer.slice().to_string())),
        }
    }

    let mut stream: TokenStream = tokens.into_iter().peekable();
    let expr = parse_expression(&mut stream)?;

    match stream.next() {
        Some(tok) => Err(ExprError::TrailingTokens(describe(&tok))),
        None => Ok(expr),
    }
}

/// Parses a full expression, starting at the lowest precedence level.
///
/// Grammar: `expression := or`
fn parse_expression(tokens: &mut TokenStream) -> ExprResult<Expr> {
    parse_or(tokens)
}

/// Parses a left-associative `or` chain.
///
/// Grammar: `or := and ("or" and)*`
fn parse_or(tokens: &mut TokenStream) -> ExprResult<Expr> {
    let mut left = parse_and(tokens)?;
    while let Some(Token::Or) = tokens.peek() {
        tokens.next();
        let right = parse_and(tokens)?;
        left = Expr::Binary { left:  Box::new(left),
                              op:    BinaryOperator::Or,
                              right: Box::new(right), };
    }
    Ok(left)
}

/// Parses a left-associative `and` chain.
///
/// Grammar: `and := not ("and" not)*`
fn parse_and(tokens: &mut TokenStream) -> ExprResult<Expr> {
    let mut left = parse_not(tokens)?;
    while let Some(Token::And) = tokens.peek() {
        tokens.next();
        let right = parse_not(tokens)?;
        left = Expr::Binary { left:  Box::new(left),
                              op:    BinaryOperator::And,
                              right: Box::new(right), };
    }
    Ok(left)
}

/// Parses a prefix `not`, which binds tighter than `and`/`or` but looser than
/// comparisons.
///
/// Grammar: `not := "not" not | comparison`
fn parse_not(tokens: &mut TokenStream) -> ExprResult<Expr> {
    if let Some(Token::Not) = tokens.peek() {
        tokens.next();
        let expr = parse_not(tokens)?;
        return Ok(Expr::Unary { op:   UnaryOperator::Not,
                                expr: Box::new(expr), });
    }
    parse_comparison(tokens)
}

/// Parses a single (non-chaining) comparison.
///
/// Grammar: `comparison := additive (cmp_op additive)?`
fn parse_comparison(tokens: &mut TokenStream) -> ExprResult<Expr> {
    let left = parse_additive(tokens)?;

    let op = match tokens.peek() {
        Some(Token::Less) => BinaryOperator::Less,
        Some(Token::Greater) => BinaryOperator::Greater,
        Some(Token::LessEqual) => BinaryOperator::LessEqual,
        Some(Token::GreaterEqual) => BinaryOperator::GreaterEqual,
        Some(Token::EqualEqual) => BinaryOperator::Equal,
        Some(Token::BangEqual) => BinaryOperator::NotEqual,
        _ => return Ok(left),
    };
    tokens.next();

    let right = parse_additive(tokens)?;
    Ok(Expr::Binary { left:  Box::new(left),
                      op,
                      right: Box::new(right), })
}

/// Parses addition and subtraction.
///
/// Grammar: `additive := multiplicative (("+" | "-") multiplicative)*`
fn parse_additive(tokens: &mut TokenStream) -> ExprResult<Expr> {
    let mut left = parse_multiplicative(tokens)?;
    loop {
        let op = match tokens.peek() {
            Some(Token::Plus) => BinaryOperator::Add,
            Some(Token::Minus) => BinaryOperator::Sub,
            _ => break,
        };
        tokens.next();
        let right = parse_multiplicative(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right) };
    }
    Ok(left)
}

/// Parses multiplication, division, and remainder.
///
/// Grammar: `multiplicative := unary (("*" | "/" | "%") unary)*`
fn parse_multiplicative(tokens: &mut TokenStream) -> ExprResult<Expr> {
    let mut left = parse_unary(tokens)?;
    loop {
        let op = match tokens.peek() {
            Some(Token::Star) => BinaryOperator::Mul,
            Some(Token::Slash) => BinaryOperator::Div,
            Some(Token::Percent) => BinaryOperator::Mod,
            _ => break,
        };
        tokens.next();
        let right = parse_unary(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right) };
    }
    Ok(left)
}

/// Parses a prefix minus.
///
/// Grammar: `unary := "-" unary | postfix`
fn parse_unary(tokens: &mut TokenStream) -> ExprResult<Expr> {
    if let Some(Token::Minus) = tokens.peek() {
        tokens.next();
        let expr = parse_unary(tokens)?;
        return Ok(Expr::Unary { op:   UnaryOperator::Negate,
                                expr: Box::new(expr), });
    }
    parse_postfix(tokens)
}

/// Parses call, index, and slice suffixes after a primary expression.
///
/// Grammar: `postfix := primary ("(" args ")" | "[" index_or_slice "]")*`
///
/// Only a bare name can be called; indexing and slicing apply to any value.
fn parse_postfix(tokens: &mut TokenStream) -> ExprResult<Expr> {
    let mut expr = parse_primary(tokens)?;

    loop {
        match tokens.peek() {
            Some(Token::LParen) => {
                tokens.next();
                let Expr::Variable(name) = expr else {
                    return Err(ExprError::UnexpectedToken("(".to_string()));
                };
                let arguments = parse_comma_separated(tokens, &Token::RParen)?;
                expr = Expr::Call { name, arguments };
            },
            Some(Token::LBracket) => {
                tokens.next();
                expr = parse_index_or_slice(tokens, expr)?;
            },
            _ => break,
        }
    }

    Ok(expr)
}

/// Parses the inside of `a[...]`: either an index or a slice with optional
/// bounds.
fn parse_index_or_slice(tokens: &mut TokenStream, target: Expr) -> ExprResult<Expr> {
    // A leading ':' means the start bound is omitted.
    if let Some(Token::Colon) = tokens.peek() {
        tokens.next();
        let end = parse_optional_bound(tokens)?;
        expect(tokens, &Token::RBracket)?;
        return Ok(Expr::Slice { target: Box::new(target),
                                start:  None,
                                end, });
    }

    let first = parse_expression(tokens)?;
    match tokens.next() {
        Some(Token::RBracket) => Ok(Expr::Index { target: Box::new(target),
                                                  index:  Box::new(first), }),
        Some(Token::Colon) => {
            let end = parse_optional_bound(tokens)?;
            expect(tokens, &Token::RBracket)?;
            Ok(Expr::Slice { target: Box::new(target),
                             start:  Some(Box::new(first)),
                             end, })
        },
        Some(tok) => Err(ExprError::UnexpectedToken(describe(&tok))),
        None => Err(ExprError::UnexpectedEnd),
    }
}

/// Parses the end bound of a slice, which may be omitted before `]`.
fn parse_optional_bound(tokens: &mut TokenStream) -> ExprResult<Option<Box<Expr>>> {
    if let Some(Token::RBracket) = tokens.peek() {
        return Ok(None);
    }
    Ok(Some(Box::new(parse_expression(tokens)?)))
}

/// Parses a primary expression: a literal, a name, a parenthesized
/// expression, or a list literal.
fn parse_primary(tokens: &mut TokenStream) -> ExprResult<Expr> {
    match tokens.next() {
        Some(Token::Integer(n)) => Ok(Expr::Literal(LiteralValue::Integer(n))),
        Some(Token::Real(r)) => Ok(Expr::Literal(LiteralValue::Real(r))),
        Some(Token::Text(s)) => Ok(Expr::Literal(LiteralValue::Text(s))),
        Some(Token::Bool(b)) => Ok(Expr::Literal(LiteralValue::Bool(b))),
        Some(Token::Nothing) => Ok(Expr::Literal(LiteralValue::Nothing)),
        Some(Token::Identifier(name)) => Ok(Expr::Variable(name)),
        Some(Token::LParen) => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen)?;
            Ok(expr)
        },
        Some(Token::LBracket) => {
            let elements = parse_comma_separated(tokens, &Token::RBracket)?;
            Ok(Expr::ListLiteral(elements))
        },
        Some(tok) => Err(ExprError::UnexpectedToken(describe(&tok))),
        None => Err(ExprError::UnexpectedEnd),
    }
}

/// Parses a comma-separated expression list terminated by `closing`.
///
/// An immediately encountered closing token produces an empty list. The
/// closing token is consumed.
fn parse_comma_separated(tokens: &mut TokenStream, closing: &Token) -> ExprResult<Vec<Expr>> {
    let mut items = Vec::new();
    if tokens.peek() == Some(closing) {
        tokens.next();
        return Ok(items);
    }
    loop {
        items.push(parse_expression(tokens)?);
        match tokens.next() {
            Some(Token::Comma) => {},
            Some(tok) if &tok == closing => break,
            Some(tok) => return Err(ExprError::UnexpectedToken(describe(&tok))),
            None => return Err(ExprError::UnexpectedEnd),
        }
    }
    Ok(items)
}

/// Consumes the next token, which must equal `expected`.
fn expect(tokens: &mut TokenStream, expected: &Token) -> ExprResult<()> {
    match tokens.next() {
        Some(tok) if &tok == expected => Ok(()),
        Some(tok) => Err(ExprError::UnexpectedToken(describe(&tok))),
        None => Err(ExprError::UnexpectedEnd),
    }
}

/// Renders a token for an error message.
fn describe(token: &Token) -> String {
    match token {
        Token::Integer(n) => n.to_string(),
        Token::Real(r) => r.to_string(),
        Token::Text(s) => format!("\"{s}\""),
        Token::Bool(b) => b.to_string(),
        Token::Nothing => "nothing".to_string(),
        Token::And => "and".to_string(),
        Token::Or => "or".to_string(),
        Token::Not => "not".to_string(),
        Token::Identifier(name) => name.clone(),
        Token::Plus => "+".to_string(),
        Token::Minus => "-".to_string(),
        Token::Star => "*".to_string(),
        Token::Slash => "/".to_string(),
        Token::Percent => "%".to_string(),
        Token::LParen => "(".to_string(),
        Token::RParen => ")".to_string(),
        Token::LBracket => "[".to_string(),
        Token::RBracket => "]".to_string(),
        Token::Comma => ",".to_string(),
        Token::Colon => ":".to_string(),
        Token::EqualEqual => "==".to_string(),
        Token::BangEqual => "!=".to_string(),
        Token::LessEqual => "<=".to_string(),
        Token::GreaterEqual => ">=".to_string(),
        Token::Less => "<".to_string(),
        Token::Greater => ">".to_string(),
        Token::Ignored => " ".to_string(),
    }
}
