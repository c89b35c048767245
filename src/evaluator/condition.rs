use serde_json::{Number, Value};
use thiserror::Error;

use crate::evaluator::path::{PathError, Scope};
use crate::evaluator::type_coercion::{is_truthy, loosely_equal};

/// Why a condition string could not be evaluated. Callers that gate
/// rendering treat any of these as "render anyway".
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConditionError {
    #[error("condition parse error: {0}")]
    Parse(String),
    #[error("condition evaluation error: {0}")]
    Path(#[from] PathError),
}

// ================================
// Expression AST
// ================================

/// Leaf of a comparison: a dotted path into the scope or a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Path(String),
    Literal(Value),
}

/// Parsed condition expression.
///
/// Grammar, loosest-binding first (no parentheses, no arbitrary code):
///
/// ```text
/// or      := and ( "||" and )*
/// and     := cmp ( "&&" cmp )*
/// cmp     := operand ( ( "===" | "!==" ) operand )?
/// operand := quoted string | number | true | false | null | dotted path
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionExpr {
    Operand(Operand),
    Eq(Operand, Operand),
    Neq(Operand, Operand),
    And(Box<ConditionExpr>, Box<ConditionExpr>),
    Or(Box<ConditionExpr>, Box<ConditionExpr>),
}

// ================================
// Tokenizer
// ================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    AndAnd,
    OrOr,
    EqEq,
    NotEq,
    Str(String),
    Word(String),
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '$' | '-')
}

fn tokenize(input: &str) -> Result<Vec<Token>, ConditionError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        match c {
            '&' => {
                if chars.get(i + 1) == Some(&'&') {
                    tokens.push(Token::AndAnd);
                    i += 2;
                } else {
                    return Err(ConditionError::Parse("expected \"&&\"".to_string()));
                }
            }
            '|' => {
                if chars.get(i + 1) == Some(&'|') {
                    tokens.push(Token::OrOr);
                    i += 2;
                } else {
                    return Err(ConditionError::Parse("expected \"||\"".to_string()));
                }
            }
            '=' => {
                if chars.get(i + 1) == Some(&'=') && chars.get(i + 2) == Some(&'=') {
                    tokens.push(Token::EqEq);
                    i += 3;
                } else {
                    return Err(ConditionError::Parse("expected \"===\"".to_string()));
                }
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') && chars.get(i + 2) == Some(&'=') {
                    tokens.push(Token::NotEq);
                    i += 3;
                } else {
                    return Err(ConditionError::Parse("expected \"!==\"".to_string()));
                }
            }
            '\'' | '"' => {
                let quote = c;
                let mut text = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        Some(&ch) if ch == quote => {
                            i += 1;
                            break;
                        }
                        Some(&ch) => {
                            text.push(ch);
                            i += 1;
                        }
                        None => {
                            return Err(ConditionError::Parse(format!(
                                "unterminated string starting with {quote}"
                            )));
                        }
                    }
                }
                tokens.push(Token::Str(text));
            }
            _ if is_word_char(c) => {
                let start = i;
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                tokens.push(Token::Word(chars[start..i].iter().collect()));
            }
            other => {
                return Err(ConditionError::Parse(format!(
                    "unexpected character '{other}'"
                )));
            }
        }
    }

    Ok(tokens)
}

// ================================
// Parser
// ================================

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_or(&mut self) -> Result<ConditionExpr, ConditionError> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&Token::OrOr) {
            self.advance();
            let right = self.parse_and()?;
            left = ConditionExpr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<ConditionExpr, ConditionError> {
        let mut left = self.parse_cmp()?;
        while self.peek() == Some(&Token::AndAnd) {
            self.advance();
            let right = self.parse_cmp()?;
            left = ConditionExpr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_cmp(&mut self) -> Result<ConditionExpr, ConditionError> {
        let left = self.parse_operand()?;
        match self.peek() {
            Some(Token::EqEq) => {
                self.advance();
                let right = self.parse_operand()?;
                Ok(ConditionExpr::Eq(left, right))
            }
            Some(Token::NotEq) => {
                self.advance();
                let right = self.parse_operand()?;
                Ok(ConditionExpr::Neq(left, right))
            }
            _ => Ok(ConditionExpr::Operand(left)),
        }
    }

    fn parse_operand(&mut self) -> Result<Operand, ConditionError> {
        match self.advance() {
            Some(Token::Str(s)) => Ok(Operand::Literal(Value::String(s))),
            Some(Token::Word(w)) => Ok(classify_word(w)),
            Some(other) => Err(ConditionError::Parse(format!(
                "expected an operand, found {other:?}"
            ))),
            None => Err(ConditionError::Parse("expected an operand".to_string())),
        }
    }
}

/// A bare word is a keyword, a whole-word number, or a dotted path.
fn classify_word(word: String) -> Operand {
    match word.as_str() {
        "true" => return Operand::Literal(Value::Bool(true)),
        "false" => return Operand::Literal(Value::Bool(false)),
        "null" => return Operand::Literal(Value::Null),
        _ => {}
    }
    if let Ok(n) = word.parse::<f64>() {
        if let Some(num) = Number::from_f64(n) {
            return Operand::Literal(Value::Number(num));
        }
    }
    Operand::Path(word)
}

/// Parse a condition string into its expression tree.
pub fn parse_condition(input: &str) -> Result<ConditionExpr, ConditionError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ConditionError::Parse("empty condition".to_string()));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return Err(ConditionError::Parse(format!(
            "unexpected trailing tokens after position {}",
            parser.pos
        )));
    }
    Ok(expr)
}

// ================================
// Evaluation
// ================================

fn resolve_operand<'s>(
    operand: &'s Operand,
    scope: &'s Scope<'_>,
) -> Result<Option<&'s Value>, PathError> {
    match operand {
        Operand::Literal(value) => Ok(Some(value)),
        Operand::Path(path) => scope.resolve_strict(path),
    }
}

fn eval_expr(expr: &ConditionExpr, scope: &Scope<'_>) -> Result<bool, ConditionError> {
    match expr {
        ConditionExpr::Operand(operand) => {
            let value = resolve_operand(operand, scope)?;
            Ok(value.map(is_truthy).unwrap_or(false))
        }
        ConditionExpr::Eq(left, right) => Ok(loosely_equal(
            resolve_operand(left, scope)?,
            resolve_operand(right, scope)?,
        )),
        ConditionExpr::Neq(left, right) => Ok(!loosely_equal(
            resolve_operand(left, scope)?,
            resolve_operand(right, scope)?,
        )),
        ConditionExpr::And(left, right) => {
            Ok(eval_expr(left, scope)? && eval_expr(right, scope)?)
        }
        ConditionExpr::Or(left, right) => Ok(eval_expr(left, scope)? || eval_expr(right, scope)?),
    }
}

/// Evaluate a parsed expression against a scope.
pub fn evaluate_expr(expr: &ConditionExpr, scope: &Scope<'_>) -> Result<bool, ConditionError> {
    eval_expr(expr, scope)
}

/// Gate decision for a widget's `condition` string.
///
/// A blank condition always passes. A condition that fails to parse or
/// fails during evaluation also passes: a bad expression must never hide
/// a page, so the failure is logged and the widget renders.
pub fn evaluate_condition(input: &str, scope: &Scope<'_>) -> bool {
    if input.trim().is_empty() {
        tracing::debug!("blank condition, rendering widget");
        return true;
    }
    let expr = match parse_condition(input) {
        Ok(expr) => expr,
        Err(err) => {
            tracing::warn!(condition = %input, error = %err, "condition failed to parse, rendering widget anyway");
            return true;
        }
    };
    match eval_expr(&expr, scope) {
        Ok(pass) => pass,
        Err(err) => {
            tracing::warn!(condition = %input, error = %err, "condition failed to evaluate, rendering widget anyway");
            true
        }
    }
}

/// Evaluate an expression for its value rather than a gate decision.
/// A bare path or literal yields the underlying value (`None` when the
/// path is undefined); boolean operators yield a boolean.
pub fn evaluate_value(input: &str, scope: &Scope<'_>) -> Result<Option<Value>, ConditionError> {
    let expr = parse_condition(input)?;
    match &expr {
        ConditionExpr::Operand(operand) => Ok(resolve_operand(operand, scope)?.cloned()),
        compound => Ok(Some(Value::Bool(eval_expr(compound, scope)?))),
    }
}
