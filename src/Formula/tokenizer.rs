use crate::Formula::formula_error::FormatError;
use regex::Regex;
use std::sync::LazyLock;

/// Lexical units of a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// one uppercase letter optionally followed by one lowercase letter
    Element(&'a str),
    /// run of decimal digits
    Integer(u64),
    OpenGroup,
    CloseGroup,
}

/// token together with the text it was read from and its offset in the formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedToken<'a> {
    pub token: Token<'a>,
    pub text: &'a str,
    pub position: usize,
}

// anchored: every match must start exactly at the current scan position
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<element>[A-Z][a-z]?)|(?P<integer>[0-9]+)|(?P<open>\()|(?P<close>\)))")
        .unwrap()
});

/// Splits a formula into tokens in left-to-right order. Matching is greedy, so "Cl" is one
/// element symbol; a lowercase letter can never start a token.
pub fn tokenize(formula: &str) -> Result<Vec<LocatedToken<'_>>, FormatError> {
    let mut tokens = Vec::new();
    let mut position = 0;
    while position < formula.len() {
        let rest = &formula[position..];
        let Some(caps) = TOKEN_REGEX.captures(rest) else {
            let token = rest.chars().next().map(String::from).unwrap_or_default();
            return Err(FormatError::InvalidToken { token, position });
        };
        let (token, text) = if let Some(m) = caps.name("element") {
            (Token::Element(m.as_str()), m.as_str())
        } else if let Some(m) = caps.name("integer") {
            let value = m
                .as_str()
                .parse::<u64>()
                .map_err(|_| FormatError::InvalidToken {
                    token: m.as_str().to_string(),
                    position,
                })?;
            (Token::Integer(value), m.as_str())
        } else if let Some(m) = caps.name("open") {
            (Token::OpenGroup, m.as_str())
        } else {
            (Token::CloseGroup, &rest[..1])
        };
        tokens.push(LocatedToken {
            token,
            text,
            position,
        });
        position += text.len();
    }
    Ok(tokens)
}
