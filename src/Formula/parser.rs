use crate::Formula::formula_error::FormatError;
use crate::Formula::tokenizer::{LocatedToken, Token, tokenize};
use std::fmt;
use std::iter::Peekable;
use std::slice::Iter;

/// element symbol with the number of its atoms
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementCount {
    pub symbol: String,
    pub count: u64,
}

impl ElementCount {
    pub fn new(symbol: &str, count: u64) -> Self {
        ElementCount {
            symbol: symbol.to_string(),
            count,
        }
    }
}

impl fmt::Display for ElementCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.symbol, self.count)
    }
}

// an integer right after a symbol or a closing bracket is its count, 1 if absent
fn trailing_count<'a, 'b>(
    tokens: &mut Peekable<Iter<'b, LocatedToken<'a>>>,
) -> (u64, Option<&'b LocatedToken<'a>>) {
    match tokens.next_if(|t| matches!(t.token, Token::Integer(_))) {
        Some(located) => match located.token {
            Token::Integer(n) => (n, Some(located)),
            _ => (1, None),
        },
        None => (1, None),
    }
}

/// Parses a formula into an ordered sequence of (element, count) pairs.
///
/// Single left-to-right pass over the tokens with an explicit stack of group buffers:
/// `(` opens a new buffer, `)` closes it, multiplies every count inside by the following
/// integer (1 if absent) and appends the scaled pairs to the enclosing buffer.
/// Pairs keep first-seen order and duplicates are not merged: "CH3COOH" yields C twice.
///
/// The input does not have to be validated first; brackets are checked independently.
/// ```
/// use MolarCalc::Formula::parser::{ElementCount, parse};
/// let pairs = parse("Mg(OH)2").unwrap();
/// assert_eq!(
///     pairs,
///     vec![
///         ElementCount::new("Mg", 1),
///         ElementCount::new("O", 2),
///         ElementCount::new("H", 2)
///     ]
/// );
/// ```
pub fn parse(formula: &str) -> Result<Vec<ElementCount>, FormatError> {
    if formula.is_empty() {
        return Err(FormatError::EmptyInput);
    }
    let unbalanced = || FormatError::UnbalancedParentheses {
        formula: formula.to_string(),
    };
    let tokens = tokenize(formula)?;
    let mut tokens = tokens.iter().peekable();
    // buffers of the enclosing groups; `current` is the top of the stack
    let mut enclosing: Vec<Vec<ElementCount>> = Vec::new();
    let mut current: Vec<ElementCount> = Vec::new();

    while let Some(located) = tokens.next() {
        match located.token {
            Token::OpenGroup => enclosing.push(std::mem::take(&mut current)),
            Token::CloseGroup => {
                let outer = enclosing.pop().ok_or_else(unbalanced)?;
                let group = std::mem::replace(&mut current, outer);
                let (multiplier, multiplier_token) = trailing_count(&mut tokens);
                for mut pair in group {
                    pair.count = pair.count.checked_mul(multiplier).ok_or_else(|| {
                        let (token, position) = multiplier_token
                            .map(|t| (t.text.to_string(), t.position))
                            .unwrap_or_else(|| (located.text.to_string(), located.position));
                        FormatError::InvalidToken { token, position }
                    })?;
                    current.push(pair);
                }
            }
            Token::Element(symbol) => {
                let (count, _) = trailing_count(&mut tokens);
                current.push(ElementCount::new(symbol, count));
            }
            Token::Integer(_) => {
                return Err(FormatError::DanglingMultiplier {
                    number: located.text.to_string(),
                    position: located.position,
                });
            }
        }
    }
    if !enclosing.is_empty() {
        return Err(unbalanced());
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, u64)]) -> Vec<ElementCount> {
        list.iter().map(|(s, c)| ElementCount::new(s, *c)).collect()
    }

    #[test]
    fn test_parse_formula() {
        assert_eq!(parse("H2O").unwrap(), pairs(&[("H", 2), ("O", 1)]));
        assert_eq!(
            parse("C6H12O6").unwrap(),
            pairs(&[("C", 6), ("H", 12), ("O", 6)])
        );
        assert_eq!(
            parse("Mg(OH)2").unwrap(),
            pairs(&[("Mg", 1), ("O", 2), ("H", 2)])
        );
        assert_eq!(parse("Na(Cl)2").unwrap(), pairs(&[("Na", 1), ("Cl", 2)]));
        assert_eq!(
            parse("Na(NO3)2").unwrap(),
            pairs(&[("Na", 1), ("N", 2), ("O", 6)])
        );
    }

    #[test]
    fn test_duplicates_are_not_merged() {
        assert_eq!(
            parse("CH3COOH").unwrap(),
            pairs(&[("C", 1), ("H", 3), ("C", 1), ("O", 1), ("O", 1), ("H", 1)])
        );
    }

    #[test]
    fn test_nested_groups() {
        // Prussian-blue-like nesting written with round brackets
        assert_eq!(
            parse("K4(Fe(CN)6)").unwrap(),
            pairs(&[("K", 4), ("Fe", 1), ("C", 6), ("N", 6)])
        );
        assert_eq!(
            parse("((H)2O)3").unwrap(),
            pairs(&[("H", 6), ("O", 3)])
        );
        assert_eq!(parse("(((C)2)3)4").unwrap(), pairs(&[("C", 24)]));
    }

    #[test]
    fn test_empty_groups_and_zero_counts() {
        assert_eq!(parse("()").unwrap(), vec![]);
        assert_eq!(parse("(())5").unwrap(), vec![]);
        assert_eq!(parse("H0").unwrap(), pairs(&[("H", 0)]));
        assert_eq!(parse("(OH)0").unwrap(), pairs(&[("O", 0), ("H", 0)]));
    }

    #[test]
    fn test_unknown_symbols_are_syntactically_fine() {
        assert_eq!(parse("Xx2").unwrap(), pairs(&[("Xx", 2)]));
    }

    #[test]
    fn test_unbalanced() {
        for formula in ["H2(O", ")", "(H", "H)2", "((H)"] {
            assert_eq!(
                parse(formula),
                Err(FormatError::UnbalancedParentheses {
                    formula: formula.to_string()
                }),
                "formula {}",
                formula
            );
        }
    }

    #[test]
    fn test_dangling_multiplier() {
        assert_eq!(
            parse("2H"),
            Err(FormatError::DanglingMultiplier {
                number: "2".to_string(),
                position: 0
            })
        );
        assert_eq!(
            parse("H(2O)"),
            Err(FormatError::DanglingMultiplier {
                number: "2".to_string(),
                position: 2
            })
        );
    }

    #[test]
    fn test_invalid_tokens_and_empty_input() {
        assert_eq!(parse(""), Err(FormatError::EmptyInput));
        assert!(matches!(
            parse("NaCl!"),
            Err(FormatError::InvalidToken { position: 4, .. })
        ));
    }

    #[test]
    fn test_multiplier_overflow() {
        let formula = format!("(H{})2", u64::MAX);
        assert_eq!(
            parse(&formula),
            Err(FormatError::InvalidToken {
                token: "2".to_string(),
                position: formula.len() - 1
            })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ElementCount::new("Cl", 2).to_string(), "(Cl, 2)");
    }
}
