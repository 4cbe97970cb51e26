use crate::Formula::formula_error::FormatError;

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '(' || c == ')'
}

/// Gatekeeping before the structural parsing: the formula must be non-empty, consist of
/// latin letters, digits and round brackets only, and its brackets must be balanced.
/// Returns the formula unchanged, nothing is trimmed or case-folded.
pub fn validate(formula: &str) -> Result<&str, FormatError> {
    if formula.is_empty() {
        return Err(FormatError::EmptyInput);
    }
    if let Some((position, ch)) = formula.chars().enumerate().find(|(_, c)| !is_allowed(*c)) {
        return Err(FormatError::IllegalCharacter { ch, position });
    }
    // running balance of brackets, must never go below zero
    let mut balance: usize = 0;
    for c in formula.chars() {
        match c {
            '(' => balance += 1,
            ')' => {
                if balance == 0 {
                    return Err(FormatError::UnbalancedParentheses {
                        formula: formula.to_string(),
                    });
                }
                balance -= 1;
            }
            _ => {}
        }
    }
    if balance != 0 {
        return Err(FormatError::UnbalancedParentheses {
            formula: formula.to_string(),
        });
    }
    Ok(formula)
}
