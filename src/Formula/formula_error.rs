use thiserror::Error;

/// syntax errors of a chemical formula: produced by the validator, the tokenizer and the parser
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Empty formula")]
    EmptyInput,
    #[error("Illegal character '{ch}' at position {position}")]
    IllegalCharacter { ch: char, position: usize },
    #[error("Invalid token '{token}' at position {position}")]
    InvalidToken { token: String, position: usize },
    #[error("Unbalanced parentheses in formula: {formula}")]
    UnbalancedParentheses { formula: String },
    #[error("Unexpected number {number} at position {position}")]
    DanglingMultiplier { number: String, position: usize },
}

/// errors of the molar mass evaluation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MassError {
    #[error("Unknown element: {0}")]
    UnknownElement(String),
}

/// any failure of the validate -> parse -> evaluate pipeline
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Mass(#[from] MassError),
}

impl FormulaError {
    /// every pipeline failure is caused by the input formula itself, so retrying never helps
    pub fn is_client_error(&self) -> bool {
        match self {
            FormulaError::Format(_) | FormulaError::Mass(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let e = FormatError::IllegalCharacter {
            ch: '!',
            position: 4,
        };
        assert_eq!(e.to_string(), "Illegal character '!' at position 4");

        let e = FormatError::UnbalancedParentheses {
            formula: "H2(O".to_string(),
        };
        assert_eq!(e.to_string(), "Unbalanced parentheses in formula: H2(O");

        let e: FormulaError = MassError::UnknownElement("Xx".to_string()).into();
        assert_eq!(e.to_string(), "Unknown element: Xx");
        assert!(e.is_client_error());
    }
}
