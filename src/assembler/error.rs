//! Errors raised while assembling. Every one of them is fatal: the first
//! error stops translation and no bytes from the run are kept.
use thiserror::Error;

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum Error {
    /// A packed opcode had no operand token.
    #[error("line {line}: missing operand for {opcode}")]
    MissingOperand { opcode: String, line: usize },

    /// An operand (or immediate byte) parsed as neither hex nor decimal.
    #[error("line {line}: bad operand '{token}' for {opcode}")]
    InvalidOperandToken {
        opcode: String,
        token: String,
        line: usize,
    },

    /// A packed operand fell outside 0..15.
    #[error("line {line}: operand for {opcode} must be 0..15, got {value}")]
    OperandOutOfRange {
        opcode: String,
        value: String,
        line: usize,
    },

    /// Input ran out while looking for an immediate opcode's byte.
    #[error("line {line}: missing immediate byte after {opcode}")]
    MissingImmediateByte { opcode: String, line: usize },

    #[error("line {line}: unrecognized opcode or token: '{text}'")]
    UnrecognizedToken { text: String, line: usize },
}

impl Error {
    /// The source line the error was raised on.
    pub fn line(&self) -> usize {
        use Error::*;
        match self {
            MissingOperand { line, .. }
            | InvalidOperandToken { line, .. }
            | OperandOutOfRange { line, .. }
            | MissingImmediateByte { line, .. }
            | UnrecognizedToken { line, .. } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = Error::OperandOutOfRange {
            opcode: "LDA".to_owned(),
            value: "16".to_owned(),
            line: 3,
        };
        assert_eq!(e.to_string(), "line 3: operand for LDA must be 0..15, got 16");
        assert_eq!(e.line(), 3);

        let e = Error::UnrecognizedToken {
            text: "FOO 1".to_owned(),
            line: 1,
        };
        assert_eq!(e.to_string(), "line 1: unrecognized opcode or token: 'FOO 1'");

        let e = Error::MissingImmediateByte {
            opcode: "LDI".to_owned(),
            line: 7,
        };
        assert_eq!(e.to_string(), "line 7: missing immediate byte after LDI");
        assert_eq!(e.line(), 7);
    }
}
