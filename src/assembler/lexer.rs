//! Line reading and token classification.
//!
//! Source is handled one line at a time. A line is split on whitespace;
//! only the first token decides what the line is, and at most one more
//! token is read as its operand. Numbers come in three spellings:
//!
//! ```nasm
//! 0x1A    ; hex, prefixed (0X works too)
//! 1A      ; hex, exactly two digits with a letter, no prefix
//! 26      ; decimal (0x1A)
//! ```
use std::io::{self, BufRead, BufReader, Read};
use std::str::SplitWhitespace;
use std::sync::OnceLock;

use regex::Regex;

/// One line of source, numbered from 1.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

impl Line {
    pub fn new<S: Into<String>>(number: usize, text: S) -> Self {
        Line { number, text: text.into() }
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    pub fn tokens(&self) -> SplitWhitespace {
        self.text.split_whitespace()
    }

    pub fn first_token(&self) -> Option<&str> {
        self.tokens().next()
    }
}

/// Numbers a sequence of raw lines, starting at 1.
pub fn number_lines<I, S>(source: I) -> Vec<Line>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    source
        .into_iter()
        .enumerate()
        .map(|(index, text)| Line::new(index + 1, text))
        .collect()
}

/// Reads every line from the reader. Line terminators are dropped.
pub fn read_lines<T: Read + ?Sized>(reader: Box<T>) -> io::Result<Vec<Line>> {
    let mut lines = Vec::with_capacity(256);
    for (index, line) in BufReader::new(reader).lines().enumerate() {
        lines.push(Line::new(index + 1, line?));
    }
    debug!("read {} source line(s)", lines.len());
    Ok(lines)
}

/// Why a numeric token was rejected.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NumberError {
    /// Not a hex or decimal number at all.
    Invalid,
    /// A well-formed number too large to hold.
    Overflow,
}

fn literal_byte_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(?:0[xX])?[0-9A-Fa-f]{2}$").expect("literal byte pattern"))
}

fn short_hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9A-Fa-f]{1,2}$").expect("short hex pattern"))
}

fn hex_prefixed(tok: &str) -> Option<&str> {
    if tok.starts_with("0x") || tok.starts_with("0X") {
        Some(&tok[2..])
    } else {
        None
    }
}

fn is_decimal(tok: &str) -> bool {
    !tok.is_empty() && tok.bytes().all(|b| b.is_ascii_digit())
}

fn is_hex(tok: &str) -> bool {
    !tok.is_empty() && tok.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Whether a line's first token stands for a literal byte rather than an
/// opcode. This check runs before any mnemonic lookup.
pub fn is_literal_byte(tok: &str) -> bool {
    literal_byte_pattern().is_match(tok) || is_decimal(tok)
}

/// Folds a digit string into its low 8 bits, whatever its length.
fn fold_low_byte(digits: &str, radix: u32) -> u8 {
    digits.chars().fold(0u8, |acc, c| {
        let digit = c.to_digit(radix).unwrap_or(0) as u8;
        acc.wrapping_mul(radix as u8).wrapping_add(digit)
    })
}

/// Parses a standalone byte: `0x`-prefixed hex, decimal, or two bare hex
/// digits with at least one letter among them. All-digit tokens are always
/// decimal, so `26` is 0x1A. Values wider than a byte keep their low 8 bits.
pub fn parse_byte_token(tok: &str) -> Result<u8, NumberError> {
    let tok = tok.trim();
    if let Some(digits) = hex_prefixed(tok) {
        if is_hex(digits) {
            return Ok(fold_low_byte(digits, 16));
        }
        return Err(NumberError::Invalid);
    }
    if is_decimal(tok) {
        return Ok(fold_low_byte(tok, 10));
    }
    if tok.len() == 2 && is_hex(tok) {
        return Ok(fold_low_byte(tok, 16));
    }
    Err(NumberError::Invalid)
}

/// Parses the operand of a packed opcode. One or two hex digits are read
/// as hex only when they contain a letter, so `10` is ten and `1A` is
/// twenty-six. Range checking is left to the caller.
pub fn parse_operand(tok: &str) -> Result<u64, NumberError> {
    let (digits, radix) = if let Some(digits) = hex_prefixed(tok) {
        if !is_hex(digits) {
            return Err(NumberError::Invalid);
        }
        (digits, 16)
    } else if short_hex_pattern().is_match(tok) && !is_decimal(tok) {
        (tok, 16)
    } else if is_decimal(tok) {
        (tok, 10)
    } else {
        return Err(NumberError::Invalid);
    };

    // The digits are already validated, so the only failure left is size.
    u64::from_str_radix(digits, radix).map_err(|_| NumberError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line() {
        let l = Line::new(4, "  LDA   3  \r");
        assert_eq!(l.trimmed(), "LDA   3");
        assert!(!l.is_blank());
        assert_eq!(l.tokens().collect::<Vec<_>>(), vec!["LDA", "3"]);
        assert_eq!(l.first_token(), Some("LDA"));

        for blank in &["", " ", "\t", " \t \r"] {
            let l = Line::new(1, *blank);
            assert!(l.is_blank());
            assert_eq!(l.first_token(), None);
        }
    }

    #[test]
    fn test_number_lines() {
        let lines = number_lines(vec!["LDA 3", "", "HLT"]);
        assert_eq!(lines, vec![
            Line::new(1, "LDA 3"),
            Line::new(2, ""),
            Line::new(3, "HLT"),
        ]);
        assert!(number_lines(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_read_lines() {
        let src = "LDA 3\r\n\nHLT";
        let lines = read_lines(Box::new(src.as_bytes())).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[0].trimmed(), "LDA 3");
        assert!(lines[1].is_blank());
        assert_eq!(lines[2], Line::new(3, "HLT"));

        let lines = read_lines(Box::new("".as_bytes())).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_is_literal_byte() {
        for tok in &["00", "55", "ff", "FF", "1a", "0x1A", "0X1a", "0", "7", "26", "256", "00000"] {
            assert!(is_literal_byte(tok), "{} should be a literal", tok);
        }
        for tok in &["", "LDA", "HLT", "f", "0x", "0x1", "0x123", "1ab", "-1", "+1", "0b11", "1.0"] {
            assert!(!is_literal_byte(tok), "{} should not be a literal", tok);
        }
    }

    #[test]
    fn test_parse_byte_token() {
        // A byte value always survives being written out and read back.
        for i in 0..=u8::MAX {
            assert_eq!(parse_byte_token(&format!("{}", i)), Ok(i));
            assert_eq!(parse_byte_token(&format!("0x{:02x}", i)), Ok(i));
            assert_eq!(parse_byte_token(&format!("0X{:X}", i)), Ok(i));

            let bare = format!("{:02x}", i);
            if bare.bytes().any(|b| b.is_ascii_alphabetic()) {
                assert_eq!(parse_byte_token(&bare), Ok(i));
                assert_eq!(parse_byte_token(&bare.to_uppercase()), Ok(i));
            }
        }

        // Digits alone are decimal, a letter makes two digits hex.
        assert_eq!(parse_byte_token("26"), Ok(0x1A));
        assert_eq!(parse_byte_token("1a"), Ok(0x1A));
        assert_eq!(parse_byte_token("10"), Ok(10));
        assert_eq!(parse_byte_token("00"), Ok(0));
        assert_eq!(parse_byte_token(" 5 "), Ok(5));

        // Wide values are masked to the low byte.
        assert_eq!(parse_byte_token("256"), Ok(0));
        assert_eq!(parse_byte_token("300"), Ok(44));
        assert_eq!(parse_byte_token("0x1234"), Ok(0x34));
        assert_eq!(
            parse_byte_token("99999999999999999999999999"),
            Ok((99999999999999999999999999u128 % 256) as u8)
        );

        for tok in &["", "0x", "0xg1", "LDA", "1g", "abc", "-5", "+5", "1_0"] {
            assert_eq!(parse_byte_token(tok), Err(NumberError::Invalid), "{}", tok);
        }
    }

    #[test]
    fn test_parse_operand() {
        for i in 0..=15u64 {
            assert_eq!(parse_operand(&format!("{}", i)), Ok(i));
            assert_eq!(parse_operand(&format!("0x{:x}", i)), Ok(i));
            assert_eq!(parse_operand(&format!("0X{:X}", i)), Ok(i));
        }
        assert_eq!(parse_operand("a"), Ok(10));
        assert_eq!(parse_operand("F"), Ok(15));
        assert_eq!(parse_operand("1a"), Ok(26));
        assert_eq!(parse_operand("10"), Ok(10));
        assert_eq!(parse_operand("016"), Ok(16));
        assert_eq!(parse_operand("0x10"), Ok(16));
        assert_eq!(parse_operand("123456"), Ok(123456));

        assert_eq!(parse_operand("99999999999999999999999"), Err(NumberError::Overflow));
        assert_eq!(parse_operand("0xffffffffffffffffff"), Err(NumberError::Overflow));

        for tok in &["", "g", "abc", "0x", "0xz", "-1", "+1", "1.5", "R1"] {
            assert_eq!(parse_operand(tok), Err(NumberError::Invalid), "{}", tok);
        }
    }
}
