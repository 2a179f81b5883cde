//! The Encoder takes source lines one at a time and turns each into the
//! bytes it stands for.
//!
//! Each line is classified by its first token, in this order:
//!
//! 1. blank line: a single 0x00 pad byte
//! 2. literal byte (`0x1A`, `1A`, `26`): that byte
//! 3. packed opcode: base byte plus a 0..15 operand
//! 4. single opcode: its fixed byte, trailing tokens ignored
//! 5. immediate opcode: its fixed byte, then a literal byte taken from the
//!    same line or else from the next non-blank line
//!
//! Anything else stops assembly. There is one pass and no lookbehind.
use std::fmt;

use super::cursor::SourceCursor;
use super::error::Error;
use super::lexer::{self, Line, NumberError};
use super::opcodes::{Encoding, Opcode, OpcodeTable};

/// The bytes one source line assembled to.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Emission {
    /// Line the instruction started on.
    pub line: usize,
    pub source: String,
    /// Offset of the first byte in the output stream.
    pub address: usize,
    pub bytes: Vec<u8>,
}

impl Emission {
    /// The bytes as space separated lowercase hex pairs.
    pub fn hex(&self) -> String {
        self.bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Emission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:>4}: {} => {}", self.line, self.source.trim(), self.hex())
    }
}

/// Every emission of a run, in source order.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Listing {
    pub emissions: Vec<Emission>,
}

impl Listing {
    /// Flattens the listing into the output byte stream.
    pub fn bytes(&self) -> Vec<u8> {
        self.emissions
            .iter()
            .flat_map(|e| e.bytes.iter().copied())
            .collect()
    }

    /// Total number of bytes emitted.
    pub fn len(&self) -> usize {
        self.emissions.iter().map(|e| e.bytes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<Emission> {
        self.emissions.iter()
    }
}

pub struct Encoder<'t> {
    cursor: SourceCursor,
    table: &'t OpcodeTable,
    listing: Listing,
    address: usize,
}

impl Encoder<'static> {
    /// An encoder using the standard opcode table.
    pub fn new<I: IntoIterator<Item = Line>>(lines: I) -> Self {
        Encoder::with_table(lines, &OpcodeTable::STANDARD)
    }
}

impl<'t> Encoder<'t> {
    pub fn with_table<I: IntoIterator<Item = Line>>(lines: I, table: &'t OpcodeTable) -> Self {
        Encoder {
            cursor: SourceCursor::new(lines),
            table,
            listing: Listing::default(),
            address: 0,
        }
    }

    /// Run the encoder, consuming itself and returning the listing.
    /// Stops at the first error; nothing encoded before it is returned.
    pub fn run(mut self) -> Result<Listing, Error> {
        while let Some(emission) = self.encode_line()? {
            self.listing.emissions.push(emission);
        }

        info!(
            "assembled {} line(s) into {} byte(s)",
            self.listing.emissions.len(),
            self.listing.len()
        );
        Ok(self.listing)
    }

    /// Consumes the next line (and, for an immediate opcode with no
    /// operand on its own line, any lines up to its operand) and encodes it.
    /// Returns Ok(None) once input is exhausted.
    pub fn encode_line(&mut self) -> Result<Option<Emission>, Error> {
        let line = match self.cursor.consume() {
            Some(line) => line,
            None => return Ok(None),
        };

        let bytes = self.classify(&line)?;
        let emission = Emission {
            line: line.number,
            source: line.text,
            address: self.address,
            bytes,
        };
        self.address += emission.bytes.len();

        debug!("0x{:04X}: {}", emission.address, emission);
        Ok(Some(emission))
    }

    fn classify(&mut self, line: &Line) -> Result<Vec<u8>, Error> {
        let mut tokens = line.tokens();
        let first = match tokens.next() {
            Some(tok) => tok,
            // Blank lines pad the output with a zero byte.
            None => return Ok(vec![0x00]),
        };

        // Literal bytes win over mnemonics, even a mnemonic spelled in hex.
        if lexer::is_literal_byte(first) {
            return match lexer::parse_byte_token(first) {
                Ok(b) => Ok(vec![b]),
                Err(_) => Err(unrecognized(line)),
            };
        }

        match self.table.lookup(first) {
            Some(Opcode { name, encoding: Encoding::Packed(base) }) => {
                self.packed(name, base, tokens.next(), line.number).map(|b| vec![b])
            }
            Some(Opcode { encoding: Encoding::Single(b), .. }) => Ok(vec![b]),
            Some(Opcode { name, encoding: Encoding::Immediate(b) }) => {
                let operand = self.immediate(name, tokens.next(), line.number)?;
                Ok(vec![b, operand])
            }
            None => Err(unrecognized(line)),
        }
    }

    /// Folds a 4-bit operand into a packed opcode's base byte.
    fn packed(&self, name: &str, base: u8, operand: Option<&str>, line: usize) -> Result<u8, Error> {
        let tok = match operand {
            Some(tok) => tok,
            None => {
                return Err(Error::MissingOperand { opcode: name.to_owned(), line });
            }
        };

        let value = match lexer::parse_operand(tok) {
            Ok(value) => value,
            Err(NumberError::Invalid) => {
                return Err(Error::InvalidOperandToken {
                    opcode: name.to_owned(),
                    token: tok.to_owned(),
                    line,
                });
            }
            Err(NumberError::Overflow) => {
                return Err(Error::OperandOutOfRange {
                    opcode: name.to_owned(),
                    value: tok.to_owned(),
                    line,
                });
            }
        };

        if value > 0x0F {
            return Err(Error::OperandOutOfRange {
                opcode: name.to_owned(),
                value: value.to_string(),
                line,
            });
        }

        Ok(base.wrapping_add(value as u8 & 0x0F))
    }

    /// Resolves an immediate opcode's operand byte, reading ahead past blank
    /// lines when the opcode's own line has no second token.
    fn immediate(&mut self, name: &str, operand: Option<&str>, line: usize) -> Result<u8, Error> {
        let (tok, tok_line) = match operand {
            Some(tok) => (tok.to_owned(), line),
            None => match self.cursor.next_nonblank() {
                Some(next) => match next.first_token() {
                    Some(tok) => (tok.to_owned(), next.number),
                    None => return Err(Error::MissingImmediateByte { opcode: name.to_owned(), line }),
                },
                None => return Err(Error::MissingImmediateByte { opcode: name.to_owned(), line }),
            },
        };

        lexer::parse_byte_token(&tok).map_err(|_| Error::InvalidOperandToken {
            opcode: name.to_owned(),
            token: tok.clone(),
            line: tok_line,
        })
    }
}

fn unrecognized(line: &Line) -> Error {
    Error::UnrecognizedToken {
        text: line.trimmed().to_owned(),
        line: line.number,
    }
}
