//! The Assembler module is in charge of taking the lines of
//! a source file and producing the machine's byte image.
//!
//! It does this in a single pass: every line is encoded on its own,
//! in order, straight into the output stream. There are no labels
//! and no symbol table.

pub mod cursor;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod opcodes;
pub mod output;

pub use encoder::{Emission, Encoder, Listing};
pub use error::Error;

/// Assembles the lines with the standard opcode table, keeping a record
/// of what each line produced.
pub fn assemble_listing<I, S>(lines: I) -> Result<Listing, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Encoder::new(lexer::number_lines(lines)).run()
}

/// Assembles the lines into a byte stream.
pub fn assemble<I, S>(lines: I) -> Result<Vec<u8>, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    assemble_listing(lines).map(|listing| listing.bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble() {
        let bytes = assemble(vec!["LDA 3", "", "HLT"]).unwrap();
        assert_eq!(bytes, vec![0x13, 0x00, 0x50]);
        assert_eq!(output::hex_words(&bytes), "v3.0 hex words addressed\n0: 13 00 50");

        let bytes = assemble(Vec::<String>::new()).unwrap();
        assert!(bytes.is_empty());
        assert_eq!(output::hex_words(&bytes), "v3.0 hex words addressed\n0: ");
    }

    #[test]
    fn test_assemble_program() {
        let src = "
        LDA 0xE
        ADD_IS_NOT_HERE
        ";
        assert_eq!(
            assemble(src.lines()),
            Err(Error::UnrecognizedToken { text: "ADD_IS_NOT_HERE".to_owned(), line: 3 })
        );

        let src = "LDA 14\nsub 1\nOUT 0\nJMP 0x1\n\nff\n0x00\n128\nhlt extra";
        assert_eq!(
            assemble(src.lines()).unwrap(),
            vec![0x1E, 0x41, 0x30, 0x91, 0x00, 0xFF, 0x00, 0x80, 0x50]
        );
    }

    #[test]
    fn test_stream_length_is_sum_of_lines() {
        let src = vec!["LDA 1", "", "", "7f", "HLT", "STA 15", " "];
        let listing = assemble_listing(src.clone()).unwrap();
        assert_eq!(listing.emissions.len(), src.len());
        assert_eq!(listing.len(), src.len());
        assert_eq!(listing.bytes().len(), listing.iter().map(|e| e.bytes.len()).sum::<usize>());
        for (e, s) in listing.iter().zip(src.iter()) {
            assert_eq!(e.source, *s);
        }
    }

    #[test]
    fn test_error_discards_output() {
        assert_eq!(
            assemble(vec!["LDA 1", "HLT", "LDA 16", "HLT"]),
            Err(Error::OperandOutOfRange {
                opcode: "LDA".to_owned(),
                value: "16".to_owned(),
                line: 3,
            })
        );
    }
}
