//! The opcode table for the 8-bit machine.
//!
//! Every mnemonic belongs to exactly one of three encoding classes:
//!
//! ```nasm
//! LDA n   ; packed: 0x10 | n, n in 0..15
//! LDB n   ; packed: 0x20 | n
//! OUT n   ; packed: 0x30 | n
//! SUB n   ; packed: 0x40 | n
//! HLT     ; single: 0x50
//! SHT n   ; packed: 0x60 | n
//! STA n   ; packed: 0x70 | n
//! RTE n   ; packed: 0x80 | n
//! JMP n   ; packed: 0x90 | n
//! ```
//!
//! Immediate opcodes (an opcode byte followed by a full literal byte) are
//! supported by the encoder, but the standard table defines none.
//!
//! Mnemonics are matched case-insensitively.

use std::fmt;

/// How a mnemonic turns into bytes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Encoding {
    /// Base byte with a 4-bit operand folded into the low nibble.
    Packed(u8),
    /// A fixed byte, no operand.
    Single(u8),
    /// A fixed byte followed by one literal operand byte.
    Immediate(u8),
}

impl Encoding {
    /// The fixed opcode byte, before any operand is applied.
    pub fn base(&self) -> u8 {
        use Encoding::*;
        match self {
            Packed(b) | Single(b) | Immediate(b) => *b,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Opcode {
    pub name: &'static str,
    pub encoding: Encoding,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Read-only mnemonic tables, one per encoding class.
#[derive(Copy, Clone, Debug)]
pub struct OpcodeTable {
    pub packed: &'static [(&'static str, u8)],
    pub single: &'static [(&'static str, u8)],
    pub immediate: &'static [(&'static str, u8)],
}

impl OpcodeTable {
    pub const STANDARD: OpcodeTable = OpcodeTable {
        packed: &[
            ("LDA", 0x10),
            ("LDB", 0x20),
            ("OUT", 0x30),
            ("SUB", 0x40),
            ("SHT", 0x60),
            ("STA", 0x70),
            ("RTE", 0x80),
            ("JMP", 0x90),
        ],
        single: &[("HLT", 0x50)],
        immediate: &[],
    };

    /// Looks up a mnemonic, ignoring case. Packed names are checked first,
    /// then single, then immediate.
    pub fn lookup(&self, mnemonic: &str) -> Option<Opcode> {
        let find = |table: &'static [(&'static str, u8)]| {
            table
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(mnemonic))
                .copied()
        };

        if let Some((name, b)) = find(self.packed) {
            return Some(Opcode { name, encoding: Encoding::Packed(b) });
        }
        if let Some((name, b)) = find(self.single) {
            return Some(Opcode { name, encoding: Encoding::Single(b) });
        }
        find(self.immediate).map(|(name, b)| Opcode { name, encoding: Encoding::Immediate(b) })
    }

    /// Every mnemonic in the table, in class order.
    pub fn mnemonics(&self) -> impl Iterator<Item = &'static str> {
        self.packed
            .iter()
            .chain(self.single.iter())
            .chain(self.immediate.iter())
            .map(|(name, _)| *name)
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        OpcodeTable::STANDARD
    }
}
