//! Renders the byte stream as a "v3.0 hex words addressed" image: a header
//! line, then every byte on a single line addressed from 0.
//!
//! ```text
//! v3.0 hex words addressed
//! 0: 13 00 50
//! ```

pub const HEADER: &str = "v3.0 hex words addressed";

/// Serializes the bytes. The result has no trailing newline.
pub fn hex_words(bytes: &[u8]) -> String {
    let words: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}\n0: {}", HEADER, words.join(" "))
}
