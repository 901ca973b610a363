//! ESC/POS operation encoding
//!
//! Ticket layouts are expressed as a sequence of [`Operation`]s, which the
//! [`CommandEncoder`] turns into the byte sequences the printer understands.
//! Encoding is pure and total: every well-formed operation maps to a fixed
//! byte sequence, so a ticket that rendered can always be encoded.

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::encoding::encode_text;

/// Horizontal alignment for subsequent text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Paper cut variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutMode {
    Full,
    Partial,
}

/// A single semantic printer operation
///
/// Operations are generated fresh per print call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Reset the printer to its power-on state
    Init,
    /// Select alignment for following text
    Align(Alignment),
    /// Toggle emphasis
    Bold(bool),
    /// Toggle double width and height
    DoubleSize(bool),
    /// Print one line of text (line feed included)
    Text(String),
    /// Feed n blank lines
    Feed(u8),
    /// Cut the paper
    Cut(CutMode),
    /// Pre-encoded bytes (logo raster data), passed through verbatim
    Raster(Vec<u8>),
}

/// Stateless operation-to-bytes encoder
///
/// Text is encoded with the configured code page; everything else is a
/// fixed escape sequence.
#[derive(Debug, Clone, Copy)]
pub struct CommandEncoder {
    encoding: &'static Encoding,
}

impl CommandEncoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    /// Encode one operation into its wire bytes
    pub fn encode(&self, op: &Operation) -> Vec<u8> {
        match op {
            // ESC @
            Operation::Init => vec![0x1B, 0x40],
            // ESC a n
            Operation::Align(Alignment::Left) => vec![0x1B, 0x61, 0x00],
            Operation::Align(Alignment::Center) => vec![0x1B, 0x61, 0x01],
            Operation::Align(Alignment::Right) => vec![0x1B, 0x61, 0x02],
            // ESC E n
            Operation::Bold(true) => vec![0x1B, 0x45, 0x01],
            Operation::Bold(false) => vec![0x1B, 0x45, 0x00],
            // GS ! n
            Operation::DoubleSize(true) => vec![0x1D, 0x21, 0x11],
            Operation::DoubleSize(false) => vec![0x1D, 0x21, 0x00],
            Operation::Text(s) => {
                let mut bytes = encode_text(self.encoding, s);
                bytes.push(b'\n');
                bytes
            }
            // ESC d n - Print and feed n lines
            Operation::Feed(n) => vec![0x1B, 0x64, *n],
            // GS V 0 - Full cut
            Operation::Cut(CutMode::Full) => vec![0x1D, 0x56, 0x00],
            // GS V 1 - Partial cut (leave a small connection)
            Operation::Cut(CutMode::Partial) => vec![0x1D, 0x56, 0x01],
            Operation::Raster(bytes) => bytes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    fn encoder() -> CommandEncoder {
        CommandEncoder::new(WINDOWS_1252)
    }

    #[test]
    fn test_fixed_sequences() {
        let e = encoder();
        assert_eq!(e.encode(&Operation::Init), vec![0x1B, 0x40]);
        assert_eq!(e.encode(&Operation::Bold(true)), vec![0x1B, 0x45, 0x01]);
        assert_eq!(e.encode(&Operation::DoubleSize(true)), vec![0x1D, 0x21, 0x11]);
        assert_eq!(e.encode(&Operation::Feed(3)), vec![0x1B, 0x64, 3]);
        assert_eq!(e.encode(&Operation::Cut(CutMode::Full)), vec![0x1D, 0x56, 0x00]);
        assert_eq!(e.encode(&Operation::Cut(CutMode::Partial)), vec![0x1D, 0x56, 0x01]);
    }

    #[test]
    fn test_alignment_encoding_is_deterministic() {
        let e = encoder();
        for align in [Alignment::Left, Alignment::Center, Alignment::Right] {
            let op = Operation::Align(align);
            assert_eq!(e.encode(&op), e.encode(&op));
        }
        assert_eq!(e.encode(&Operation::Align(Alignment::Left)), vec![0x1B, 0x61, 0x00]);
        assert_eq!(e.encode(&Operation::Align(Alignment::Center)), vec![0x1B, 0x61, 0x01]);
        assert_eq!(e.encode(&Operation::Align(Alignment::Right)), vec![0x1B, 0x61, 0x02]);
    }

    #[test]
    fn test_text_is_line_terminated() {
        let e = encoder();
        assert_eq!(e.encode(&Operation::Text("HELLO".into())), b"HELLO\n".to_vec());
    }

    #[test]
    fn test_raster_passthrough() {
        let e = encoder();
        let raster = vec![0x1D, 0x76, 0x30, 0x00, 0xFF];
        assert_eq!(e.encode(&Operation::Raster(raster.clone())), raster);
    }
}
